//! Cabin temperature PI loop.
//!
//! Runs at [`CLIMATE_DT_MS`] cadence on top of the 10 ms tick and re-issues
//! its held outputs in between. All arithmetic is fixed point in tenths of a
//! degree Celsius.

use ecu_traits::{ClimateCommand, Reading};

use crate::config::{
    BLEND_COLD_BELOW, CLIMATE_AC_ERROR_X10, CLIMATE_AMBIENT_MARGIN_X10, CLIMATE_DT_MS,
    CLIMATE_HUMIDITY_HIGH_PCT, CLIMATE_INTEGRAL_LIMIT, CLIMATE_KI, CLIMATE_KP,
    CLIMATE_OUTPUT_LIMIT, CLIMATE_SETPOINT_X10, FAN_STAGE_BOUNDS, MAX_FAN_STAGE,
    STALE_THRESHOLD_MS,
};
use crate::status::Step;

/// Samples read for one climate step.
#[derive(Debug, Clone, Copy)]
pub struct ClimateInputs {
    pub cabin_x10: Reading<i16>,
    pub ambient_x10: Reading<i16>,
    pub humidity_pct: Reading<u8>,
    /// One-shot setpoint change polled this tick.
    pub new_setpoint_x10: Option<i16>,
}

/// Fan stage for a (clamped) PI output.
pub fn fan_stage(pi: i32) -> u8 {
    let magnitude = pi.unsigned_abs();
    FAN_STAGE_BOUNDS
        .iter()
        .position(|&bound| magnitude <= bound.unsigned_abs())
        .and_then(|stage| u8::try_from(stage).ok())
        .unwrap_or(MAX_FAN_STAGE)
}

/// Heater blend door position for a (clamped) PI output.
pub fn blend_pct(pi: i32) -> u8 {
    if pi > 0 {
        100
    } else if pi < BLEND_COLD_BELOW {
        0
    } else {
        50
    }
}

#[derive(Debug, Clone)]
pub struct Climate {
    setpoint_x10: i16,
    integral: i32,
    last_update_ms: Option<u32>,
    output: ClimateCommand,
}

impl Default for Climate {
    fn default() -> Self {
        Self::new()
    }
}

impl Climate {
    pub fn new() -> Self {
        Self {
            setpoint_x10: CLIMATE_SETPOINT_X10,
            integral: 0,
            last_update_ms: None,
            output: ClimateCommand::SAFE,
        }
    }

    pub fn setpoint_x10(&self) -> i16 {
        self.setpoint_x10
    }

    pub fn integral(&self) -> i32 {
        self.integral
    }

    pub fn last_update_ms(&self) -> Option<u32> {
        self.last_update_ms
    }

    pub fn output(&self) -> ClimateCommand {
        self.output
    }

    pub(crate) fn holds_invariant(&self) -> bool {
        self.integral.abs() <= CLIMATE_INTEGRAL_LIMIT && self.output.fan_stage <= MAX_FAN_STAGE
    }

    pub fn step(&mut self, now_ms: u32, inputs: &ClimateInputs) -> Step<ClimateCommand> {
        if let Some(sp) = inputs.new_setpoint_x10 {
            self.setpoint_x10 = sp;
        }

        let cabin = match inputs.cabin_x10.check(now_ms, STALE_THRESHOLD_MS) {
            Ok(c) => c,
            Err(fault) => {
                self.output = ClimateCommand::SAFE;
                return Step::inhibited(self.output, fault);
            }
        };

        let Some(last) = self.last_update_ms else {
            self.last_update_ms = Some(now_ms);
            return Step::active(self.output);
        };
        if now_ms.wrapping_sub(last) < CLIMATE_DT_MS {
            return Step::active(self.output);
        }
        self.last_update_ms = Some(now_ms);

        let setpoint = i32::from(self.setpoint_x10);
        let error = setpoint - i32::from(cabin);
        self.integral = (self.integral + error * CLIMATE_KI)
            .clamp(-CLIMATE_INTEGRAL_LIMIT, CLIMATE_INTEGRAL_LIMIT);

        let raw = error * CLIMATE_KP + self.integral;
        let pi = raw.clamp(-CLIMATE_OUTPUT_LIMIT, CLIMATE_OUTPUT_LIMIT);
        if pi != raw {
            // Back-calculation: take this update's contribution back out.
            self.integral = (self.integral - error * CLIMATE_KI)
                .clamp(-CLIMATE_INTEGRAL_LIMIT, CLIMATE_INTEGRAL_LIMIT);
        }

        let humid = inputs
            .humidity_pct
            .usable(now_ms, STALE_THRESHOLD_MS)
            .is_some_and(|h| h > CLIMATE_HUMIDITY_HIGH_PCT);
        let hot_outside = inputs
            .ambient_x10
            .usable(now_ms, STALE_THRESHOLD_MS)
            .is_some_and(|a| i32::from(a) > setpoint + CLIMATE_AMBIENT_MARGIN_X10);

        self.output = ClimateCommand {
            fan_stage: fan_stage(pi),
            ac_on: error < CLIMATE_AC_ERROR_X10 || humid || hot_outside,
            blend_pct: blend_pct(pi),
        };
        Step::active(self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn inputs(cabin: i16, t: u32) -> ClimateInputs {
        ClimateInputs {
            cabin_x10: Reading::new(cabin, t),
            ambient_x10: Reading::invalid(),
            humidity_pct: Reading::invalid(),
            new_setpoint_x10: None,
        }
    }

    /// First tick arms the timer, the next update lands a second later.
    fn first_update(c: &mut Climate, i: impl Fn(u32) -> ClimateInputs) -> ClimateCommand {
        c.step(10, &i(10));
        c.step(1_010, &i(1_010)).command
    }

    #[rstest]
    #[case(0, 0)]
    #[case(50, 0)]
    #[case(51, 1)]
    #[case(-100, 1)]
    #[case(101, 2)]
    #[case(200, 2)]
    #[case(-201, 3)]
    #[case(300, 3)]
    fn fan_stage_buckets(#[case] pi: i32, #[case] stage: u8) {
        assert_eq!(fan_stage(pi), stage);
    }

    #[rstest]
    #[case(1, 100)]
    #[case(0, 50)]
    #[case(-50, 50)]
    #[case(-51, 0)]
    fn blend_buckets(#[case] pi: i32, #[case] pct: u8) {
        assert_eq!(blend_pct(pi), pct);
    }

    #[test]
    fn cold_cabin_heats_after_first_period() {
        let mut c = Climate::new();
        let out = first_update(&mut c, |t| inputs(180, t));
        assert_eq!(out.blend_pct, 100);
        assert!(out.fan_stage > 0);
        assert!(!out.ac_on);
    }

    #[test]
    fn humidity_alone_forces_ac() {
        let mut c = Climate::new();
        let out = first_update(&mut c, |t| ClimateInputs {
            humidity_pct: Reading::new(80, t),
            ..inputs(220, t)
        });
        assert!(out.ac_on);
        assert_eq!(out.fan_stage, 0);
    }

    #[test]
    fn hot_ambient_forces_ac() {
        let mut c = Climate::new();
        let out = first_update(&mut c, |t| ClimateInputs {
            ambient_x10: Reading::new(271, t),
            ..inputs(220, t)
        });
        assert!(out.ac_on);
    }

    #[test]
    fn stale_optional_inputs_do_not_contribute() {
        let mut c = Climate::new();
        let out = first_update(&mut c, |t| ClimateInputs {
            humidity_pct: Reading::new(95, 0),
            ..inputs(220, t)
        });
        assert!(!out.ac_on);
    }

    #[test]
    fn outputs_held_between_updates() {
        let mut c = Climate::new();
        let out = first_update(&mut c, |t| inputs(180, t));
        let integral = c.integral();
        // Wildly different cabin reading inside the period changes nothing.
        assert_eq!(c.step(1_500, &inputs(300, 1_500)).command, out);
        assert_eq!(c.integral(), integral);
    }

    #[test]
    fn saturated_output_backs_integral_out() {
        let mut c = Climate::new();
        // error = 100, P term alone saturates the output.
        first_update(&mut c, |t| inputs(120, t));
        assert_eq!(c.integral(), 0);
    }

    #[test]
    fn invalid_cabin_holds_safe_and_keeps_integral() {
        let mut c = Climate::new();
        first_update(&mut c, |t| inputs(200, t));
        let integral = c.integral();
        let last = c.last_update_ms();
        let step = c.step(1_020, &ClimateInputs {
            cabin_x10: Reading::invalid(),
            ..inputs(0, 1_020)
        });
        assert_eq!(step.command, ClimateCommand::SAFE);
        assert_eq!(c.integral(), integral);
        assert_eq!(c.last_update_ms(), last);
        // Safe values are now the held outputs.
        assert_eq!(c.step(1_030, &inputs(200, 1_030)).command, ClimateCommand::SAFE);
    }

    #[test]
    fn setpoint_event_replaces_target() {
        let mut c = Climate::new();
        c.step(10, &ClimateInputs {
            new_setpoint_x10: Some(250),
            ..inputs(250, 10)
        });
        assert_eq!(c.setpoint_x10(), 250);
        let out = c.step(1_010, &inputs(250, 1_010)).command;
        assert_eq!(out.fan_stage, 0);
    }
}
