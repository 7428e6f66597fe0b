//! The tick driver: owns every controller and the HAL halves.

use std::sync::Arc;

use ecu_traits::{ActuatorFrame, Actuators, Clock, Sensors};

use crate::autobrake::{Autobrake, AutobrakeInputs};
use crate::autopark::Autopark;
use crate::climate::{Climate, ClimateInputs};
use crate::error::{EcuError, Result};
use crate::events::ControlEvent;
use crate::hw_error::map_hw_error;
use crate::speedgov::SpeedGovernor;
use crate::status::{Function, StepStatus};
use crate::wipers::Wipers;

/// Everything observable about one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub now_ms: u32,
    pub frame: ActuatorFrame,
    /// In tick order.
    pub statuses: [(Function, StepStatus); 5],
    pub events: Vec<ControlEvent>,
}

impl TickReport {
    pub fn status(&self, function: Function) -> StepStatus {
        self.statuses[function.index()].1
    }
}

pub struct Ecu<S: Sensors, A: Actuators> {
    pub(crate) sensors: S,
    pub(crate) actuators: A,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) autobrake: Autobrake,
    pub(crate) wipers: Wipers,
    pub(crate) speedgov: SpeedGovernor,
    pub(crate) autopark: Autopark,
    pub(crate) climate: Climate,
    last_status: [StepStatus; 5],
    ticks: u64,
}

impl<S: Sensors, A: Actuators> std::fmt::Debug for Ecu<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ecu")
            .field("ticks", &self.ticks)
            .field("autobrake", &self.autobrake)
            .field("wipers", &self.wipers)
            .field("speedgov", &self.speedgov)
            .field("autopark", &self.autopark)
            .field("climate", &self.climate)
            .finish_non_exhaustive()
    }
}

fn hw(what: &'static str) -> impl Fn(ecu_traits::BoxError) -> eyre::Report {
    move |e| eyre::Report::new(map_hw_error(&*e)).wrap_err(what)
}

impl<S: Sensors, A: Actuators> Ecu<S, A> {
    pub(crate) fn new(sensors: S, actuators: A, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            sensors,
            actuators,
            clock,
            autobrake: Autobrake::new(),
            wipers: Wipers::new(),
            speedgov: SpeedGovernor::new(),
            autopark: Autopark::new(),
            climate: Climate::new(),
            last_status: [StepStatus::Active; 5],
            ticks: 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn clock(&self) -> &Arc<dyn Clock + Send + Sync> {
        &self.clock
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    pub fn actuators_mut(&mut self) -> &mut A {
        &mut self.actuators
    }

    pub fn autobrake(&self) -> &Autobrake {
        &self.autobrake
    }

    pub fn wipers(&self) -> &Wipers {
        &self.wipers
    }

    pub fn speedgov(&self) -> &SpeedGovernor {
        &self.speedgov
    }

    pub fn autopark(&self) -> &Autopark {
        &self.autopark
    }

    pub fn climate(&self) -> &Climate {
        &self.climate
    }

    /// Hand back the HAL halves.
    pub fn into_parts(self) -> (S, A) {
        (self.sensors, self.actuators)
    }

    /// Consistency check run before every tick.
    pub fn check_invariants(&self) -> Result<()> {
        let broken = [
            (Function::Autobrake, self.autobrake.holds_invariant()),
            (Function::Wipers, self.wipers.holds_invariant()),
            (Function::SpeedGov, self.speedgov.holds_invariant()),
            (Function::Autopark, self.autopark.holds_invariant()),
            (Function::Climate, self.climate.holds_invariant()),
        ]
        .into_iter()
        .find(|(_, ok)| !ok);
        match broken {
            Some((function, _)) => Err(eyre::Report::new(EcuError::Invariant(format!(
                "{function} state out of range"
            )))),
            None => Ok(()),
        }
    }

    /// Run every controller once, in fixed order, writing each command as
    /// soon as its controller has stepped.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.check_invariants()?;
        let now_ms = self.clock.now_ms();
        self.sensors.sample(now_ms);

        let mut frame = ActuatorFrame::default();
        let mut events = Vec::new();

        // Autobrake
        let inputs = AutobrakeInputs {
            vehicle_ready: self.sensors.vehicle_ready(),
            driver_braking: self.sensors.driver_brake_pressed(),
            distance_mm: self.sensors.distance_mm(),
        };
        let (hits_before, brake_before) =
            (self.autobrake.hit_count(), self.autobrake.brake_active());
        let brake = self.autobrake.step(now_ms, &inputs);
        self.actuators
            .set_brake_request(brake.command)
            .map_err(hw("brake request"))?;
        frame.brake = brake.command;
        if hits_before == 0 && self.autobrake.hit_count() > 0 {
            events.push(ControlEvent::BelowBrakeThreshold);
        }
        match (brake_before, self.autobrake.brake_active()) {
            (false, true) => events.push(ControlEvent::BrakeAsserted),
            (true, false) => events.push(ControlEvent::BrakeDeasserted),
            _ => {}
        }

        // Wipers
        let mode_before = self.wipers.current_mode();
        let wipe = self.wipers.step(now_ms, self.sensors.rain_pct());
        self.actuators
            .set_wiper_mode(wipe.command)
            .map_err(hw("wiper mode"))?;
        frame.wiper_mode = wipe.command;
        if self.wipers.current_mode() != mode_before {
            events.push(ControlEvent::WiperModeChanged {
                from: mode_before,
                to: self.wipers.current_mode(),
            });
        } else if matches!(
            wipe.status,
            StepStatus::Inhibited(crate::status::Inhibit::Sensor(
                ecu_traits::SensorFault::Stale { .. }
            ))
        ) {
            events.push(ControlEvent::WiperStaleHold);
        }

        // Speed governor
        let alarm_before = self.speedgov.alarm_active();
        let new_limit = self.sensors.poll_speed_limit_kph();
        let gov = self
            .speedgov
            .step(now_ms, self.sensors.speed_kph(), new_limit);
        self.actuators
            .set_alarm(gov.command.alarm)
            .map_err(hw("alarm"))?;
        if let Some(kph) = gov.command.limit_request_kph {
            self.actuators
                .set_speed_limit_request(kph)
                .map_err(hw("speed limit request"))?;
        }
        frame.alarm = gov.command.alarm;
        frame.limit_request_kph = gov.command.limit_request_kph;
        if let Some(kph) = gov.command.adopted_limit_kph {
            events.push(ControlEvent::SpeedLimitAdopted { kph });
        }
        match (alarm_before, self.speedgov.alarm_active()) {
            (false, true) => events.push(ControlEvent::OverspeedAlarm),
            (true, false) => events.push(ControlEvent::AlarmCleared),
            _ => {}
        }

        // Autopark
        let phase_before = self.autopark.phase();
        let park = self.autopark.step(
            now_ms,
            self.sensors.speed_kph(),
            self.sensors.parking_gap(),
        );
        self.actuators
            .set_parking_prompt(park.command)
            .map_err(hw("parking prompt"))?;
        frame.park_prompt = park.command;
        if self.autopark.phase() != phase_before {
            events.push(ControlEvent::ParkPhaseChanged {
                from: phase_before,
                to: self.autopark.phase(),
            });
        }

        // Climate
        let updated_before = self.climate.last_update_ms();
        let inputs = ClimateInputs {
            cabin_x10: self.sensors.cabin_temp_x10(),
            ambient_x10: self.sensors.ambient_temp_x10(),
            humidity_pct: self.sensors.humidity_pct(),
            new_setpoint_x10: self.sensors.poll_setpoint_x10(),
        };
        let climate = self.climate.step(now_ms, &inputs);
        self.actuators
            .set_climate(climate.command)
            .map_err(hw("climate"))?;
        frame.climate = climate.command;
        if updated_before.is_some() && self.climate.last_update_ms() != updated_before {
            let c = climate.command;
            events.push(ControlEvent::ClimateUpdated {
                fan_stage: c.fan_stage,
                ac_on: c.ac_on,
                blend_pct: c.blend_pct,
            });
        }

        let statuses = [
            (Function::Autobrake, brake.status),
            (Function::Wipers, wipe.status),
            (Function::SpeedGov, gov.status),
            (Function::Autopark, park.status),
            (Function::Climate, climate.status),
        ];
        self.log_status_changes(now_ms, &statuses);
        for event in &events {
            tracing::debug!(now_ms, event = %event, "control event");
        }
        self.ticks += 1;

        Ok(TickReport {
            now_ms,
            frame,
            statuses,
            events,
        })
    }

    fn log_status_changes(&mut self, now_ms: u32, statuses: &[(Function, StepStatus); 5]) {
        for (function, status) in statuses {
            let last = &mut self.last_status[function.index()];
            if *last == *status {
                continue;
            }
            match status {
                StepStatus::Inhibited(why) => {
                    tracing::debug!(now_ms, function = %function, reason = %why, "inhibited");
                }
                StepStatus::Active => {
                    tracing::debug!(now_ms, function = %function, "active");
                }
            }
            *last = *status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AUTOBRAKE_DEBOUNCE_COUNT;
    use crate::mocks::SteadySensors;
    use ecu_sim::SimActuators;
    use ecu_traits::ManualClock;

    fn ecu() -> Ecu<SteadySensors, SimActuators> {
        Ecu::builder()
            .with_sensors(SteadySensors::new())
            .with_actuators(SimActuators::new())
            .with_clock(Arc::new(ManualClock::starting_at(1_000)))
            .build()
            .unwrap()
    }

    #[test]
    fn out_of_range_state_fails_tick_before_any_write() {
        let mut e = ecu();
        e.tick().unwrap();
        let writes = e.actuators().writes();

        e.autobrake
            .hit_count_mut()
            .force_count(AUTOBRAKE_DEBOUNCE_COUNT + 1);
        let err = e.tick().unwrap_err();

        match err.downcast_ref::<EcuError>() {
            Some(EcuError::Invariant(msg)) => assert!(msg.contains("autobrake"), "{msg}"),
            other => panic!("expected invariant error, got {other:?}"),
        }
        assert_eq!(e.actuators().writes(), writes);
        assert_eq!(e.ticks(), 1);
    }

    #[test]
    fn consistent_state_passes_check() {
        let mut e = ecu();
        for _ in 0..5 {
            e.tick().unwrap();
        }
        assert!(e.check_invariants().is_ok());
    }
}
