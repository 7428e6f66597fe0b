//! Overspeed alarm against a dynamically updated speed limit.

use ecu_traits::Reading;

use crate::config::{
    SPEEDGOV_DEBOUNCE_COUNT, SPEEDGOV_DEFAULT_LIMIT_KPH, SPEEDGOV_HYSTERESIS_KPH,
    STALE_THRESHOLD_MS,
};
use crate::debounce::DebounceCounter;
use crate::status::Step;

/// What the governor commands for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GovernorCommand {
    pub alarm: bool,
    /// `None` on ticks that never reached the decision logic.
    pub limit_request_kph: Option<u16>,
    /// Limit adopted from a sign event on this tick, if any.
    pub adopted_limit_kph: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct SpeedGovernor {
    current_limit_kph: u16,
    overspeed: DebounceCounter,
    alarm_active: bool,
}

impl Default for SpeedGovernor {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeedGovernor {
    pub fn new() -> Self {
        Self {
            current_limit_kph: SPEEDGOV_DEFAULT_LIMIT_KPH,
            overspeed: DebounceCounter::new(SPEEDGOV_DEBOUNCE_COUNT),
            alarm_active: false,
        }
    }

    pub fn current_limit_kph(&self) -> u16 {
        self.current_limit_kph
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm_active
    }

    pub fn overspeed_count(&self) -> u8 {
        self.overspeed.count()
    }

    pub(crate) fn holds_invariant(&self) -> bool {
        self.overspeed.holds_invariant()
    }

    /// Speed at or below which a raised alarm clears.
    #[inline]
    pub fn clear_threshold_kph(&self) -> u16 {
        self.current_limit_kph.saturating_sub(SPEEDGOV_HYSTERESIS_KPH)
    }

    fn clear(&mut self) {
        self.overspeed.reset();
        self.alarm_active = false;
    }

    /// `new_limit_kph` is the one-shot sign event polled this tick.
    pub fn step(
        &mut self,
        now_ms: u32,
        speed_kph: Reading<u16>,
        new_limit_kph: Option<u16>,
    ) -> Step<GovernorCommand> {
        // Zero is not a limit.
        let adopted_limit_kph = new_limit_kph.filter(|&kph| kph > 0);
        if let Some(kph) = adopted_limit_kph {
            self.current_limit_kph = kph;
            self.clear();
        }

        let speed_kph = match speed_kph.check(now_ms, STALE_THRESHOLD_MS) {
            Ok(s) => s,
            Err(fault) => {
                self.clear();
                let cmd = GovernorCommand {
                    alarm: false,
                    limit_request_kph: None,
                    adopted_limit_kph,
                };
                return Step::inhibited(cmd, fault);
            }
        };

        if self.alarm_active {
            if speed_kph <= self.clear_threshold_kph() {
                self.clear();
            }
        } else if speed_kph > self.current_limit_kph {
            if self.overspeed.hit() {
                self.alarm_active = true;
            }
        } else {
            self.overspeed.reset();
        }

        Step::active(GovernorCommand {
            alarm: self.alarm_active,
            limit_request_kph: Some(self.current_limit_kph),
            adopted_limit_kph,
        })
    }
}
