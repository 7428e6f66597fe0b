//! Rain-sensing wiper mode selection.
//!
//! Each level has its own on/off pair of rain thresholds; a candidate mode
//! must be seen on [`WIPERS_DEBOUNCE_COUNT`] consecutive fresh samples before
//! it is commanded. The candidate is derived from the committed mode, so the
//! controller climbs or descends one level per commit.

use ecu_traits::{Reading, SensorFault, WiperMode};

use crate::config::{
    RAIN_THR_HIGH_OFF_PCT, RAIN_THR_HIGH_ON_PCT, RAIN_THR_INT_OFF_PCT, RAIN_THR_INT_ON_PCT,
    RAIN_THR_LOW_OFF_PCT, RAIN_THR_LOW_ON_PCT, STALE_THRESHOLD_MS, WIPERS_DEBOUNCE_COUNT,
};
use crate::debounce::DebounceCounter;
use crate::status::Step;

#[derive(Debug, Clone)]
pub struct Wipers {
    current_mode: WiperMode,
    pending_mode: WiperMode,
    debounce: DebounceCounter,
}

impl Default for Wipers {
    fn default() -> Self {
        Self::new()
    }
}

/// Next candidate mode from `current` given the rain intensity.
pub fn candidate_mode(current: WiperMode, rain_pct: u8) -> WiperMode {
    match current {
        WiperMode::Off if rain_pct >= RAIN_THR_INT_ON_PCT => WiperMode::Int,
        WiperMode::Int if rain_pct < RAIN_THR_INT_OFF_PCT => WiperMode::Off,
        WiperMode::Int if rain_pct >= RAIN_THR_LOW_ON_PCT => WiperMode::Low,
        WiperMode::Low if rain_pct < RAIN_THR_LOW_OFF_PCT => WiperMode::Int,
        WiperMode::Low if rain_pct >= RAIN_THR_HIGH_ON_PCT => WiperMode::High,
        WiperMode::High if rain_pct < RAIN_THR_HIGH_OFF_PCT => WiperMode::Low,
        unchanged => unchanged,
    }
}

impl Wipers {
    pub fn new() -> Self {
        Self {
            current_mode: WiperMode::Off,
            pending_mode: WiperMode::Off,
            debounce: DebounceCounter::new(WIPERS_DEBOUNCE_COUNT),
        }
    }

    pub fn current_mode(&self) -> WiperMode {
        self.current_mode
    }

    pub fn pending_mode(&self) -> WiperMode {
        self.pending_mode
    }

    pub fn debounce_count(&self) -> u8 {
        self.debounce.count()
    }

    pub(crate) fn holds_invariant(&self) -> bool {
        self.debounce.holds_invariant()
    }

    pub fn step(&mut self, now_ms: u32, rain_pct: Reading<u8>) -> Step<WiperMode> {
        let rain_pct = match rain_pct.check(now_ms, STALE_THRESHOLD_MS) {
            Ok(r) => r,
            Err(SensorFault::Invalid) => {
                *self = Self::new();
                return Step::inhibited(WiperMode::Off, SensorFault::Invalid);
            }
            // Stale: keep wiping at the committed mode, debounce untouched.
            Err(stale) => return Step::inhibited(self.current_mode, stale),
        };

        let candidate = candidate_mode(self.current_mode, rain_pct);
        if candidate == self.pending_mode {
            if self.debounce.hit() {
                self.current_mode = candidate;
            }
        } else {
            self.pending_mode = candidate;
            self.debounce.restart();
        }
        Step::active(self.current_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{Inhibit, StepStatus};

    fn feed(w: &mut Wipers, t: &mut u32, rain: u8) -> WiperMode {
        *t += 10;
        w.step(*t, Reading::new(rain, *t)).command
    }

    fn settled_in(mode: WiperMode) -> (Wipers, u32) {
        let rain = match mode {
            WiperMode::Off => 0,
            WiperMode::Int => 30,
            WiperMode::Low => 50,
            WiperMode::High => 90,
        };
        let mut w = Wipers::new();
        let mut t = 0;
        for _ in 0..10 {
            feed(&mut w, &mut t, rain);
        }
        assert_eq!(w.current_mode(), mode);
        (w, t)
    }

    #[test]
    fn twenty_percent_for_two_ticks_turns_on_intermittent() {
        let mut w = Wipers::new();
        let mut t = 0;
        assert_eq!(feed(&mut w, &mut t, 20), WiperMode::Off);
        assert_eq!(feed(&mut w, &mut t, 20), WiperMode::Int);
    }

    #[test]
    fn nineteen_percent_never_turns_on() {
        let mut w = Wipers::new();
        let mut t = 0;
        for _ in 0..20 {
            assert_eq!(feed(&mut w, &mut t, 19), WiperMode::Off);
        }
    }

    #[test]
    fn int_reverts_below_off_threshold_only() {
        let (mut w, mut t) = settled_in(WiperMode::Int);
        for _ in 0..5 {
            assert_eq!(feed(&mut w, &mut t, 16), WiperMode::Int);
        }
        feed(&mut w, &mut t, 14);
        assert_eq!(feed(&mut w, &mut t, 14), WiperMode::Off);
    }

    #[test]
    fn high_drops_one_level_per_commit() {
        let (mut w, mut t) = settled_in(WiperMode::High);
        feed(&mut w, &mut t, 0);
        assert_eq!(feed(&mut w, &mut t, 0), WiperMode::Low);
        feed(&mut w, &mut t, 0);
        assert_eq!(feed(&mut w, &mut t, 0), WiperMode::Int);
    }

    #[test]
    fn invalid_sample_forces_off_immediately() {
        let (mut w, t) = settled_in(WiperMode::Low);
        let step = w.step(t + 10, Reading::invalid());
        assert_eq!(step.command, WiperMode::Off);
        assert_eq!(w.debounce_count(), 0);
        assert_eq!(w.pending_mode(), WiperMode::Off);
    }

    #[test]
    fn stale_sample_holds_mode_and_debounce() {
        let (mut w, t) = settled_in(WiperMode::Low);
        let count = w.debounce_count();
        let step = w.step(t + 500, Reading::new(0, t));
        assert_eq!(step.command, WiperMode::Low);
        assert!(matches!(
            step.status,
            StepStatus::Inhibited(Inhibit::Sensor(SensorFault::Stale { .. }))
        ));
        assert_eq!(w.debounce_count(), count);
    }

    #[test]
    fn alternating_candidates_never_commit() {
        let (mut w, mut t) = settled_in(WiperMode::Int);
        for _ in 0..10 {
            feed(&mut w, &mut t, 45);
            feed(&mut w, &mut t, 25);
        }
        assert_eq!(w.current_mode(), WiperMode::Int);
    }
}
