//! Parking maneuver sequencer.
//!
//! Scans for a gap while slow enough, then steps through a fixed-length
//! reverse/straighten/reverse sequence as long as the gap stays in view.

use std::fmt;

use ecu_traits::{ParkGap, ParkPrompt, Reading};

use crate::config::{
    AUTOPARK_DEBOUNCE_COUNT, AUTOPARK_MAX_SPEED_KPH, AUTOPARK_MIN_GAP_MM,
    PARK_REVERSE_LEFT_TICKS, PARK_REVERSE_RIGHT_TICKS, PARK_STRAIGHTEN_TICKS,
    STALE_THRESHOLD_MS,
};
use crate::debounce::DebounceCounter;
use crate::status::{Inhibit, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParkPhase {
    #[default]
    Scanning,
    ReversingRight,
    Straightening,
    ReversingLeft,
    Done,
}

impl ParkPhase {
    /// Ticks spent in a maneuver phase and the phase that follows it.
    fn maneuver(self) -> Option<(u16, ParkPhase)> {
        match self {
            ParkPhase::ReversingRight => {
                Some((PARK_REVERSE_RIGHT_TICKS, ParkPhase::Straightening))
            }
            ParkPhase::Straightening => Some((PARK_STRAIGHTEN_TICKS, ParkPhase::ReversingLeft)),
            ParkPhase::ReversingLeft => Some((PARK_REVERSE_LEFT_TICKS, ParkPhase::Done)),
            ParkPhase::Scanning | ParkPhase::Done => None,
        }
    }

    pub fn prompt(self) -> ParkPrompt {
        match self {
            ParkPhase::Scanning => ParkPrompt::Scan,
            ParkPhase::ReversingRight | ParkPhase::Straightening | ParkPhase::ReversingLeft => {
                ParkPrompt::Align
            }
            ParkPhase::Done => ParkPrompt::None,
        }
    }

    /// Stable numeric code, as written to the output trace.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ParkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParkPhase::Scanning => "scanning",
            ParkPhase::ReversingRight => "reversing-right",
            ParkPhase::Straightening => "straightening",
            ParkPhase::ReversingLeft => "reversing-left",
            ParkPhase::Done => "done",
        };
        f.write_str(s)
    }
}

fn gap_qualifies(gap: ParkGap) -> bool {
    gap.found && gap.width_mm >= AUTOPARK_MIN_GAP_MM
}

#[derive(Debug, Clone)]
pub struct Autopark {
    phase: ParkPhase,
    step_counter: u16,
    gap_detections: DebounceCounter,
    gap_suitable: bool,
}

impl Default for Autopark {
    fn default() -> Self {
        Self::new()
    }
}

impl Autopark {
    pub fn new() -> Self {
        Self {
            phase: ParkPhase::Scanning,
            step_counter: 0,
            gap_detections: DebounceCounter::new(AUTOPARK_DEBOUNCE_COUNT),
            gap_suitable: false,
        }
    }

    pub fn phase(&self) -> ParkPhase {
        self.phase
    }

    pub fn step_counter(&self) -> u16 {
        self.step_counter
    }

    pub fn gap_detections(&self) -> u8 {
        self.gap_detections.count()
    }

    pub fn gap_suitable(&self) -> bool {
        self.gap_suitable
    }

    pub(crate) fn holds_invariant(&self) -> bool {
        let within_phase = match self.phase.maneuver() {
            Some((ticks, _)) => self.step_counter < ticks,
            None => self.step_counter == 0,
        };
        self.gap_detections.holds_invariant() && within_phase
    }

    fn reinit(&mut self, why: Inhibit) -> Step<ParkPrompt> {
        *self = Self::new();
        Step::inhibited(ParkPrompt::None, why)
    }

    pub fn step(
        &mut self,
        now_ms: u32,
        speed_kph: Reading<u16>,
        gap: Reading<ParkGap>,
    ) -> Step<ParkPrompt> {
        match speed_kph.check(now_ms, STALE_THRESHOLD_MS) {
            Ok(kph) if kph <= AUTOPARK_MAX_SPEED_KPH => {}
            Ok(_) => return self.reinit(Inhibit::SpeedTooHigh),
            Err(fault) => return self.reinit(fault.into()),
        }
        let gap = match gap.check(now_ms, STALE_THRESHOLD_MS) {
            Ok(g) => g,
            Err(fault) => return self.reinit(fault.into()),
        };

        match self.phase {
            ParkPhase::Scanning => {
                if gap_qualifies(gap) {
                    if self.gap_detections.hit() {
                        self.gap_suitable = true;
                        self.phase = ParkPhase::ReversingRight;
                        self.step_counter = 0;
                    }
                } else {
                    self.gap_detections.reset();
                    self.gap_suitable = false;
                }
            }
            ParkPhase::Done => {}
            maneuver => {
                if !gap_qualifies(gap) {
                    // Hard abort, no debounce.
                    *self = Self::new();
                } else if let Some((ticks, next)) = maneuver.maneuver() {
                    self.step_counter += 1;
                    if self.step_counter >= ticks {
                        self.phase = next;
                        self.step_counter = 0;
                    }
                }
            }
        }

        Step::active(self.phase.prompt())
    }
}
