//! Run-level evaluation counters folded from tick reports.

use crate::core::TickReport;
use crate::events::ControlEvent;
use crate::status::Function;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub ticks: u64,
    inhibited: [u64; 5],
    /// First tick a brake-qualifying distance was seen.
    pub first_below_ms: Option<u32>,
    /// First tick the brake request was asserted.
    pub first_assert_ms: Option<u32>,
    pub brake_assertions: u32,
    pub wiper_transitions: u32,
    pub wiper_stale_holds: u64,
    pub alarms_raised: u32,
    pub limit_updates: u32,
    pub parks_completed: u32,
    pub climate_updates: u32,
    /// Ticks whose wall time exceeded the tick period.
    pub overruns: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        for (function, status) in &report.statuses {
            if status.is_inhibited() {
                self.inhibited[function.index()] += 1;
            }
        }
        for event in &report.events {
            match *event {
                ControlEvent::BelowBrakeThreshold => {
                    self.first_below_ms.get_or_insert(report.now_ms);
                }
                ControlEvent::BrakeAsserted => {
                    self.brake_assertions += 1;
                    self.first_assert_ms.get_or_insert(report.now_ms);
                }
                ControlEvent::WiperModeChanged { .. } => self.wiper_transitions += 1,
                ControlEvent::WiperStaleHold => self.wiper_stale_holds += 1,
                ControlEvent::OverspeedAlarm => self.alarms_raised += 1,
                ControlEvent::SpeedLimitAdopted { .. } => self.limit_updates += 1,
                ControlEvent::ParkPhaseChanged { to, .. }
                    if to == crate::autopark::ParkPhase::Done =>
                {
                    self.parks_completed += 1;
                }
                ControlEvent::ClimateUpdated { .. } => self.climate_updates += 1,
                _ => {}
            }
        }
    }

    pub fn inhibited(&self, function: Function) -> u64 {
        self.inhibited[function.index()]
    }

    /// Detect-to-assert latency of the first autobrake intervention.
    pub fn autobrake_reaction_ms(&self) -> Option<u32> {
        match (self.first_below_ms, self.first_assert_ms) {
            (Some(below), Some(assert)) => Some(assert.wrapping_sub(below)),
            _ => None,
        }
    }
}
