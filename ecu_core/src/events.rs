//! State transitions observed by the tick driver.

use std::fmt;

use ecu_traits::WiperMode;

use crate::autopark::ParkPhase;

/// A notable controller transition on one tick.
///
/// Events are notifications only; nothing in the engine consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// First brake-qualifying distance after a clear one.
    BelowBrakeThreshold,
    BrakeAsserted,
    BrakeDeasserted,
    WiperModeChanged { from: WiperMode, to: WiperMode },
    /// Rain sample was stale; the committed mode was re-issued.
    WiperStaleHold,
    SpeedLimitAdopted { kph: u16 },
    OverspeedAlarm,
    AlarmCleared,
    ParkPhaseChanged { from: ParkPhase, to: ParkPhase },
    ClimateUpdated { fan_stage: u8, ac_on: bool, blend_pct: u8 },
}

impl ControlEvent {
    /// Short machine-friendly name.
    pub fn kind(&self) -> &'static str {
        match self {
            ControlEvent::BelowBrakeThreshold => "below_brake_threshold",
            ControlEvent::BrakeAsserted => "brake_asserted",
            ControlEvent::BrakeDeasserted => "brake_deasserted",
            ControlEvent::WiperModeChanged { .. } => "wiper_mode_changed",
            ControlEvent::WiperStaleHold => "wiper_stale_hold",
            ControlEvent::SpeedLimitAdopted { .. } => "speed_limit_adopted",
            ControlEvent::OverspeedAlarm => "overspeed_alarm",
            ControlEvent::AlarmCleared => "alarm_cleared",
            ControlEvent::ParkPhaseChanged { .. } => "park_phase_changed",
            ControlEvent::ClimateUpdated { .. } => "climate_updated",
        }
    }
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlEvent::WiperModeChanged { from, to } => write!(f, "wipers {from} -> {to}"),
            ControlEvent::SpeedLimitAdopted { kph } => write!(f, "speed limit {kph} kph"),
            ControlEvent::ParkPhaseChanged { from, to } => write!(f, "autopark {from} -> {to}"),
            ControlEvent::ClimateUpdated {
                fan_stage,
                ac_on,
                blend_pct,
            } => write!(f, "climate fan={fan_stage} ac={ac_on} blend={blend_pct}%"),
            other => f.write_str(other.kind()),
        }
    }
}
