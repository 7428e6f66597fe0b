//! Command and sample types exchanged across the HAL boundary.

use std::fmt;

/// Wiper speed level. The discriminant is the code sent to the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum WiperMode {
    #[default]
    Off = 0,
    Int = 1,
    Low = 2,
    High = 3,
}

impl WiperMode {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for WiperMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WiperMode::Off => "off",
            WiperMode::Int => "int",
            WiperMode::Low => "low",
            WiperMode::High => "high",
        };
        f.write_str(s)
    }
}

/// Side-looking parking gap measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParkGap {
    pub found: bool,
    pub width_mm: u16,
}

/// Driver prompt shown during an automatic parking maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ParkPrompt {
    #[default]
    None = 0,
    Scan = 1,
    Align = 2,
}

impl ParkPrompt {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Climate actuator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClimateCommand {
    pub fan_stage: u8,
    pub ac_on: bool,
    pub blend_pct: u8,
}

impl ClimateCommand {
    /// Fan off, AC off, blend door centred.
    pub const SAFE: ClimateCommand = ClimateCommand {
        fan_stage: 0,
        ac_on: false,
        blend_pct: 50,
    };
}

impl Default for ClimateCommand {
    fn default() -> Self {
        Self::SAFE
    }
}

/// Everything the engine commanded during one tick.
///
/// `limit_request_kph` is `None` on ticks where the speed governor returned
/// through its fault path before issuing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorFrame {
    pub brake: bool,
    pub wiper_mode: WiperMode,
    pub alarm: bool,
    pub limit_request_kph: Option<u16>,
    pub climate: ClimateCommand,
    pub park_prompt: ParkPrompt,
}
