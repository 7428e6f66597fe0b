//! Per-step status returned by every controller.

use std::fmt;

use ecu_traits::SensorFault;

/// The five control functions, in tick order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Autobrake,
    Wipers,
    SpeedGov,
    Autopark,
    Climate,
}

impl Function {
    pub const ALL: [Function; 5] = [
        Function::Autobrake,
        Function::Wipers,
        Function::SpeedGov,
        Function::Autopark,
        Function::Climate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Autobrake => "autobrake",
            Function::Wipers => "wipers",
            Function::SpeedGov => "speedgov",
            Function::Autopark => "autopark",
            Function::Climate => "climate",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a controller drove its output to the safe default this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inhibit {
    /// A required reading was invalid or stale.
    Sensor(SensorFault),
    VehicleNotReady,
    DriverOverride,
    /// Vehicle too fast (or speed unknown) for parking.
    SpeedTooHigh,
}

impl fmt::Display for Inhibit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inhibit::Sensor(fault) => write!(f, "{fault}"),
            Inhibit::VehicleNotReady => f.write_str("vehicle not ready"),
            Inhibit::DriverOverride => f.write_str("driver override"),
            Inhibit::SpeedTooHigh => f.write_str("speed too high for parking"),
        }
    }
}

impl From<SensorFault> for Inhibit {
    fn from(f: SensorFault) -> Self {
        Inhibit::Sensor(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepStatus {
    /// Decision logic ran on usable inputs.
    #[default]
    Active,
    Inhibited(Inhibit),
}

impl StepStatus {
    pub fn is_inhibited(&self) -> bool {
        matches!(self, StepStatus::Inhibited(_))
    }
}

/// A controller's command for this tick plus how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<T> {
    pub command: T,
    pub status: StepStatus,
}

impl<T> Step<T> {
    #[inline]
    pub fn active(command: T) -> Self {
        Self {
            command,
            status: StepStatus::Active,
        }
    }

    #[inline]
    pub fn inhibited(command: T, why: impl Into<Inhibit>) -> Self {
        Self {
            command,
            status: StepStatus::Inhibited(why.into()),
        }
    }
}
