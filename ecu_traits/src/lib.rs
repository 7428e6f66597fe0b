pub mod clock;
pub mod reading;
pub mod types;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use reading::{Reading, SensorFault};
pub use types::{ActuatorFrame, ClimateCommand, ParkGap, ParkPrompt, WiperMode};

/// Error type used at the HAL trait boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Pull-based sensor access, one call per sensor per tick.
///
/// Temperatures are tenths of a degree Celsius.
pub trait Sensors {
    /// Called once at the start of every tick, before any read.
    fn sample(&mut self, _now_ms: u32) {}

    /// True once a finite source (e.g. a replay) has nothing more to offer.
    fn exhausted(&self) -> bool {
        false
    }

    fn vehicle_ready(&mut self) -> bool;
    fn driver_brake_pressed(&mut self) -> bool;
    fn distance_mm(&mut self) -> Reading<u16>;
    fn rain_pct(&mut self) -> Reading<u8>;
    fn speed_kph(&mut self) -> Reading<u16>;
    /// One-shot: returns `Some` exactly once per newly recognised limit.
    fn poll_speed_limit_kph(&mut self) -> Option<u16>;
    fn parking_gap(&mut self) -> Reading<ParkGap>;
    fn cabin_temp_x10(&mut self) -> Reading<i16>;
    fn ambient_temp_x10(&mut self) -> Reading<i16>;
    fn humidity_pct(&mut self) -> Reading<u8>;

    /// One-shot: a new cabin temperature target.
    fn poll_setpoint_x10(&mut self) -> Option<i16> {
        None
    }
}

/// One-shot actuator writes, issued every tick.
pub trait Actuators {
    fn set_brake_request(&mut self, on: bool) -> Result<(), BoxError>;
    fn set_wiper_mode(&mut self, mode: WiperMode) -> Result<(), BoxError>;
    fn set_alarm(&mut self, on: bool) -> Result<(), BoxError>;
    fn set_speed_limit_request(&mut self, kph: u16) -> Result<(), BoxError>;
    fn set_climate(&mut self, cmd: ClimateCommand) -> Result<(), BoxError>;
    fn set_parking_prompt(&mut self, prompt: ParkPrompt) -> Result<(), BoxError>;
}
