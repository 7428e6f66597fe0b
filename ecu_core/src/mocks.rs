//! Test and helper HAL implementations for ecu_core

use ecu_traits::{
    Actuators, BoxError, ClimateCommand, ParkGap, ParkPrompt, Reading, Sensors, WiperMode,
};

/// Sensors holding fixed values, re-stamped on every `sample`.
///
/// `None` reads as an invalid sample. Every reading is `age_ms` old.
#[derive(Debug, Clone)]
pub struct SteadySensors {
    now_ms: u32,
    pub vehicle_ready: bool,
    pub driver_brake: bool,
    pub distance_mm: Option<u16>,
    pub rain_pct: Option<u8>,
    pub speed_kph: Option<u16>,
    pub gap: Option<ParkGap>,
    pub cabin_x10: Option<i16>,
    pub ambient_x10: Option<i16>,
    pub humidity_pct: Option<u8>,
    /// Consumed by the next poll.
    pub pending_limit_kph: Option<u16>,
    pub pending_setpoint_x10: Option<i16>,
    pub age_ms: u32,
}

impl Default for SteadySensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SteadySensors {
    /// Open road, dry, parked at the cabin setpoint.
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            vehicle_ready: true,
            driver_brake: false,
            distance_mm: Some(5_000),
            rain_pct: Some(0),
            speed_kph: Some(0),
            gap: Some(ParkGap::default()),
            cabin_x10: Some(220),
            ambient_x10: None,
            humidity_pct: None,
            pending_limit_kph: None,
            pending_setpoint_x10: None,
            age_ms: 0,
        }
    }

    fn read<T: Copy + Default>(&self, v: Option<T>) -> Reading<T> {
        v.map_or_else(Reading::invalid, |v| {
            Reading::new(v, self.now_ms.wrapping_sub(self.age_ms))
        })
    }
}

impl Sensors for SteadySensors {
    fn sample(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
    }

    fn vehicle_ready(&mut self) -> bool {
        self.vehicle_ready
    }

    fn driver_brake_pressed(&mut self) -> bool {
        self.driver_brake
    }

    fn distance_mm(&mut self) -> Reading<u16> {
        self.read(self.distance_mm)
    }

    fn rain_pct(&mut self) -> Reading<u8> {
        self.read(self.rain_pct)
    }

    fn speed_kph(&mut self) -> Reading<u16> {
        self.read(self.speed_kph)
    }

    fn poll_speed_limit_kph(&mut self) -> Option<u16> {
        self.pending_limit_kph.take()
    }

    fn parking_gap(&mut self) -> Reading<ParkGap> {
        self.read(self.gap)
    }

    fn cabin_temp_x10(&mut self) -> Reading<i16> {
        self.read(self.cabin_x10)
    }

    fn ambient_temp_x10(&mut self) -> Reading<i16> {
        self.read(self.ambient_x10)
    }

    fn humidity_pct(&mut self) -> Reading<u8> {
        self.read(self.humidity_pct)
    }

    fn poll_setpoint_x10(&mut self) -> Option<i16> {
        self.pending_setpoint_x10.take()
    }
}

/// Actuators that accept and drop every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullActuators;

impl Actuators for NullActuators {
    fn set_brake_request(&mut self, _on: bool) -> Result<(), BoxError> {
        Ok(())
    }

    fn set_wiper_mode(&mut self, _mode: WiperMode) -> Result<(), BoxError> {
        Ok(())
    }

    fn set_alarm(&mut self, _on: bool) -> Result<(), BoxError> {
        Ok(())
    }

    fn set_speed_limit_request(&mut self, _kph: u16) -> Result<(), BoxError> {
        Ok(())
    }

    fn set_climate(&mut self, _cmd: ClimateCommand) -> Result<(), BoxError> {
        Ok(())
    }

    fn set_parking_prompt(&mut self, _prompt: ParkPrompt) -> Result<(), BoxError> {
        Ok(())
    }
}
