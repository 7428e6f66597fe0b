use ecu_traits::{
    ActuatorFrame, Actuators, BoxError, ClimateCommand, ParkPrompt, WiperMode,
};

use crate::error::SimError;

/// How the next actuator write should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Reject,
    Timeout,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounts {
    pub brake: u64,
    pub wiper: u64,
    pub alarm: u64,
    pub limit: u64,
    pub climate: u64,
    pub park: u64,
}

/// Actuators that remember the latest command of each kind.
#[derive(Debug, Default)]
pub struct SimActuators {
    frame: ActuatorFrame,
    writes: WriteCounts,
    fail_next: Option<Fault>,
}

impl SimActuators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest commands. `limit_request_kph` keeps the last request issued.
    pub fn frame(&self) -> ActuatorFrame {
        self.frame
    }

    pub fn writes(&self) -> WriteCounts {
        self.writes
    }

    /// Make the next write, whichever actuator it targets, fail.
    pub fn fail_next(&mut self, fault: Fault) {
        self.fail_next = Some(fault);
    }

    fn gate(&mut self, actuator: &'static str) -> Result<(), BoxError> {
        match self.fail_next.take() {
            None => Ok(()),
            Some(Fault::Reject) => Err(Box::new(SimError::Injected { actuator })),
            Some(Fault::Timeout) => Err(Box::new(SimError::Timeout { actuator })),
        }
    }
}

impl Actuators for SimActuators {
    fn set_brake_request(&mut self, on: bool) -> Result<(), BoxError> {
        self.gate("brake")?;
        self.frame.brake = on;
        self.writes.brake += 1;
        Ok(())
    }

    fn set_wiper_mode(&mut self, mode: WiperMode) -> Result<(), BoxError> {
        self.gate("wipers")?;
        self.frame.wiper_mode = mode;
        self.writes.wiper += 1;
        Ok(())
    }

    fn set_alarm(&mut self, on: bool) -> Result<(), BoxError> {
        self.gate("alarm")?;
        self.frame.alarm = on;
        self.writes.alarm += 1;
        Ok(())
    }

    fn set_speed_limit_request(&mut self, kph: u16) -> Result<(), BoxError> {
        self.gate("speed limit")?;
        self.frame.limit_request_kph = Some(kph);
        self.writes.limit += 1;
        Ok(())
    }

    fn set_climate(&mut self, cmd: ClimateCommand) -> Result<(), BoxError> {
        self.gate("climate")?;
        self.frame.climate = cmd;
        self.writes.climate += 1;
        Ok(())
    }

    fn set_parking_prompt(&mut self, prompt: ParkPrompt) -> Result<(), BoxError> {
        self.gate("park prompt")?;
        self.frame.park_prompt = prompt;
        self.writes.park += 1;
        Ok(())
    }
}
