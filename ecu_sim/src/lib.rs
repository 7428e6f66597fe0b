//! Simulation backends for the ECU engine: scenario replay sensors,
//! recording actuators and the actuator trace writer.

pub mod actuators;
pub mod error;
pub mod replay;
pub mod trace;

pub use actuators::{Fault, SimActuators, WriteCounts};
pub use error::SimError;
pub use replay::ScenarioSensors;
pub use trace::OutputLog;
