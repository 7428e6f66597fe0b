use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EcuError {
    #[error("actuator error: {0}")]
    Actuator(String),
    #[error("actuator fault: {0}")]
    ActuatorFault(String),
    #[error("actuator timed out")]
    Timeout,
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing sensors")]
    MissingSensors,
    #[error("missing actuators")]
    MissingActuators,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
