use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("injected fault on {actuator}")]
    Injected { actuator: &'static str },
    #[error("{actuator} write timed out")]
    Timeout { actuator: &'static str },
    #[error("trace io: {0}")]
    Io(String),
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e.to_string())
    }
}

impl From<csv::Error> for SimError {
    fn from(e: csv::Error) -> Self {
        SimError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
