//! Human-readable error descriptions, exit codes and structured JSON error formatting.

use std::fmt;

use ecu_core::error::{BuildError, EcuError};

/// Which input a failure came from; attached as `wrap_err` context so the
/// exit code can be picked by downcasting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Config(String),
    Scenario(String),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Config(p) => write!(f, "invalid configuration ({p})"),
            Stage::Scenario(p) => write!(f, "invalid scenario ({p})"),
        }
    }
}

/// Innermost message, without the context chain.
fn root_message(err: &eyre::Report) -> String {
    err.chain()
        .last()
        .map_or_else(|| err.to_string(), ToString::to_string)
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensors => {
                "What happened: No sensor source was provided to the engine.\nLikely causes: The scenario backend was not wired into the builder.\nHow to fix: Pass the sensors via with_sensors(...).".to_string()
            }
            BuildError::MissingActuators => {
                "What happened: No actuator sink was provided to the engine.\nLikely causes: The actuator backend was not wired into the builder.\nHow to fix: Pass the actuators via with_actuators(...).".to_string()
            }
        };
    }

    if let Some(ee) = err.downcast_ref::<EcuError>() {
        return match ee {
            EcuError::Timeout => format!(
                "What happened: An actuator write timed out ({err}).\nLikely causes: The actuator backend stopped responding.\nHow to fix: Check the backend, then rerun."
            ),
            EcuError::Invariant(msg) => format!(
                "What happened: Internal consistency check failed: {msg}.\nLikely causes: A controller state left its allowed range. This is a bug.\nHow to fix: Re-run with --log-level=debug and report the scenario that triggers it."
            ),
            EcuError::Actuator(_) | EcuError::ActuatorFault(_) => format!(
                "What happened: {err:#}.\nLikely causes: The actuator backend rejected a command.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    if let Some(stage) = err.downcast_ref::<Stage>() {
        let cause = root_message(err);
        return match stage {
            Stage::Config(path) => format!(
                "What happened: Invalid configuration in {path}: {cause}.\nLikely causes: Missing file, bad TOML syntax, or out-of-range values.\nHow to fix: Edit the config file, then rerun. See etc/ecu_config.toml for a sample."
            ),
            Stage::Scenario(path) => format!(
                "What happened: Could not load scenario {path}: {cause}.\nLikely causes: Missing file, wrong header, an unparsable cell, or rows out of time order.\nHow to fix: Check the CSV header and the reported row, then rerun."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes; 2 is left to clap for usage errors.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(ee) = err.downcast_ref::<EcuError>() {
        return match ee {
            EcuError::Invariant(_) => 6,
            EcuError::Actuator(_) | EcuError::ActuatorFault(_) | EcuError::Timeout => 5,
        };
    }
    match err.downcast_ref::<Stage>() {
        Some(Stage::Config(_)) => 3,
        Some(Stage::Scenario(_)) => 4,
        None => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    match exit_code_for_error(err) {
        3 => "Config",
        4 => "Scenario",
        5 => "Actuator",
        6 => "Invariant",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
