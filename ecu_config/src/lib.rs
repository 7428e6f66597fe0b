#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Run configuration and scenario parsing for the ECU simulator.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The scenario CSV loader enforces its column set and row ordering.
use serde::Deserialize;

pub mod scenario;

pub use scenario::{ScenarioRow, load_scenario_csv, parse_scenario};

/// Upper bound for `run.tail_ms` (10 min).
pub const MAX_TAIL_MS: u32 = 600_000;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
pub const LOG_ROTATIONS: [&str; 3] = ["never", "daily", "hourly"];

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RunCfg {
    /// Stop after this many ticks (0 = until the scenario is exhausted).
    pub max_ticks: u64,
    /// Pace ticks on the wall clock instead of replaying as fast as possible.
    pub realtime: bool,
    /// Keep ticking this long after the last scenario row.
    pub tail_ms: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioCfg {
    pub path: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OutputsCfg {
    /// Optional actuator trace CSV.
    pub path: Option<String>,
}

/// Vehicle state used when the scenario lacks the matching columns.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct VehicleCfg {
    pub ready: bool,
    pub driver_brake: bool,
}

impl Default for VehicleCfg {
    fn default() -> Self {
        Self {
            ready: true,
            driver_brake: false,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub run: RunCfg,
    #[serde(default)]
    pub scenario: Option<ScenarioCfg>,
    #[serde(default)]
    pub outputs: OutputsCfg,
    #[serde(default)]
    pub vehicle: VehicleCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Run
        if self.run.max_ticks == 0 && self.scenario.is_none() {
            eyre::bail!("run.max_ticks = 0 needs a [scenario] to bound the run");
        }
        if self.run.tail_ms > MAX_TAIL_MS {
            eyre::bail!("run.tail_ms is unreasonably large (>10min)");
        }

        // Scenario
        if let Some(sc) = &self.scenario
            && sc.path.trim().is_empty()
        {
            eyre::bail!("scenario.path must not be empty");
        }

        // Outputs
        if let Some(p) = &self.outputs.path
            && p.trim().is_empty()
        {
            eyre::bail!("outputs.path must not be empty when set");
        }

        // Logging
        if let Some(level) = &self.logging.level
            && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            eyre::bail!(
                "logging.level must be one of {}, got {level:?}",
                LOG_LEVELS.join("|")
            );
        }
        if let Some(rot) = &self.logging.rotation
            && !LOG_ROTATIONS.contains(&rot.to_ascii_lowercase().as_str())
        {
            eyre::bail!(
                "logging.rotation must be one of {}, got {rot:?}",
                LOG_ROTATIONS.join("|")
            );
        }

        Ok(())
    }
}
