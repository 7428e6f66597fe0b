//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "ecu", version, about = "Vehicle ECU simulator")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/ecu_config.toml")]
    pub config: PathBuf,

    /// Print summaries and errors as JSON, log as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a sensor scenario through the control engine
    Run {
        /// Scenario CSV (overrides [scenario].path)
        #[arg(long, value_name = "FILE")]
        scenario: Option<PathBuf>,
        /// Write the per-tick actuator trace here (overrides [outputs].path)
        #[arg(long, value_name = "FILE")]
        outputs: Option<PathBuf>,
        /// Stop after this many ticks (overrides [run].max_ticks)
        #[arg(long, value_name = "N")]
        max_ticks: Option<u64>,
        /// Pace ticks on the wall clock instead of replaying as fast as possible
        #[arg(long, action = ArgAction::SetTrue)]
        realtime: bool,
    },
    /// Load config and scenario, build the engine and run a single tick
    SelfCheck,
    /// Health check for operational monitoring
    Health,
}

impl Commands {
    /// Overrides from `run` that feed config validation.
    pub fn apply_overrides(&self, cfg: &mut ecu_config::Config) {
        if let Commands::Run {
            scenario,
            outputs,
            max_ticks,
            realtime,
        } = self
        {
            if let Some(p) = scenario {
                cfg.scenario = Some(ecu_config::ScenarioCfg {
                    path: p.display().to_string(),
                });
            }
            if let Some(p) = outputs {
                cfg.outputs.path = Some(p.display().to_string());
            }
            if let Some(n) = max_ticks {
                cfg.run.max_ticks = *n;
            }
            cfg.run.realtime |= *realtime;
        }
    }
}
