#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
//! `ecu` command-line entry point.

mod cli;
mod error_fmt;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use ecu_config::Logging;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error hooks: {e}");
    }

    if let Err(err) = dispatch(&cli) {
        tracing::error!(error = %format!("{err:#}"), "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn dispatch(cli: &Cli) -> eyre::Result<()> {
    if matches!(cli.cmd, Commands::Health) {
        if cli.json {
            println!("{}", serde_json::json!({ "status": "ok" }));
        } else {
            println!("ok");
        }
        return Ok(());
    }

    let cfg = run::load_config(&cli.config, &cli.cmd)?;
    init_tracing(cli.json, &cli.log_level, &cfg.logging);
    tracing::debug!(config = %cli.config.display(), "config loaded");
    let rows = run::load_rows(&cfg)?;

    match cli.cmd {
        Commands::Run { .. } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            if let Err(e) = ctrlc::set_handler(move || {
                flag.store(true, Ordering::SeqCst);
            }) {
                tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            }
            let (summary, last) = run::run_scenario(&cfg, rows, &shutdown)?;
            println!("{}", run::render_summary(&summary, &last, cli.json));
        }
        Commands::SelfCheck => {
            let check = run::self_check(&cfg, rows)?;
            println!("{}", check.render(cli.json));
        }
        Commands::Health => {}
    }
    Ok(())
}

/// Console logs go to stderr so stdout carries only the command output.
/// `RUST_LOG` overrides `--log-level`; the optional file sink writes JSON
/// lines at `[logging].level`.
fn init_tracing(json: bool, level: &str, logging: &Logging) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_filter)
            .boxed()
    };

    let file = logging.file.as_deref().map(|path| {
        let path = Path::new(path);
        let dir = path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "ecu.log".into(), ToOwned::to_owned);
        let rotation = match logging.rotation.as_deref().map(str::to_ascii_lowercase) {
            Some(r) if r == "daily" => Rotation::DAILY,
            Some(r) if r == "hourly" => Rotation::HOURLY,
            _ => Rotation::NEVER,
        };
        let (writer, guard) =
            tracing_appender::non_blocking(RollingFileAppender::new(rotation, dir, name));
        let _ = FILE_GUARD.set(guard);
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(EnvFilter::new(logging.level.as_deref().unwrap_or("info")))
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();
}
