use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ecu_traits::{Actuators, Sensors};

use crate::config::TICK_MS;
use crate::core::{Ecu, TickReport};
use crate::error::Result;
use crate::metrics::Metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    /// Stop after this many ticks; `None` runs until shutdown or exhaustion.
    pub max_ticks: Option<u64>,
    pub tick_ms: u32,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            max_ticks: None,
            tick_ms: TICK_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    MaxTicks,
    /// The sensor source has nothing more to replay.
    Exhausted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StopReason::Shutdown => "shutdown",
            StopReason::MaxTicks => "max_ticks",
            StopReason::Exhausted => "exhausted",
        })
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub metrics: Metrics,
    pub stop: StopReason,
}

/// Drive `ecu` at a fixed period until shutdown, `max_ticks` or sensor
/// exhaustion. The shutdown flag is only looked at between ticks.
pub fn run<S, A, F>(
    ecu: &mut Ecu<S, A>,
    params: RunParams,
    shutdown: &Arc<AtomicBool>,
    mut on_tick: F,
) -> Result<RunSummary>
where
    S: Sensors,
    A: Actuators,
    F: FnMut(&TickReport) -> Result<()>,
{
    let mut metrics = Metrics::new();
    let clock = Arc::clone(ecu.clock());
    tracing::info!(tick_ms = params.tick_ms, max_ticks = ?params.max_ticks, "run start");

    let stop = loop {
        if shutdown.load(Ordering::Relaxed) {
            break StopReason::Shutdown;
        }
        if params.max_ticks.is_some_and(|max| metrics.ticks >= max) {
            break StopReason::MaxTicks;
        }
        if ecu.sensors().exhausted() {
            break StopReason::Exhausted;
        }

        let started = clock.now_ms();
        let report = match ecu.tick() {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, ticks = metrics.ticks, "tick failed");
                return Err(e);
            }
        };
        metrics.record(&report);
        on_tick(&report)?;

        let spent = clock.ms_since(started);
        if spent > params.tick_ms {
            metrics.overruns += 1;
            tracing::warn!(spent_ms = spent, tick_ms = params.tick_ms, "tick overrun");
        }
        clock.sleep(Duration::from_millis(u64::from(
            params.tick_ms.saturating_sub(spent),
        )));
    };

    tracing::info!(ticks = metrics.ticks, stop = %stop, "run complete");
    Ok(RunSummary {
        ticks: metrics.ticks,
        metrics,
        stop,
    })
}
