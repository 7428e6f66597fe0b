//! Scenario replay: config mapping, engine assembly and the run summary.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use ecu_config::{Config, ScenarioRow};
use ecu_core::config::TICK_MS;
use ecu_core::{Ecu, Function, RunParams, RunSummary};
use ecu_sim::{OutputLog, ScenarioSensors, SimActuators};
use ecu_traits::{ActuatorFrame, Clock, ManualClock, MonotonicClock};
use eyre::WrapErr;
use serde_json::json;

use crate::cli::Commands;
use crate::error_fmt::Stage;

/// Read, override and validate the run configuration.
pub fn load_config(path: &Path, cmd: &Commands) -> eyre::Result<Config> {
    let stage = || Stage::Config(path.display().to_string());
    let text = std::fs::read_to_string(path).wrap_err_with(stage)?;
    let mut cfg = ecu_config::load_toml(&text).wrap_err_with(stage)?;
    cmd.apply_overrides(&mut cfg);
    cfg.validate().wrap_err_with(stage)?;
    Ok(cfg)
}

/// Scenario rows named by the config; none when the config has no scenario.
pub fn load_rows(cfg: &Config) -> eyre::Result<Vec<ScenarioRow>> {
    let Some(sc) = &cfg.scenario else {
        return Ok(Vec::new());
    };
    let rows = ecu_config::load_scenario_csv(Path::new(&sc.path))
        .wrap_err_with(|| Stage::Scenario(sc.path.clone()))?;
    tracing::info!(path = %sc.path, rows = rows.len(), "scenario loaded");
    Ok(rows)
}

fn build_engine(
    cfg: &Config,
    rows: Vec<ScenarioRow>,
    realtime: bool,
) -> eyre::Result<Ecu<ScenarioSensors, SimActuators>> {
    let sensors = ScenarioSensors::new(rows, cfg.vehicle).with_tail_ms(cfg.run.tail_ms);
    // Fast replay starts the clock on the first row so it is never stale on arrival.
    let clock: Arc<dyn Clock + Send + Sync> = if realtime {
        Arc::new(MonotonicClock::new())
    } else {
        Arc::new(ManualClock::starting_at(sensors.start_ms()))
    };
    Ecu::builder()
        .with_sensors(sensors)
        .with_actuators(SimActuators::new())
        .with_clock(clock)
        .build()
}

/// Replay the configured scenario until exhaustion, `max_ticks` or Ctrl-C.
pub fn run_scenario(
    cfg: &Config,
    rows: Vec<ScenarioRow>,
    shutdown: &Arc<AtomicBool>,
) -> eyre::Result<(RunSummary, ActuatorFrame)> {
    let mut ecu = build_engine(cfg, rows, cfg.run.realtime)?;

    let mut trace = match cfg.outputs.path.as_deref() {
        Some(p) => Some(
            OutputLog::create(Path::new(p)).wrap_err_with(|| format!("create output trace {p}"))?,
        ),
        None => None,
    };

    let params = RunParams {
        max_ticks: (cfg.run.max_ticks > 0).then_some(cfg.run.max_ticks),
        tick_ms: TICK_MS,
    };
    tracing::info!(
        realtime = cfg.run.realtime,
        tail_ms = cfg.run.tail_ms,
        outputs = ?cfg.outputs.path,
        "replay start"
    );
    let summary = ecu_core::run(&mut ecu, params, shutdown, |report| {
        if let Some(t) = trace.as_mut() {
            t.record(report.now_ms, &report.frame)
                .wrap_err("write output trace")?;
        }
        Ok(())
    })?;

    if let Some(mut t) = trace {
        t.flush().wrap_err("flush output trace")?;
        tracing::info!(rows = t.rows(), "output trace written");
    }
    Ok((summary, ecu.actuators().frame()))
}

/// Build the engine from the configured inputs and run one tick.
pub fn self_check(cfg: &Config, rows: Vec<ScenarioRow>) -> eyre::Result<SelfCheck> {
    let row_count = rows.len();
    let mut ecu = build_engine(cfg, rows, false)?;
    let report = ecu.tick()?;
    Ok(SelfCheck {
        rows: row_count,
        now_ms: report.now_ms,
        inhibited: Function::ALL
            .into_iter()
            .filter(|f| report.status(*f).is_inhibited())
            .collect(),
    })
}

#[derive(Debug)]
pub struct SelfCheck {
    pub rows: usize,
    pub now_ms: u32,
    /// Functions inhibited on the check tick (expected with an empty scenario).
    pub inhibited: Vec<Function>,
}

impl SelfCheck {
    pub fn render(&self, json: bool) -> String {
        if json {
            return json!({
                "status": "ok",
                "rows": self.rows,
                "now_ms": self.now_ms,
                "inhibited": self.inhibited.iter().map(|f| f.name()).collect::<Vec<_>>(),
            })
            .to_string();
        }
        let names: Vec<_> = self.inhibited.iter().map(|f| f.name()).collect();
        format!(
            "self-check ok: {} scenario rows, first tick at {} ms, inhibited: [{}]",
            self.rows,
            self.now_ms,
            names.join(", ")
        )
    }
}

/// Summary line(s) printed after a run.
pub fn render_summary(summary: &RunSummary, last: &ActuatorFrame, json: bool) -> String {
    let m = &summary.metrics;
    if json {
        let inhibited: serde_json::Map<String, serde_json::Value> = Function::ALL
            .into_iter()
            .map(|f| (f.name().to_string(), json!(m.inhibited(f))))
            .collect();
        return json!({
            "status": "complete",
            "stop": summary.stop.to_string(),
            "ticks": summary.ticks,
            "overruns": m.overruns,
            "autobrake": {
                "reaction_ms": m.autobrake_reaction_ms(),
                "assertions": m.brake_assertions,
            },
            "wipers": {
                "transitions": m.wiper_transitions,
                "stale_holds": m.wiper_stale_holds,
            },
            "speedgov": {
                "alarms": m.alarms_raised,
                "limit_updates": m.limit_updates,
            },
            "autopark": { "completed": m.parks_completed },
            "climate": { "updates": m.climate_updates },
            "inhibited_ticks": inhibited,
            "final": {
                "brake": last.brake,
                "wiper_mode": last.wiper_mode.code(),
                "alarm": last.alarm,
                "limit_req": last.limit_request_kph,
                "fan_stage": last.climate.fan_stage,
                "ac_on": last.climate.ac_on,
                "blend": last.climate.blend_pct,
                "park_prompt": last.park_prompt.code(),
            },
        })
        .to_string();
    }

    let reaction = m
        .autobrake_reaction_ms()
        .map_or_else(|| "n/a".to_string(), |ms| format!("{ms} ms"));
    let inhibited: Vec<String> = Function::ALL
        .into_iter()
        .map(|f| format!("{f}={}", m.inhibited(f)))
        .collect();
    format!(
        "Run complete: {ticks} ticks ({stop})\n\
         autobrake: reaction {reaction}, assertions {assertions}\n\
         wipers: transitions {wt}, stale holds {ws}\n\
         speedgov: alarms {alarms}, limit updates {limits}\n\
         autopark: maneuvers completed {parks}\n\
         climate: updates {climate}\n\
         inhibited ticks: {inhibited}\n\
         overruns: {overruns}",
        ticks = summary.ticks,
        stop = summary.stop,
        assertions = m.brake_assertions,
        wt = m.wiper_transitions,
        ws = m.wiper_stale_holds,
        alarms = m.alarms_raised,
        limits = m.limit_updates,
        parks = m.parks_completed,
        climate = m.climate_updates,
        inhibited = inhibited.join(" "),
        overruns = m.overruns,
    )
}
