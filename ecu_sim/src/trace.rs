use std::fs::File;
use std::io::Write;
use std::path::Path;

use ecu_traits::ActuatorFrame;

use crate::error::Result;

pub const TRACE_HEADER: [&str; 9] = [
    "ms",
    "brake",
    "wiper_mode",
    "alarm",
    "limit_req",
    "fan_stage",
    "ac_on",
    "blend",
    "park_step",
];

/// Per-tick actuator trace, one CSV line per tick.
///
/// `limit_req` is left empty on ticks that issued no limit request.
pub struct OutputLog<W: Write> {
    wtr: csv::Writer<W>,
    rows: u64,
}

impl OutputLog<File> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W: Write> OutputLog<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut wtr = csv::Writer::from_writer(inner);
        wtr.write_record(TRACE_HEADER)?;
        Ok(Self { wtr, rows: 0 })
    }

    pub fn record(&mut self, now_ms: u32, frame: &ActuatorFrame) -> Result<()> {
        let flag = |b: bool| if b { "1" } else { "0" };
        self.wtr.write_record([
            now_ms.to_string().as_str(),
            flag(frame.brake),
            frame.wiper_mode.code().to_string().as_str(),
            flag(frame.alarm),
            frame
                .limit_request_kph
                .map(|k| k.to_string())
                .unwrap_or_default()
                .as_str(),
            frame.climate.fan_stage.to_string().as_str(),
            flag(frame.climate.ac_on),
            frame.climate.blend_pct.to_string().as_str(),
            frame.park_prompt.code().to_string().as_str(),
        ])?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn flush(&mut self) -> Result<()> {
        self.wtr.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| crate::error::SimError::Io(e.error().to_string()))
    }
}
