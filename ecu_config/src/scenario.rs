//! Scenario CSV schema.
//!
//! One row per sensor snapshot, replayed at its `ms` timestamp:
//!
//! ```text
//! ms,distance_mm,rain_pct,speed_kph,sign_event,gap_found,gap_width_mm,cabin_tc_x10,ambient_tc_x10,humid_pct,setpoint_x10
//! 0,5000,0,30,0,0,0,220,250,40,0
//! 10,4000,0,30,60,0,0,220,250,40,
//! ```
//!
//! An empty sensor cell marks that sensor invalid for the row. `voice_cmd`,
//! `vehicle_ready` and `driver_brake` columns are optional.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

pub const REQUIRED_COLUMNS: [&str; 11] = [
    "ms",
    "distance_mm",
    "rain_pct",
    "speed_kph",
    "sign_event",
    "gap_found",
    "gap_width_mm",
    "cabin_tc_x10",
    "ambient_tc_x10",
    "humid_pct",
    "setpoint_x10",
];

pub const OPTIONAL_COLUMNS: [&str; 3] = ["voice_cmd", "vehicle_ready", "driver_brake"];

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ScenarioRow {
    pub ms: u32,
    pub distance_mm: Option<u16>,
    pub rain_pct: Option<u8>,
    pub speed_kph: Option<u16>,
    pub sign_event: Option<u16>,
    pub gap_found: Option<u8>,
    pub gap_width_mm: Option<u16>,
    pub cabin_tc_x10: Option<i16>,
    pub ambient_tc_x10: Option<i16>,
    pub humid_pct: Option<u8>,
    pub setpoint_x10: Option<i16>,
    /// Carried through, never interpreted.
    #[serde(default)]
    pub voice_cmd: Option<String>,
    #[serde(default)]
    pub vehicle_ready: Option<u8>,
    #[serde(default)]
    pub driver_brake: Option<u8>,
}

impl ScenarioRow {
    /// A recognised speed sign on this row.
    pub fn speed_limit_event(&self) -> Option<u16> {
        self.sign_event.filter(|&kph| kph > 0)
    }

    /// A new cabin setpoint on this row.
    pub fn setpoint_event(&self) -> Option<i16> {
        self.setpoint_x10.filter(|&sp| sp != 0)
    }

    /// `(found, width_mm)`, or `None` when either cell is empty.
    pub fn gap(&self) -> Option<(bool, u16)> {
        Some((self.gap_found? != 0, self.gap_width_mm?))
    }
}

fn check_headers(headers: &csv::StringRecord) -> eyre::Result<()> {
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            eyre::bail!(
                "scenario CSV is missing column '{required}', got: {}",
                headers.iter().collect::<Vec<_>>().join(",")
            );
        }
    }
    if let Some(unknown) = headers
        .iter()
        .find(|h| !REQUIRED_COLUMNS.contains(h) && !OPTIONAL_COLUMNS.contains(h))
    {
        eyre::bail!("scenario CSV has unknown column '{unknown}'");
    }
    Ok(())
}

/// Parse scenario rows from any reader.
pub fn parse_scenario<R: Read>(reader: R) -> eyre::Result<Vec<ScenarioRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read scenario CSV headers: {e}"))?
        .clone();
    check_headers(&headers)?;

    let mut rows: Vec<ScenarioRow> = Vec::new();
    for (idx, rec) in rdr.deserialize::<ScenarioRow>().enumerate() {
        let row = match rec {
            Ok(row) => row,
            Err(e) => eyre::bail!("invalid scenario row {}: {}", idx + 2, e),
        };
        if let Some(prev) = rows.last()
            && row.ms < prev.ms
        {
            eyre::bail!(
                "scenario row {} goes back in time ({} ms after {} ms)",
                idx + 2,
                row.ms,
                prev.ms
            );
        }
        rows.push(row);
    }

    if rows.is_empty() {
        eyre::bail!("scenario CSV has no rows");
    }
    Ok(rows)
}

pub fn load_scenario_csv(path: &Path) -> eyre::Result<Vec<ScenarioRow>> {
    let file = std::fs::File::open(path)
        .map_err(|e| eyre::eyre!("open scenario CSV {:?}: {}", path, e))?;
    parse_scenario(file).map_err(|e| e.wrap_err(format!("scenario {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ms,distance_mm,rain_pct,speed_kph,sign_event,gap_found,gap_width_mm,cabin_tc_x10,ambient_tc_x10,humid_pct,setpoint_x10";

    #[test]
    fn empty_cells_read_as_missing() {
        let csv = format!("{HEADER}\n0,,10,30,0,1,,220,,50,0\n");
        let rows = parse_scenario(csv.as_bytes()).unwrap();
        let r = &rows[0];
        assert_eq!(r.distance_mm, None);
        assert_eq!(r.rain_pct, Some(10));
        assert_eq!(r.gap(), None);
        assert_eq!(r.ambient_tc_x10, None);
        assert_eq!(r.speed_limit_event(), None);
        assert_eq!(r.setpoint_event(), None);
    }

    #[test]
    fn optional_columns_are_accepted() {
        let csv = format!(
            "{HEADER},voice_cmd,vehicle_ready,driver_brake\n0,900,0,0,50,0,0,-50,0,0,250,wipers on,1,0\n"
        );
        let rows = parse_scenario(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].voice_cmd.as_deref(), Some("wipers on"));
        assert_eq!(rows[0].vehicle_ready, Some(1));
        assert_eq!(rows[0].cabin_tc_x10, Some(-50));
        assert_eq!(rows[0].speed_limit_event(), Some(50));
        assert_eq!(rows[0].setpoint_event(), Some(250));
    }
}
