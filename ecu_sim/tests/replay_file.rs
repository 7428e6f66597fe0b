use ecu_config::{VehicleCfg, load_scenario_csv};
use ecu_sim::{OutputLog, ScenarioSensors};
use ecu_traits::{ActuatorFrame, Sensors};
use rstest::rstest;
use std::io::Write;

const HEADER: &str = "ms,distance_mm,rain_pct,speed_kph,sign_event,gap_found,gap_width_mm,cabin_tc_x10,ambient_tc_x10,humid_pct,setpoint_x10,vehicle_ready";

fn scenario_file() -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "{HEADER}").unwrap();
    writeln!(f, "0,5000,0,30,0,0,0,220,250,40,0,1").unwrap();
    writeln!(f, "10,1000,30,35,60,1,5500,221,250,40,0,0").unwrap();
    writeln!(f, "20,900,30,35,0,1,5500,,250,,0,").unwrap();
    f
}

#[rstest]
#[case(0, 1, true)]
#[case(15, 2, false)]
#[case(25, 3, true)]
fn replays_rows_due_at_each_time(
    #[case] now_ms: u32,
    #[case] applied: usize,
    #[case] ready: bool,
) {
    let rows = load_scenario_csv(scenario_file().path()).unwrap();
    let mut s = ScenarioSensors::new(rows, VehicleCfg::default());
    s.sample(now_ms);
    assert_eq!(s.rows_applied(), applied);
    assert_eq!(s.vehicle_ready(), ready);
}

#[test]
fn invalid_cells_surface_as_invalid_readings() {
    let rows = load_scenario_csv(scenario_file().path()).unwrap();
    let mut s = ScenarioSensors::new(rows, VehicleCfg::default());
    s.sample(20);
    assert!(!s.cabin_temp_x10().valid);
    assert!(!s.humidity_pct().valid);
    assert!(s.parking_gap().valid);
    assert_eq!(s.parking_gap().value.width_mm, 5500);
    assert_eq!(s.poll_speed_limit_kph(), Some(60));
    assert!(s.exhausted());
}

#[test]
fn trace_file_round_trips_through_csv_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("outputs.csv");
    let mut log = OutputLog::create(&path).unwrap();
    for ms in [0, 10, 20] {
        log.record(ms, &ActuatorFrame::default()).unwrap();
    }
    log.flush().unwrap();
    drop(log);

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    assert_eq!(rdr.headers().unwrap().len(), 9);
    assert_eq!(rdr.records().count(), 3);
}
