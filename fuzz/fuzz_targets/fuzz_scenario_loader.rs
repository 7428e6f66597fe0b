#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(rows) = ecu_config::parse_scenario(data) {
        // Accepted scenarios are never empty and never go back in time.
        assert!(!rows.is_empty());
        assert!(rows.windows(2).all(|w| w[0].ms <= w[1].ms));
        for row in &rows {
            let _ = (row.speed_limit_event(), row.setpoint_event(), row.gap());
        }
    }
});
