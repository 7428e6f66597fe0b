use ecu_core::climate::{Climate, ClimateInputs};
use ecu_core::config::{
    AUTOBRAKE_DEBOUNCE_COUNT, BRAKE_THRESH_MM, CLIMATE_INTEGRAL_LIMIT, MAX_FAN_STAGE,
};
use ecu_core::{Autobrake, AutobrakeInputs, DebounceCounter, SpeedGovernor, Wipers};
use ecu_traits::{ClimateCommand, Reading};
use proptest::prelude::*;

fn ready(distance_mm: u16, ts: u32) -> AutobrakeInputs {
    AutobrakeInputs {
        vehicle_ready: true,
        driver_braking: false,
        distance_mm: Reading::new(distance_mm, ts),
    }
}

proptest! {
    #[test]
    fn far_obstacles_never_brake(distances in prop::collection::vec((BRAKE_THRESH_MM + 1)..=u16::MAX, 1..100)) {
        let mut ab = Autobrake::new();
        for (i, d) in distances.into_iter().enumerate() {
            let t = (i as u32) * 10;
            prop_assert!(!ab.step(t, &ready(d, t)).command);
        }
    }

    #[test]
    fn close_obstacle_brakes_exactly_on_debounce_tick(d in 0..=BRAKE_THRESH_MM, start in any::<u32>()) {
        let mut ab = Autobrake::new();
        for i in 1..=u32::from(AUTOBRAKE_DEBOUNCE_COUNT) {
            let t = start.wrapping_add(i * 10);
            let braked = ab.step(t, &ready(d, t)).command;
            prop_assert_eq!(braked, i == u32::from(AUTOBRAKE_DEBOUNCE_COUNT));
        }
    }

    #[test]
    fn override_forces_brake_off(d in any::<u16>(), ready_flag in any::<bool>()) {
        let mut ab = Autobrake::new();
        for t in 0..5u32 {
            let _ = ab.step(t * 10, &ready(0, t * 10));
        }
        let inputs = AutobrakeInputs {
            vehicle_ready: ready_flag,
            driver_braking: true,
            distance_mm: Reading::new(d, 50),
        };
        prop_assert!(!ab.step(50, &inputs).command);
    }

    #[test]
    fn debounce_count_stays_bounded(threshold in 0u8..10, ops in prop::collection::vec(0u8..3, 0..200)) {
        let mut c = DebounceCounter::new(threshold);
        for op in ops {
            match op {
                0 => { c.hit(); }
                1 => c.reset(),
                _ => c.restart(),
            }
            prop_assert!(c.holds_invariant());
            prop_assert!(c.count() <= c.threshold());
        }
    }

    #[test]
    fn wiper_and_governor_counters_stay_bounded(
        samples in prop::collection::vec((any::<u8>(), any::<u16>(), any::<bool>()), 1..300)
    ) {
        let mut w = Wipers::new();
        let mut g = SpeedGovernor::new();
        for (i, (rain, speed, sign)) in samples.into_iter().enumerate() {
            let t = (i as u32) * 10;
            let limit = sign.then_some(speed % 130);
            w.step(t, Reading::new(rain, t));
            let cmd = g.step(t, Reading::new(speed, t), limit).command;
            prop_assert!(w.debounce_count() <= 2);
            prop_assert!(g.overspeed_count() <= 2);
            prop_assert!(g.current_limit_kph() > 0);
            prop_assert_eq!(cmd.alarm, g.alarm_active());
        }
    }

    #[test]
    fn climate_outputs_stay_in_range(
        cabins in prop::collection::vec(-400i16..600, 1..60),
        humidity in prop::option::of(any::<u8>()),
        ambient in prop::option::of(-400i16..600),
    ) {
        let mut c = Climate::new();
        for (i, cabin) in cabins.into_iter().enumerate() {
            let t = 10 + (i as u32) * 1_000;
            let inputs = ClimateInputs {
                cabin_x10: Reading::new(cabin, t),
                ambient_x10: ambient.map_or_else(Reading::invalid, |a| Reading::new(a, t)),
                humidity_pct: humidity.map_or_else(Reading::invalid, |h| Reading::new(h, t)),
                new_setpoint_x10: None,
            };
            let out: ClimateCommand = c.step(t, &inputs).command;
            prop_assert!(out.fan_stage <= MAX_FAN_STAGE);
            prop_assert!([0u8, 50, 100].contains(&out.blend_pct));
            prop_assert!(c.integral().abs() <= CLIMATE_INTEGRAL_LIMIT);
        }
    }
}
