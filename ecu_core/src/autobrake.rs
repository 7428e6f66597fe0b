//! Debounced emergency brake request on short obstacle distance.

use ecu_traits::Reading;

use crate::config::{AUTOBRAKE_DEBOUNCE_COUNT, BRAKE_THRESH_MM, STALE_THRESHOLD_MS};
use crate::debounce::DebounceCounter;
use crate::status::{Inhibit, Step};

/// Inputs sampled for one autobrake step.
#[derive(Debug, Clone, Copy)]
pub struct AutobrakeInputs {
    pub vehicle_ready: bool,
    pub driver_braking: bool,
    pub distance_mm: Reading<u16>,
}

#[derive(Debug, Clone)]
pub struct Autobrake {
    hit_count: DebounceCounter,
    brake_active: bool,
}

impl Default for Autobrake {
    fn default() -> Self {
        Self::new()
    }
}

impl Autobrake {
    pub fn new() -> Self {
        Self {
            hit_count: DebounceCounter::new(AUTOBRAKE_DEBOUNCE_COUNT),
            brake_active: false,
        }
    }

    pub fn brake_active(&self) -> bool {
        self.brake_active
    }

    pub fn hit_count(&self) -> u8 {
        self.hit_count.count()
    }

    pub(crate) fn holds_invariant(&self) -> bool {
        self.hit_count.holds_invariant()
    }

    #[cfg(test)]
    pub(crate) fn hit_count_mut(&mut self) -> &mut DebounceCounter {
        &mut self.hit_count
    }

    /// Returns the brake request to command this tick.
    pub fn step(&mut self, now_ms: u32, inputs: &AutobrakeInputs) -> Step<bool> {
        if !inputs.vehicle_ready {
            return self.safe(Inhibit::VehicleNotReady);
        }
        if inputs.driver_braking {
            return self.safe(Inhibit::DriverOverride);
        }
        let distance_mm = match inputs.distance_mm.check(now_ms, STALE_THRESHOLD_MS) {
            Ok(d) => d,
            Err(fault) => return self.safe(fault.into()),
        };

        if distance_mm <= BRAKE_THRESH_MM {
            if self.hit_count.hit() {
                self.brake_active = true;
            }
        } else {
            self.hit_count.reset();
            self.brake_active = false;
        }
        Step::active(self.brake_active)
    }

    fn safe(&mut self, why: Inhibit) -> Step<bool> {
        self.hit_count.reset();
        self.brake_active = false;
        Step::inhibited(false, why)
    }
}
