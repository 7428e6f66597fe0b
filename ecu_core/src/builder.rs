//! Type-state builder for [`Ecu`].
//!
//! `build()` only exists once both sensors and actuators were supplied;
//! `try_build()` is always available and reports what is missing.

use std::marker::PhantomData;
use std::sync::Arc;

use ecu_traits::{Actuators, Clock, MonotonicClock, Sensors};

use crate::core::Ecu;
use crate::error::{BuildError, Result};

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

pub struct EcuBuilder<S, A, HasS = Missing, HasA = Missing> {
    sensors: Option<S>,
    actuators: Option<A>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    _s: PhantomData<HasS>,
    _a: PhantomData<HasA>,
}

impl<S: Sensors, A: Actuators> Default for EcuBuilder<S, A, Missing, Missing> {
    fn default() -> Self {
        Self {
            sensors: None,
            actuators: None,
            clock: None,
            _s: PhantomData,
            _a: PhantomData,
        }
    }
}

impl<S: Sensors, A: Actuators> Ecu<S, A> {
    pub fn builder() -> EcuBuilder<S, A, Missing, Missing> {
        EcuBuilder::default()
    }
}

impl<S: Sensors, A: Actuators, HasS, HasA> EcuBuilder<S, A, HasS, HasA> {
    pub fn with_sensors(self, sensors: S) -> EcuBuilder<S, A, Set, HasA> {
        EcuBuilder {
            sensors: Some(sensors),
            actuators: self.actuators,
            clock: self.clock,
            _s: PhantomData,
            _a: PhantomData,
        }
    }

    pub fn with_actuators(self, actuators: A) -> EcuBuilder<S, A, HasS, Set> {
        EcuBuilder {
            sensors: self.sensors,
            actuators: Some(actuators),
            clock: self.clock,
            _s: PhantomData,
            _a: PhantomData,
        }
    }

    /// Inject a clock; defaults to [`MonotonicClock`].
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build without the compile-time guarantee.
    pub fn try_build(self) -> Result<Ecu<S, A>> {
        let sensors = self
            .sensors
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSensors))?;
        let actuators = self
            .actuators
            .ok_or_else(|| eyre::Report::new(BuildError::MissingActuators))?;
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        Ok(Ecu::new(sensors, actuators, clock))
    }
}

impl<S: Sensors, A: Actuators> EcuBuilder<S, A, Set, Set> {
    pub fn build(self) -> Result<Ecu<S, A>> {
        self.try_build()
    }
}
