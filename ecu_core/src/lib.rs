#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Tick-based vehicle control engine (hardware-agnostic).
//!
//! Every sensor read and actuator write goes through `ecu_traits::Sensors`
//! and `ecu_traits::Actuators`. Once per tick the [`Ecu`] steps five
//! independent controllers in a fixed order:
//!
//! 1. **Autobrake**: debounced brake request on short obstacle distance
//! 2. **Wipers**: hysteretic four-level rain response
//! 3. **Speed governor**: overspeed alarm against sign-recognised limits
//! 4. **Autopark**: gap scan and fixed maneuver sequence
//! 5. **Climate**: fixed-point PI loop at a 1 s cadence
//!
//! Controllers never share state. A reading that is invalid or older than
//! [`config::STALE_THRESHOLD_MS`] drives the owning controller to its safe
//! output; that outcome is reported as [`StepStatus::Inhibited`], not as an
//! error. The only errors are actuator failures and internal invariant
//! violations.

pub mod autobrake;
pub mod autopark;
pub mod builder;
pub mod climate;
pub mod config;
pub mod core;
pub mod debounce;
pub mod error;
pub mod events;
pub mod hw_error;
pub mod metrics;
pub mod mocks;
pub mod runner;
pub mod speedgov;
pub mod status;
pub mod wipers;

pub use crate::autobrake::{Autobrake, AutobrakeInputs};
pub use crate::autopark::{Autopark, ParkPhase};
pub use crate::builder::EcuBuilder;
pub use crate::climate::{Climate, ClimateInputs};
pub use crate::core::{Ecu, TickReport};
pub use crate::debounce::DebounceCounter;
pub use crate::error::{BuildError, EcuError, Result};
pub use crate::events::ControlEvent;
pub use crate::metrics::Metrics;
pub use crate::runner::{RunParams, RunSummary, StopReason, run};
pub use crate::speedgov::{GovernorCommand, SpeedGovernor};
pub use crate::status::{Function, Inhibit, Step, StepStatus};
pub use crate::wipers::Wipers;
