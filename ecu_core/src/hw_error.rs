//! Maps `Box<dyn Error>` from the actuator trait boundary to typed `EcuError`.
//!
//! With the `sim-errors` feature, `ecu_sim::SimError` is downcast for a
//! precise mapping; anything else falls back to string inspection.

use crate::error::EcuError;

pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> EcuError {
    #[cfg(feature = "sim-errors")]
    {
        use ecu_sim::SimError;
        if let Some(sim) = e.downcast_ref::<SimError>() {
            return match sim {
                SimError::Timeout { .. } => EcuError::Timeout,
                other => EcuError::ActuatorFault(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") || s.to_lowercase().contains("timed out") {
        EcuError::Timeout
    } else {
        EcuError::Actuator(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Opaque(&'static str);

    impl std::fmt::Display for Opaque {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Opaque {}

    #[test]
    fn unknown_errors_fall_back_to_message() {
        assert_eq!(
            map_hw_error(&Opaque("bus off")),
            EcuError::Actuator("bus off".into())
        );
        assert_eq!(map_hw_error(&Opaque("write Timeout")), EcuError::Timeout);
    }

    #[cfg(feature = "sim-errors")]
    #[test]
    fn sim_errors_are_downcast() {
        let e = ecu_sim::SimError::Injected { actuator: "alarm" };
        assert!(matches!(map_hw_error(&e), EcuError::ActuatorFault(_)));
        let e = ecu_sim::SimError::Timeout { actuator: "brake" };
        assert_eq!(map_hw_error(&e), EcuError::Timeout);
    }
}
