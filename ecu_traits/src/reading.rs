//! Timestamped sensor sample contract.

use thiserror::Error;

/// Why a reading cannot be acted upon this tick.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// The acquisition path itself reported a failure.
    #[error("sensor reported invalid sample")]
    Invalid,
    /// Structurally valid, but older than the allowed window.
    #[error("sensor sample stale ({age_ms} ms old)")]
    Stale { age_ms: u32 },
}

/// A sensor value together with its capture time and a validity flag.
///
/// Backends fill `captured_at_ms` from the same [`Clock`](crate::Clock) the
/// engine reads `now_ms` from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading<T> {
    pub value: T,
    pub captured_at_ms: u32,
    pub valid: bool,
}

impl<T> Reading<T> {
    /// A valid sample captured at `captured_at_ms`.
    pub fn new(value: T, captured_at_ms: u32) -> Self {
        Self {
            value,
            captured_at_ms,
            valid: true,
        }
    }

    /// Age of the sample at `now_ms`.
    ///
    /// Uses wrapping subtraction: a clock rollover between capture and use
    /// yields the true age, and a capture time ahead of `now_ms` yields a
    /// very large age (and therefore a stale sample).
    #[inline]
    pub fn age_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.captured_at_ms)
    }
}

impl<T: Default> Reading<T> {
    /// A failed acquisition.
    pub fn invalid() -> Self {
        Self {
            value: T::default(),
            captured_at_ms: 0,
            valid: false,
        }
    }
}

impl<T: Copy> Reading<T> {
    /// Return the value if the sample is valid and no older than `stale_after_ms`.
    ///
    /// An age exactly equal to `stale_after_ms` is still usable.
    pub fn check(&self, now_ms: u32, stale_after_ms: u32) -> Result<T, SensorFault> {
        if !self.valid {
            return Err(SensorFault::Invalid);
        }
        let age_ms = self.age_ms(now_ms);
        if age_ms > stale_after_ms {
            return Err(SensorFault::Stale { age_ms });
        }
        Ok(self.value)
    }

    /// `check` collapsed to an `Option`, for inputs that are optional.
    pub fn usable(&self, now_ms: u32, stale_after_ms: u32) -> Option<T> {
        self.check(now_ms, stale_after_ms).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_reading_passes() {
        let r = Reading::new(42u16, 1_000);
        assert_eq!(r.check(1_050, 100), Ok(42));
    }

    #[test]
    fn age_at_window_edge_is_usable() {
        let r = Reading::new(1u8, 1_000);
        assert_eq!(r.check(1_100, 100), Ok(1));
        assert_eq!(
            r.check(1_101, 100),
            Err(SensorFault::Stale { age_ms: 101 })
        );
    }

    #[test]
    fn invalid_wins_over_fresh_timestamp() {
        let r: Reading<u16> = Reading::invalid();
        assert_eq!(r.check(0, 100), Err(SensorFault::Invalid));
    }

    #[test]
    fn capture_across_rollover_is_fresh() {
        let r = Reading::new(7i16, u32::MAX - 9);
        assert_eq!(r.age_ms(20), 30);
        assert_eq!(r.check(20, 100), Ok(7));
    }

    #[test]
    fn capture_in_the_future_is_stale() {
        let r = Reading::new(7i16, 500);
        assert!(matches!(r.check(400, 100), Err(SensorFault::Stale { .. })));
    }
}
