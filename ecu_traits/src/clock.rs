use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Millisecond clock shared by the control engine and its HAL backends.
///
/// - now_ms(): monotonic milliseconds as a wrapping `u32` counter
/// - sleep(): waits for the provided duration (implementations may simulate)
///
/// The counter wraps after ~49.7 days; consumers compute ages with
/// `wrapping_sub` so a rollover between capture and use stays correct.
pub trait Clock {
    fn now_ms(&self) -> u32;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch_ms`, using wrapping arithmetic.
    fn ms_since(&self, epoch_ms: u32) -> u32 {
        self.now_ms().wrapping_sub(epoch_ms)
    }
}

/// Real-time monotonic clock backed by `std::time::Instant`.
///
/// Time zero is the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_ms(&self) -> u32 {
        // Truncation to u32 is the documented wrap behaviour.
        self.origin.elapsed().as_millis() as u32
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

/// Deterministic clock whose time only moves when told to.
///
/// `sleep(d)` advances the internal time by `d` without actually sleeping,
/// which lets a scenario replay run as fast as the CPU allows. Clones share
/// the same time source.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU32>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at an arbitrary millisecond value.
    pub fn starting_at(ms: u32) -> Self {
        Self {
            now: Arc::new(AtomicU32::new(ms)),
        }
    }

    /// Advance the clock by `ms`, wrapping at `u32::MAX`.
    pub fn advance_ms(&self, ms: u32) {
        let _ = self
            .now
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(v.wrapping_add(ms))
            });
    }

    /// Set the absolute time.
    pub fn set_ms(&self, ms: u32) {
        self.now.store(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.load(Ordering::Relaxed)
    }

    fn sleep(&self, d: Duration) {
        let ms = u32::try_from(d.as_millis()).unwrap_or(u32::MAX);
        self.advance_ms(ms);
    }
}
