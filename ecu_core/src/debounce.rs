//! Bounded consecutive-sample counter shared by the controllers.

/// Counts consecutive qualifying ticks up to a fixed threshold.
///
/// `count` never exceeds `threshold`; once it reaches it the counter is
/// committed and stays so until [`reset`](Self::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceCounter {
    count: u8,
    threshold: u8,
}

impl DebounceCounter {
    /// `threshold` is clamped to at least 1 so a counter can always commit.
    pub const fn new(threshold: u8) -> Self {
        let threshold = if threshold == 0 { 1 } else { threshold };
        Self {
            count: 0,
            threshold,
        }
    }

    /// Record one qualifying tick; returns whether the counter is committed.
    #[inline]
    pub fn hit(&mut self) -> bool {
        if self.count < self.threshold {
            self.count += 1;
        }
        debug_assert!(self.count <= self.threshold);
        self.is_committed()
    }

    /// Restart counting with the current tick as the first qualifying one.
    #[inline]
    pub fn restart(&mut self) {
        self.count = 1;
    }

    #[inline]
    pub fn reset(&mut self) {
        self.count = 0;
    }

    #[inline]
    pub fn count(&self) -> u8 {
        self.count
    }

    #[inline]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    #[inline]
    pub fn is_committed(&self) -> bool {
        self.count >= self.threshold
    }

    /// `0 <= count <= threshold`.
    #[inline]
    pub fn holds_invariant(&self) -> bool {
        self.count <= self.threshold
    }

    /// Overwrite the count without the bound check.
    #[cfg(test)]
    pub(crate) fn force_count(&mut self, count: u8) {
        self.count = count;
    }
}
