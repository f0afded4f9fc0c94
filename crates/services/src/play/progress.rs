use std::time::Duration;

/// Where the participant is and how long they have left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayProgress {
    /// Zero-based index of the current question.
    pub ordinal: usize,
    pub total: usize,
    pub remaining: Duration,
    pub window: Duration,
    pub is_last: bool,
}

impl PlayProgress {
    /// One-based position, as shown to the participant.
    #[must_use]
    pub fn number(&self) -> usize {
        self.ordinal + 1
    }

    /// Whole seconds left, rounded up so a countdown never shows 0 early.
    #[must_use]
    pub fn remaining_secs(&self) -> u64 {
        let secs = self.remaining.as_secs();
        if self.remaining.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    /// Share of the window still left, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction_remaining(&self) -> f64 {
        if self.window.is_zero() {
            return 0.0;
        }
        (self.remaining.as_secs_f64() / self.window.as_secs_f64()).clamp(0.0, 1.0)
    }
}
