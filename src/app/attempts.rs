//! Consecutive-attempt counter shared by the lockout policy on both nodes.
//!
//! The control node owns the authoritative counter; the keypad node keeps
//! a mirror for its UI.  Both count one attempt at the *start* of every
//! enrollment or verify round, so under strict turn-taking they move in
//! lockstep.

/// Counts consecutive failed or interrupted rounds up to a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptCounter {
    count: u8,
    limit: u8,
}

impl AttemptCounter {
    pub const fn new(limit: u8) -> Self {
        Self { count: 0, limit }
    }

    /// Count the start of a round.  Returns the new count.
    pub fn record(&mut self) -> u8 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub const fn count(&self) -> u8 {
        self.count
    }

    pub const fn limit(&self) -> u8 {
        self.limit
    }

    /// The current round is the last one allowed before lockout.
    pub const fn at_limit(&self) -> bool {
        self.count >= self.limit
    }

    /// A round was started past the limit (keypad-side mirror only).
    pub const fn exceeded(&self) -> bool {
        self.count > self.limit
    }
}
