//! De-duplication of "session expired" handling.
//!
//! Several in-flight requests can all come back 401 for the same expiry.
//! Only the first one of an episode notifies and redirects; the episode ends
//! `cooldown_ms` after its redirect was issued.

#[cfg(test)]
#[path = "expiry_test.rs"]
mod expiry_test;

#[derive(Clone, Copy, Debug, PartialEq)]
enum LatchState {
    Idle,
    Redirecting,
    Cooldown { until_ms: f64 },
}

#[derive(Clone, Debug)]
pub struct ExpiryLatch {
    state: LatchState,
    cooldown_ms: f64,
}

impl ExpiryLatch {
    pub fn new(cooldown_ms: u32) -> Self {
        Self { state: LatchState::Idle, cooldown_ms: f64::from(cooldown_ms) }
    }

    /// Try to start a new expiry episode at `now_ms`.
    ///
    /// Returns `false` while an episode is redirecting or cooling down.
    pub fn try_begin(&mut self, now_ms: f64) -> bool {
        let open = !self.is_suppressed(now_ms);
        if open {
            self.state = LatchState::Redirecting;
        }
        open
    }

    /// Mark the login redirect as issued; suppression lasts one more cooldown.
    pub fn redirect_done(&mut self, now_ms: f64) {
        if self.state == LatchState::Redirecting {
            self.state = LatchState::Cooldown { until_ms: now_ms + self.cooldown_ms };
        }
    }

    /// Whether a new episode would be suppressed at `now_ms`.
    pub fn is_suppressed(&self, now_ms: f64) -> bool {
        match self.state {
            LatchState::Idle => false,
            LatchState::Redirecting => true,
            LatchState::Cooldown { until_ms } => now_ms < until_ms,
        }
    }
}
