#![forbid(unsafe_code)]

//! Auto-advance timing, reconciled against declared state.
//!
//! [`AutoAdvance`] holds at most one armed deadline. The host loop calls
//! [`reconcile`](AutoAdvance::reconcile) with the sequencer's currently
//! declared deadline after every dispatch, then [`poll`](AutoAdvance::poll)
//! to learn whether the armed deadline has come due. A fire is reported at
//! most once per armed deadline, and reconciling to a different deadline
//! (or to none) replaces the pending one synchronously. There are no
//! threads and no detached timer handles to leak.
//!
//! # Invariants
//!
//! 1. At most one deadline is armed at a time.
//! 2. `poll` reports a given armed deadline at most once, then disarms.
//! 3. `reconcile(None)` cancels any pending deadline without firing it.
//!
//! # Failure Modes
//!
//! - Polling while disarmed: `false`, no state change.
//! - Reconciling to the already-armed deadline: no-op, the pending fire is
//!   neither reset nor duplicated.

use std::time::Instant;

use tracing::trace;

/// A single armed auto-advance deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoAdvance {
    armed: Option<Instant>,
}

impl AutoAdvance {
    /// Create a disarmed timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the armed deadline in line with the declared one.
    ///
    /// Arms, re-arms, or cancels as needed; an unchanged declaration is a
    /// no-op.
    pub fn reconcile(&mut self, deadline: Option<Instant>) {
        if self.armed != deadline {
            trace!(
                was_armed = self.armed.is_some(),
                now_armed = deadline.is_some(),
                "auto-advance reconciled"
            );
            self.armed = deadline;
        }
    }

    /// Report whether the armed deadline has come due, disarming if so.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.armed {
            Some(deadline) if now >= deadline => {
                self.armed = None;
                trace!("auto-advance fired");
                true
            }
            _ => false,
        }
    }

    /// Cancel any pending deadline without firing it.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Whether a deadline is currently armed.
    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
