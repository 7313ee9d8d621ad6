#![forbid(unsafe_code)]

//! The narrative step sequencer.
//!
//! [`StepSequencer`] is the single authority over narrative progress. It
//! owns the current step, applies a shared debounce window across every
//! state-changing operation, and emits lifecycle events through a drained
//! queue rather than callbacks, so the API stays pure and easy to test.
//!
//! Timestamps are injected by the caller; the sequencer never reads the
//! clock itself.
//!
//! # Invariants
//!
//! 1. `current_step` stays in `[1, step_count]` for the sequencer's whole
//!    life.
//! 2. At most one state-changing transition is accepted per debounce
//!    window, across all input sources, because every debounced operation
//!    consults and stamps the same `last_transition` timestamp.
//! 3. [`SequencerEvent::Completed`] is queued at most once, ever. After
//!    that the sequencer is spent: every operation is a no-op.
//! 4. `confirm` is exempt from the debounce check; `skip_to_end` is not.
//! 5. No operation panics or returns an error. Rejections are reported as
//!    [`TransitionOutcome`] variants and are otherwise silent.
//!
//! # Failure Modes
//!
//! - Operation inside the debounce window: `Debounced`, state unchanged.
//! - `regress` at step 1: `AtFloor`, state unchanged.
//! - `confirm` away from the terminal step, or `skip_to_end` already at
//!   it: `Inert`, state unchanged.
//! - Any operation after completion: `Inert`.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the step sequencer.
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Number of narrative steps, `N >= 1`. Default: 3.
    pub step_count: u8,

    /// Minimum interval between accepted state-changing transitions.
    /// Default: 800ms.
    pub debounce_window: Duration,

    /// Auto-advance delay per step, indexed by `step - 1`. `None` (or a
    /// missing entry) means the step never auto-advances.
    /// Default: 5s for step 1, 6s for step 2, none for the terminal step.
    pub auto_advance: Vec<Option<Duration>>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            step_count: 3,
            debounce_window: Duration::from_millis(800),
            auto_advance: vec![
                Some(Duration::from_secs(5)),
                Some(Duration::from_secs(6)),
                None,
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes and events
// ---------------------------------------------------------------------------

/// The result of a sequencer operation. Informational only; rejected
/// transitions are silent no-ops, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The step changed.
    Applied,
    /// Rejected: another transition was accepted inside the debounce
    /// window.
    Debounced,
    /// Rejected: `regress` at step 1.
    AtFloor,
    /// The completion notification fired and the sequencer is now spent.
    Completed,
    /// Rejected: the operation has no meaning in the current state
    /// (anything after completion, `confirm` away from the terminal step,
    /// `skip_to_end` with nowhere to skip).
    Inert,
}

/// A lifecycle event, drained by the host via
/// [`StepSequencer::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// A step was entered (including step 1 at construction). Entering a
    /// step is what (re)arms that step's auto-advance deadline.
    Entered(u8),
    /// The terminal step received its confirming transition. Queued at
    /// most once, ever.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Completed,
}

// ---------------------------------------------------------------------------
// StepSequencer
// ---------------------------------------------------------------------------

/// Finite-state machine owning the current narrative step.
///
/// Created at narrative start on step 1; spent once completion fires. A
/// fresh mount uses a fresh sequencer.
#[derive(Debug)]
pub struct StepSequencer {
    config: SequencerConfig,

    /// Current step in `[1, step_count]`.
    current_step: u8,

    /// Shared debounce timestamp, stamped by every accepted
    /// state-changing transition.
    last_transition: Option<Instant>,

    /// When the current step was entered. Drives the auto-advance
    /// deadline.
    entered_at: Instant,

    phase: Phase,

    /// Pending lifecycle events, drained by the host.
    events: Vec<SequencerEvent>,

    /// Diagnostic: accepted state-changing transitions.
    accepted: u64,

    /// Diagnostic: operations rejected by the debounce window.
    debounced: u64,
}

impl StepSequencer {
    /// Create a sequencer at step 1.
    ///
    /// `now` is the narrative start time; it anchors step 1's auto-advance
    /// deadline. A `step_count` of 0 is clamped to 1.
    #[must_use]
    pub fn new(config: SequencerConfig, now: Instant) -> Self {
        let config = SequencerConfig {
            step_count: config.step_count.max(1),
            ..config
        };
        let mut seq = Self {
            config,
            current_step: 1,
            last_transition: None,
            entered_at: now,
            phase: Phase::Running,
            events: Vec::new(),
            accepted: 0,
            debounced: 0,
        };
        seq.events.push(SequencerEvent::Entered(1));
        seq
    }

    /// Try to move to the next step.
    ///
    /// At the terminal step an accepted `advance` fires completion. Both
    /// auto-advance timer fires and manual gestures route through this
    /// entry point, so they contend for the same debounce window.
    pub fn advance(&mut self, now: Instant) -> TransitionOutcome {
        if self.phase == Phase::Completed {
            return TransitionOutcome::Inert;
        }
        if self.is_debounced(now) {
            return self.reject_debounced("advance");
        }

        if self.current_step < self.config.step_count {
            self.enter_step(self.current_step + 1, now);
            TransitionOutcome::Applied
        } else {
            self.complete()
        }
    }

    /// Try to move to the previous step. Step 1 is the floor.
    pub fn regress(&mut self, now: Instant) -> TransitionOutcome {
        if self.phase == Phase::Completed {
            return TransitionOutcome::Inert;
        }
        if self.is_debounced(now) {
            return self.reject_debounced("regress");
        }
        if self.current_step == 1 {
            trace!("regress rejected at floor");
            return TransitionOutcome::AtFloor;
        }

        self.enter_step(self.current_step - 1, now);
        TransitionOutcome::Applied
    }

    /// Explicit high-intent confirmation.
    ///
    /// Not subject to the debounce check: at the terminal step it fires
    /// completion immediately, even right after another transition.
    /// Anywhere else it is inert, because the confirming control only
    /// exists at the terminal step.
    pub fn confirm(&mut self, _now: Instant) -> TransitionOutcome {
        if self.phase == Phase::Completed {
            return TransitionOutcome::Inert;
        }
        if self.current_step != self.config.step_count {
            trace!(step = self.current_step, "confirm away from terminal step");
            return TransitionOutcome::Inert;
        }
        self.complete()
    }

    /// Jump from any non-terminal step to the last step without firing
    /// completion.
    pub fn skip_to_end(&mut self, now: Instant) -> TransitionOutcome {
        if self.phase == Phase::Completed {
            return TransitionOutcome::Inert;
        }
        if self.is_debounced(now) {
            return self.reject_debounced("skip_to_end");
        }
        if self.current_step == self.config.step_count {
            return TransitionOutcome::Inert;
        }

        self.enter_step(self.config.step_count, now);
        TransitionOutcome::Applied
    }

    /// The instant the current step should auto-advance, if it has a
    /// configured delay. `None` for the terminal step (in the default
    /// schedule) and always after completion.
    ///
    /// The deadline is derived from the current step and its entry time,
    /// never stored in a detached timer, so every accepted transition
    /// replaces it atomically. A stale deadline firing into a superseded
    /// step is structurally impossible.
    #[must_use]
    pub fn auto_advance_deadline(&self) -> Option<Instant> {
        if self.phase == Phase::Completed {
            return None;
        }
        let delay = self
            .config
            .auto_advance
            .get(usize::from(self.current_step) - 1)
            .copied()
            .flatten()?;
        Some(self.entered_at + delay)
    }

    /// Drain pending lifecycle events. Events are not replayed.
    pub fn drain_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current step in `[1, step_count]`.
    #[inline]
    #[must_use]
    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    /// Whether completion has fired.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Diagnostic: number of accepted state-changing transitions.
    #[inline]
    #[must_use]
    pub fn accepted_count(&self) -> u64 {
        self.accepted
    }

    /// Diagnostic: number of operations rejected by the debounce window.
    #[inline]
    #[must_use]
    pub fn debounced_count(&self) -> u64 {
        self.debounced
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn is_debounced(&self, now: Instant) -> bool {
        match self.last_transition {
            Some(t) => now.duration_since(t) < self.config.debounce_window,
            None => false,
        }
    }

    fn reject_debounced(&mut self, op: &str) -> TransitionOutcome {
        self.debounced += 1;
        trace!(op, step = self.current_step, "rejected by debounce window");
        TransitionOutcome::Debounced
    }

    fn enter_step(&mut self, step: u8, now: Instant) {
        self.current_step = step;
        self.last_transition = Some(now);
        self.entered_at = now;
        self.accepted += 1;
        self.events.push(SequencerEvent::Entered(step));
        debug!(step, "entered step");
    }

    fn complete(&mut self) -> TransitionOutcome {
        self.phase = Phase::Completed;
        self.accepted += 1;
        self.events.push(SequencerEvent::Completed);
        debug!("narrative completed");
        TransitionOutcome::Completed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
