#![forbid(unsafe_code)]

//! The narrative program loop.
//!
//! [`Narrative`] wires the gesture aggregator, step sequencer, and
//! auto-advance timer into one owned unit with an explicit lifecycle: the
//! host constructs it when the narrative view mounts, feeds it input
//! events and periodic polls, and drops it when the view goes away.
//! Nothing is registered ambiently, so there are no handlers left behind
//! to call into a destroyed sequencer.
//!
//! Execution is single-threaded and cooperative. The host's event loop
//! serially calls [`handle_event`](Narrative::handle_event) for input and
//! [`poll`](Narrative::poll) for time passing; there are no background
//! threads and no blocking waits. Auto-advance fires are routed through
//! the same sequencer entry point as manual gestures, so both contend for
//! the same debounce window and whichever the loop dispatches first wins.
//!
//! # Invariants
//!
//! 1. The completion callback is invoked at most once, with no payload.
//! 2. After completion every event and poll is a no-op.
//! 3. The auto-advance timer is reconciled against the sequencer's
//!    declared deadline after every dispatch, in the same call; a
//!    superseded deadline can never fire.

use std::time::Instant;

use intro_core::{
    AutoAdvance, Direction, GestureAggregator, GestureConfig, InputEvent, SequencerConfig,
    SequencerEvent, StepSequencer, TransitionOutcome,
};
use tracing::debug;

/// The host's fire-once completion notification.
type CompletionFn = Box<dyn FnOnce()>;

/// An owned narrative instance: input sources in, one completion out.
pub struct Narrative {
    gestures: GestureAggregator,
    sequencer: StepSequencer,
    timer: AutoAdvance,
    on_complete: Option<CompletionFn>,
}

impl std::fmt::Debug for Narrative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrative")
            .field("step", &self.sequencer.current_step())
            .field("complete", &self.sequencer.is_complete())
            .field("timer_armed", &self.timer.is_armed())
            .finish()
    }
}

impl Narrative {
    /// Create a narrative with the reference configuration, starting at
    /// step 1 as of `now`.
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self::with_config(GestureConfig::default(), SequencerConfig::default(), now)
    }

    /// Create a narrative with explicit configurations.
    #[must_use]
    pub fn with_config(
        gestures: GestureConfig,
        sequencer: SequencerConfig,
        now: Instant,
    ) -> Self {
        let sequencer = StepSequencer::new(sequencer, now);
        let mut narrative = Self {
            gestures: GestureAggregator::new(gestures),
            sequencer,
            timer: AutoAdvance::new(),
            on_complete: None,
        };
        narrative.after_dispatch();
        narrative
    }

    /// Set the completion callback (builder). Invoked at most once, when
    /// the terminal step receives its confirming transition.
    #[must_use]
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Feed one host input event.
    pub fn handle_event(&mut self, event: &InputEvent, now: Instant) {
        if self.sequencer.is_complete() {
            return;
        }
        let Some(gesture) = self.gestures.classify(event) else {
            return;
        };

        let outcome = match gesture.direction {
            Direction::Advance => self.sequencer.advance(now),
            Direction::Regress => self.sequencer.regress(now),
            Direction::Confirm => self.sequencer.confirm(now),
            Direction::SkipToEnd => self.sequencer.skip_to_end(now),
        };
        debug!(
            direction = ?gesture.direction,
            source = ?gesture.source,
            ?outcome,
            step = self.sequencer.current_step(),
            "gesture dispatched"
        );
        self.after_dispatch();
    }

    /// Let time pass: fire the auto-advance timer if its deadline is due.
    ///
    /// The host loop should call this on its tick cadence. A due fire
    /// routes through `advance`, exactly like a manual gesture.
    pub fn poll(&mut self, now: Instant) {
        if self.timer.poll(now) {
            let outcome = self.sequencer.advance(now);
            debug!(?outcome, step = self.sequencer.current_step(), "auto-advance dispatched");
        }
        self.after_dispatch();
    }

    /// Current narrative step.
    #[inline]
    #[must_use]
    pub fn current_step(&self) -> u8 {
        self.sequencer.current_step()
    }

    /// Whether completion has fired.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// The sequencer's transition outcome for the last gesture is logged,
    /// not returned; hosts that need diagnostics read the counters.
    #[inline]
    #[must_use]
    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    /// Drain sequencer events, run the completion callback if it fired,
    /// and bring the timer in line with the declared deadline.
    fn after_dispatch(&mut self) {
        for event in self.sequencer.drain_events() {
            match event {
                SequencerEvent::Entered(step) => {
                    debug!(step, "narrative entered step");
                }
                SequencerEvent::Completed => {
                    self.gestures.reset();
                    if let Some(callback) = self.on_complete.take() {
                        callback();
                    }
                }
            }
        }
        self.timer.reconcile(self.sequencer.auto_advance_deadline());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
