#![forbid(unsafe_code)]

//! Scripted narrative driver for tests and debugging.
//!
//! [`ScriptedClock`] replaces wall time with manually advanced instants,
//! and [`NarrativeDriver`] replays `(wait, event)` scripts against an
//! owned [`Narrative`], recording the step trajectory and completion.
//! Introspection hooks live here, in the harness, never on ambient state
//! in production code.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use intro_core::{ClickRegion, InputEvent};

use crate::narrative::Narrative;

// ---------------------------------------------------------------------------
// ScriptedClock
// ---------------------------------------------------------------------------

/// A manually advanced clock. Starts at an arbitrary anchor instant;
/// only the relative advances matter.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedClock {
    now: Instant,
}

impl ScriptedClock {
    /// Create a clock anchored at the current wall time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    /// The clock's current instant.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Advance the clock by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }
}

impl Default for ScriptedClock {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// NarrativeDriver
// ---------------------------------------------------------------------------

/// Replays input scripts against a narrative under a scripted clock.
#[derive(Debug)]
pub struct NarrativeDriver {
    narrative: Narrative,
    clock: ScriptedClock,
    trajectory: Vec<u8>,
    completions: Rc<Cell<u32>>,
}

impl NarrativeDriver {
    /// Create a driver around a default-configured narrative.
    #[must_use]
    pub fn new() -> Self {
        let clock = ScriptedClock::new();
        let completions = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&completions);
        let narrative =
            Narrative::new(clock.now()).on_complete(move || counter.set(counter.get() + 1));
        Self {
            trajectory: vec![narrative.current_step()],
            narrative,
            clock,
            completions,
        }
    }

    /// Wait `dt` (polling timers), then feed `event`.
    pub fn step(&mut self, dt: Duration, event: &InputEvent) {
        self.idle(dt);
        self.narrative.handle_event(event, self.clock.now());
        self.record();
    }

    /// Wait `dt`, letting timers fire, without feeding any event.
    ///
    /// The wait is walked in small increments so a chain of auto-advance
    /// deadlines inside it fires in order, each from its own step's entry
    /// time, the way a host tick loop would deliver them.
    pub fn idle(&mut self, dt: Duration) {
        const TICK: Duration = Duration::from_millis(50);
        let mut remaining = dt;
        while remaining > Duration::ZERO {
            let slice = remaining.min(TICK);
            self.clock.advance(slice);
            self.narrative.poll(self.clock.now());
            self.record();
            remaining -= slice;
        }
    }

    /// Replay a whole `(wait, event)` script.
    pub fn run_script(&mut self, script: &[(Duration, InputEvent)]) {
        for (dt, event) in script {
            self.step(*dt, event);
        }
    }

    /// Debug hook: push a surface tap, the manual advance gesture. Still
    /// subject to the sequencer's debounce, like any real gesture.
    pub fn force_advance(&mut self) {
        let event = InputEvent::click(ClickRegion::Surface);
        self.narrative.handle_event(&event, self.clock.now());
        self.record();
    }

    /// Steps seen so far, deduplicated consecutively, starting at 1.
    #[must_use]
    pub fn trajectory(&self) -> &[u8] {
        &self.trajectory
    }

    /// How many times the completion callback ran (0 or 1 by contract).
    #[must_use]
    pub fn completions(&self) -> u32 {
        self.completions.get()
    }

    /// The narrative under test.
    #[must_use]
    pub fn narrative(&self) -> &Narrative {
        &self.narrative
    }

    /// The scripted clock's current instant.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    fn record(&mut self) {
        let step = self.narrative.current_step();
        if self.trajectory.last() != Some(&step) {
            self.trajectory.push(step);
        }
    }
}

impl Default for NarrativeDriver {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
