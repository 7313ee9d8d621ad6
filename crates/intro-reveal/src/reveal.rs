#![forbid(unsafe_code)]

//! Reveal progression: a stagger delay followed by an eased settle.
//!
//! [`Reveal`] tracks one target's transition from hidden to settled. It
//! produces normalized `f32` values (0.0 while waiting out its delay,
//! then eased progress to 1.0). Elapsed time accumulates as [`Duration`]
//! so there is no floating-point drift over many small ticks.
//!
//! [`RevealPlayback`] holds the in-flight reveals for a content scope,
//! keyed by observer target, and ticks them together.
//!
//! # Invariants
//!
//! 1. `value()` is 0.0 until the delay has fully elapsed, then
//!    monotonically non-decreasing up to 1.0.
//! 2. `is_settled()` implies `value() == 1.0`.
//! 3. Starting a key that is already playing replaces it (last wins).
//!
//! # Failure Modes
//!
//! - Zero settle duration: clamped to one nanosecond, so the reveal jumps
//!   to settled on the first tick past its delay instead of dividing by
//!   zero.
//! - Ticking a settled reveal: value stays 1.0, never overshoots.

use std::time::Duration;

use crate::easing::{EasingFn, ease_out, linear};
use crate::observer::TargetId;

// ---------------------------------------------------------------------------
// Reveal
// ---------------------------------------------------------------------------

/// One target's hidden-to-settled progression.
#[derive(Debug, Clone, Copy)]
pub struct Reveal {
    delay: Duration,
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
}

impl Reveal {
    /// Create a reveal that waits `delay`, then settles over `duration`.
    #[must_use]
    pub fn new(delay: Duration, duration: Duration) -> Self {
        Self {
            delay,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            elapsed: Duration::ZERO,
            easing: linear,
        }
    }

    /// Create an undelayed reveal with the default ease-out settle.
    #[must_use]
    pub fn immediate(duration: Duration) -> Self {
        Self::new(Duration::ZERO, duration).easing(ease_out)
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Advance by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Whether the delay has elapsed and the settle has begun.
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.elapsed > self.delay
    }

    /// Whether the reveal has fully settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    /// Current eased progress in [0.0, 1.0].
    #[must_use]
    pub fn value(&self) -> f32 {
        let Some(active) = self.elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        let t = active.as_secs_f64() / self.duration.as_secs_f64();
        (self.easing)((t as f32).clamp(0.0, 1.0))
    }

    /// Rewind to the hidden state.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// RevealPlayback
// ---------------------------------------------------------------------------

/// The in-flight reveals for one content scope, keyed by observer target.
#[derive(Debug, Default)]
pub struct RevealPlayback {
    members: Vec<(TargetId, Reveal)>,
}

impl RevealPlayback {
    /// Create an empty playback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the reveal for a key. Last wins.
    pub fn start(&mut self, key: TargetId, reveal: Reveal) {
        if let Some(existing) = self.members.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = reveal;
        } else {
            self.members.push((key, reveal));
        }
    }

    /// Advance every in-flight reveal by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        for (_, reveal) in &mut self.members {
            reveal.tick(dt);
        }
    }

    /// Current progress for a key, `None` if the key is not playing.
    #[must_use]
    pub fn value(&self, key: TargetId) -> Option<f32> {
        self.members
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, r)| r.value())
    }

    /// Remove settled reveals, returning their keys.
    pub fn drain_settled(&mut self) -> Vec<TargetId> {
        let mut settled = Vec::new();
        self.members.retain(|(key, reveal)| {
            if reveal.is_settled() {
                settled.push(*key);
                false
            } else {
                true
            }
        });
        settled
    }

    /// Whether nothing is in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of in-flight reveals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the playback holds no reveals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drop every in-flight reveal without settling it.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
