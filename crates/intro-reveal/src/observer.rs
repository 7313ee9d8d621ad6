#![forbid(unsafe_code)]

//! One-shot visibility triggering for marked content.
//!
//! [`RevealObserver`] watches registered targets and reports each one
//! exactly once, the first time its visible ratio inside the (optionally
//! margin-expanded) viewport reaches the configured threshold. Triggered
//! targets are unregistered on the spot; no amount of scrolling out and
//! back produces a second report.
//!
//! The triggering decision is polled: the host calls
//! [`observe`](RevealObserver::observe) with the current viewport whenever
//! it scrolls or relayouts, and acts on the returned targets. No callbacks
//! are stored, so there is nothing stale to guard at teardown beyond
//! calling [`disconnect`](RevealObserver::disconnect).
//!
//! # Invariants
//!
//! 1. Each registered target is reported by `observe` at most once, ever.
//! 2. `triggered` transitions false to true exactly once and never
//!    reverts.
//! 3. Registering an already-triggered target is a no-op.
//! 4. `disconnect` drops all pending targets without reporting them.
//!
//! # Failure Modes
//!
//! - Zero-area target: cannot produce an intersection, so it triggers when
//!   the expanded viewport contains its origin point instead.
//! - `observe` after `disconnect`: returns nothing.

use std::collections::HashSet;

use intro_core::Rect;
use tracing::debug;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Identifies a reveal target within its observer.
pub type TargetId = u64;

/// Configuration for visibility triggering.
#[derive(Debug, Clone)]
pub struct ObserverConfig {
    /// Visible-area ratio at which a target triggers. Default: 0.1.
    pub threshold: f32,

    /// Pre-trigger margin in pixels: the viewport is expanded by this much
    /// on every side, so targets begin animating slightly before fully
    /// entering view. Default: 0.0.
    pub margin: f32,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            margin: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Watched {
    id: TargetId,
    bounds: Rect,
}

// ---------------------------------------------------------------------------
// RevealObserver
// ---------------------------------------------------------------------------

/// Watches marked targets and reports each exactly once when it first
/// becomes sufficiently visible.
#[derive(Debug, Default)]
pub struct RevealObserver {
    config: ObserverConfig,
    watched: Vec<Watched>,
    triggered: HashSet<TargetId>,
}

impl RevealObserver {
    /// Create an observer with the given configuration.
    #[must_use]
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            watched: Vec::new(),
            triggered: HashSet::new(),
        }
    }

    /// Begin watching a target.
    ///
    /// Registering a target that has already triggered is a no-op.
    /// Re-registering a pending target updates its bounds.
    pub fn register_one_shot(&mut self, id: TargetId, bounds: Rect) {
        if self.triggered.contains(&id) {
            return;
        }
        if let Some(existing) = self.watched.iter_mut().find(|w| w.id == id) {
            existing.bounds = bounds;
        } else {
            self.watched.push(Watched { id, bounds });
        }
    }

    /// Update a pending target's bounds after a relayout.
    ///
    /// Returns `false` if the target is unknown or already triggered.
    pub fn update_bounds(&mut self, id: TargetId, bounds: Rect) -> bool {
        match self.watched.iter_mut().find(|w| w.id == id) {
            Some(w) => {
                w.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Report every pending target whose visible ratio inside `viewport`
    /// reaches the threshold. Reported targets are marked triggered and
    /// unregistered; they will never be reported again.
    pub fn observe(&mut self, viewport: Rect) -> Vec<TargetId> {
        let window = viewport.expand(self.config.margin);
        let threshold = self.config.threshold;
        let mut fired = Vec::new();

        self.watched.retain(|w| {
            if visible_ratio(&w.bounds, &window) >= threshold {
                fired.push(w.id);
                false
            } else {
                true
            }
        });

        for id in &fired {
            self.triggered.insert(*id);
            debug!(target_id = id, "reveal target triggered");
        }
        fired
    }

    /// Whether a target has triggered. Once true, never reverts.
    #[must_use]
    pub fn triggered(&self, id: TargetId) -> bool {
        self.triggered.contains(&id)
    }

    /// Diagnostic: number of pending (untriggered) targets.
    #[must_use]
    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    /// Diagnostic: number of targets that have triggered.
    #[must_use]
    pub fn triggered_count(&self) -> usize {
        self.triggered.len()
    }

    /// Stop observing all remaining targets without reporting them.
    ///
    /// Call when the owning content tree unmounts. Already-triggered
    /// state is retained for `triggered` queries.
    pub fn disconnect(&mut self) {
        if !self.watched.is_empty() {
            debug!(dropped = self.watched.len(), "reveal observer disconnected");
        }
        self.watched.clear();
    }
}

/// Fraction of `bounds` visible inside `window`, in [0.0, 1.0].
///
/// Zero-area bounds report 1.0 when their origin lies inside the window,
/// 0.0 otherwise.
fn visible_ratio(bounds: &Rect, window: &Rect) -> f32 {
    if bounds.is_empty() {
        return if window.contains(bounds.x, bounds.y) {
            1.0
        } else {
            0.0
        };
    }
    match bounds.intersection_opt(window) {
        Some(overlap) => overlap.area() / bounds.area(),
        None => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
