#![forbid(unsafe_code)]

//! Scope-level glue: grapheme spans and sibling blocks wired to the
//! observer and playback.
//!
//! [`GraphemeAnimator`] owns the reveal machinery for one content scope: a
//! heading revealed cluster-by-cluster with staggered delays, plus sibling
//! blocks (paragraphs, lists, dividers) revealed as whole units. The host
//! marks the scope by handing over the heading text, one bounds rect per
//! cluster cell, and one rect per block; the animator decides nothing
//! about what deserves marking.
//!
//! Span clusters themselves are not stored here; hosts that need the text
//! for rendering call [`grapheme_spans`](crate::grapheme::grapheme_spans)
//! on the same input.
//!
//! # Invariants
//!
//! 1. Re-applying a scope first tears down all prior registrations and
//!    playback, so observation is never duplicated.
//! 2. A span's reveal begins only after its observer target triggers, and
//!    then still waits out its stagger delay.
//! 3. After [`detach`](GraphemeAnimator::detach), no further triggers or
//!    progress changes occur.
//!
//! # Failure Modes
//!
//! - Empty heading text: zero span targets; blocks still animate.
//! - Cluster/cell count mismatch: pairs up to the shorter of the two, the
//!   leftovers are not registered.

use std::time::Duration;

use intro_core::Rect;
use smallvec::SmallVec;
use tracing::debug;

use crate::easing::ease_out;
use crate::grapheme::{STAGGER_INCREMENT, grapheme_spans};
use crate::observer::{ObserverConfig, RevealObserver, TargetId};
use crate::reveal::{Reveal, RevealPlayback};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Block target ids live above this base; span ids below it.
const BLOCK_BASE: TargetId = 1 << 32;

/// Configuration for a scope animator.
#[derive(Debug, Clone)]
pub struct AnimatorConfig {
    /// Delay increment between consecutive grapheme clusters.
    /// Default: 30ms.
    pub stagger: Duration,

    /// How long a triggered target takes to settle. Default: 600ms.
    pub settle: Duration,

    /// Visibility triggering configuration.
    pub observer: ObserverConfig,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            stagger: STAGGER_INCREMENT,
            settle: Duration::from_millis(600),
            observer: ObserverConfig::default(),
        }
    }
}

/// The marked elements of one content scope, as laid out by the host.
#[derive(Debug, Clone, Copy)]
pub struct ScopeLayout<'a> {
    /// The heading text to reveal cluster-by-cluster.
    pub heading_text: &'a str,

    /// Bounds of each cluster cell, index-aligned with the heading's
    /// grapheme spans.
    pub heading_cells: &'a [Rect],

    /// Bounds of each sibling block, revealed as a whole unit.
    pub blocks: &'a [Rect],
}

// ---------------------------------------------------------------------------
// GraphemeAnimator
// ---------------------------------------------------------------------------

/// Stagger-reveals a heading per grapheme cluster and its sibling blocks
/// as whole units.
#[derive(Debug)]
pub struct GraphemeAnimator {
    config: AnimatorConfig,
    observer: RevealObserver,
    playback: RevealPlayback,

    /// Stagger delay per span, indexed by span id.
    span_delays: Vec<Duration>,

    block_ids: SmallVec<[TargetId; 8]>,
    applied: bool,
}

impl GraphemeAnimator {
    /// Create an animator with the given configuration. Nothing is
    /// observed until [`apply`](Self::apply).
    #[must_use]
    pub fn new(config: AnimatorConfig) -> Self {
        let observer = RevealObserver::new(config.observer.clone());
        Self {
            config,
            observer,
            playback: RevealPlayback::new(),
            span_delays: Vec::new(),
            block_ids: SmallVec::new(),
            applied: false,
        }
    }

    /// Register a scope's spans and blocks for observation.
    ///
    /// Idempotent in the re-application sense: applying to an animator
    /// that already holds a scope tears the old one down first, so there
    /// are never duplicate registrations or stale reveals.
    pub fn apply(&mut self, scope: &ScopeLayout<'_>) {
        if self.applied {
            debug!("re-applying scope, tearing down prior registrations");
            self.teardown();
        }

        let spans = grapheme_spans(scope.heading_text, self.config.stagger);
        self.span_delays = spans.iter().map(|s| s.delay).collect();
        for (span, cell) in spans.iter().zip(scope.heading_cells) {
            self.observer.register_one_shot(span.index as TargetId, *cell);
        }

        for (j, block) in scope.blocks.iter().enumerate() {
            let id = BLOCK_BASE + j as TargetId;
            self.observer.register_one_shot(id, *block);
            self.block_ids.push(id);
        }

        self.applied = true;
        debug!(
            spans = self.span_delays.len(),
            blocks = self.block_ids.len(),
            "scope applied"
        );
    }

    /// Feed the current viewport; newly visible targets start their
    /// reveals. Returns the targets that triggered on this observation.
    pub fn observe(&mut self, viewport: Rect) -> Vec<TargetId> {
        let fired = self.observer.observe(viewport);
        for &id in &fired {
            let reveal = match self.span_delay(id) {
                Some(delay) => Reveal::new(delay, self.config.settle).easing(ease_out),
                None => Reveal::immediate(self.config.settle),
            };
            self.playback.start(id, reveal);
        }
        fired
    }

    /// Advance in-flight reveals by `dt`. Returns the targets that
    /// settled during this tick.
    pub fn tick(&mut self, dt: Duration) -> Vec<TargetId> {
        self.playback.tick(dt);
        self.playback.drain_settled()
    }

    /// Reveal progress for a target: `None` before it triggers, the eased
    /// value while in flight, 1.0 once settled.
    #[must_use]
    pub fn progress(&self, id: TargetId) -> Option<f32> {
        if let Some(v) = self.playback.value(id) {
            return Some(v);
        }
        self.observer.triggered(id).then_some(1.0)
    }

    /// The observer target id of a heading span.
    #[must_use]
    pub fn span_id(index: usize) -> TargetId {
        index as TargetId
    }

    /// The observer target id of a sibling block.
    #[must_use]
    pub fn block_id(index: usize) -> TargetId {
        BLOCK_BASE + index as TargetId
    }

    /// Number of spans in the applied scope.
    #[must_use]
    pub fn span_count(&self) -> usize {
        self.span_delays.len()
    }

    /// Number of blocks in the applied scope.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.block_ids.len()
    }

    /// Whether a scope is currently applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Tear down all registrations and in-flight reveals (unmount).
    pub fn detach(&mut self) {
        self.teardown();
        self.applied = false;
    }

    fn span_delay(&self, id: TargetId) -> Option<Duration> {
        if id >= BLOCK_BASE {
            return None;
        }
        self.span_delays.get(id as usize).copied()
    }

    fn teardown(&mut self) {
        self.observer = RevealObserver::new(self.config.observer.clone());
        self.playback.clear();
        self.span_delays.clear();
        self.block_ids.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_30: Duration = Duration::from_millis(30);

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 800.0)
    }

    fn cells(n: usize) -> Vec<Rect> {
        (0..n)
            .map(|i| Rect::new(20.0 * i as f32, 100.0, 20.0, 30.0))
            .collect()
    }

    fn animator() -> GraphemeAnimator {
        GraphemeAnimator::new(AnimatorConfig::default())
    }

    #[test]
    fn apply_registers_spans_and_blocks() {
        let mut anim = animator();
        let cells = cells(3);
        let blocks = [Rect::new(0.0, 200.0, 600.0, 80.0)];
        anim.apply(&ScopeLayout {
            heading_text: "abc",
            heading_cells: &cells,
            blocks: &blocks,
        });

        assert_eq!(anim.span_count(), 3);
        assert_eq!(anim.block_count(), 1);
        assert!(anim.is_applied());
    }

    #[test]
    fn spans_wait_out_their_stagger_after_trigger() {
        let mut anim = animator();
        let cells = cells(3);
        anim.apply(&ScopeLayout {
            heading_text: "abc",
            heading_cells: &cells,
            blocks: &[],
        });

        let fired = anim.observe(viewport());
        assert_eq!(fired.len(), 3);

        // After 40ms: span 0 (delay 0) is moving, span 2 (delay 60ms) is
        // still hidden.
        anim.tick(Duration::from_millis(40));
        assert!(anim.progress(GraphemeAnimator::span_id(0)).unwrap() > 0.0);
        assert_eq!(anim.progress(GraphemeAnimator::span_id(2)), Some(0.0));
    }

    #[test]
    fn blocks_reveal_without_stagger() {
        let mut anim = animator();
        let blocks = [Rect::new(0.0, 200.0, 600.0, 80.0)];
        anim.apply(&ScopeLayout {
            heading_text: "",
            heading_cells: &[],
            blocks: &blocks,
        });

        anim.observe(viewport());
        anim.tick(Duration::from_millis(10));
        assert!(anim.progress(GraphemeAnimator::block_id(0)).unwrap() > 0.0);
    }

    #[test]
    fn progress_is_none_before_trigger() {
        let mut anim = animator();
        let cells = [Rect::new(0.0, 5000.0, 20.0, 30.0)];
        anim.apply(&ScopeLayout {
            heading_text: "a",
            heading_cells: &cells,
            blocks: &[],
        });
        anim.observe(viewport());
        assert_eq!(anim.progress(GraphemeAnimator::span_id(0)), None);
    }

    #[test]
    fn settled_targets_report_full_progress() {
        let mut anim = animator();
        let cells = cells(2);
        anim.apply(&ScopeLayout {
            heading_text: "ab",
            heading_cells: &cells,
            blocks: &[],
        });
        anim.observe(viewport());

        let settled = anim.tick(Duration::from_secs(5));
        assert_eq!(settled.len(), 2);
        assert_eq!(anim.progress(GraphemeAnimator::span_id(0)), Some(1.0));
        assert_eq!(anim.progress(GraphemeAnimator::span_id(1)), Some(1.0));
    }

    #[test]
    fn reapply_tears_down_prior_scope() {
        let mut anim = animator();
        let cells3 = cells(3);
        anim.apply(&ScopeLayout {
            heading_text: "abc",
            heading_cells: &cells3,
            blocks: &[],
        });
        anim.observe(viewport());
        anim.tick(Duration::from_millis(10));

        let cells2 = cells(2);
        anim.apply(&ScopeLayout {
            heading_text: "xy",
            heading_cells: &cells2,
            blocks: &[],
        });

        assert_eq!(anim.span_count(), 2);
        // Prior playback was discarded; new spans have not triggered yet.
        assert_eq!(anim.progress(GraphemeAnimator::span_id(0)), None);
        // Fresh observation fires the new scope exactly once.
        assert_eq!(anim.observe(viewport()).len(), 2);
        assert!(anim.observe(viewport()).is_empty());
    }

    #[test]
    fn cluster_cell_mismatch_pairs_to_shorter() {
        let mut anim = animator();
        // Three clusters, one cell: only span 0 is observable.
        let cells1 = cells(1);
        anim.apply(&ScopeLayout {
            heading_text: "abc",
            heading_cells: &cells1,
            blocks: &[],
        });
        assert_eq!(anim.observe(viewport()), vec![0]);
    }

    #[test]
    fn empty_heading_yields_no_span_targets() {
        let mut anim = animator();
        anim.apply(&ScopeLayout {
            heading_text: "",
            heading_cells: &[],
            blocks: &[],
        });
        assert_eq!(anim.span_count(), 0);
        assert!(anim.observe(viewport()).is_empty());
    }

    #[test]
    fn detach_stops_everything() {
        let mut anim = animator();
        let cells = cells(2);
        anim.apply(&ScopeLayout {
            heading_text: "ab",
            heading_cells: &cells,
            blocks: &[],
        });
        anim.observe(viewport());
        anim.detach();

        assert!(!anim.is_applied());
        assert!(anim.observe(viewport()).is_empty());
        assert!(anim.tick(Duration::from_secs(10)).is_empty());
        assert_eq!(anim.progress(GraphemeAnimator::span_id(0)), None);
    }

    #[test]
    fn stagger_delays_follow_config() {
        let mut anim = GraphemeAnimator::new(AnimatorConfig {
            stagger: MS_30,
            settle: Duration::from_millis(60),
            observer: ObserverConfig::default(),
        });
        let cells = cells(3);
        anim.apply(&ScopeLayout {
            heading_text: "abc",
            heading_cells: &cells,
            blocks: &[],
        });
        anim.observe(viewport());

        let mut settled = Vec::new();
        for _ in 0..30 {
            settled.extend(anim.tick(Duration::from_millis(10)));
        }
        // Spans settle in stagger order.
        assert_eq!(settled, vec![0, 1, 2]);
    }
}
