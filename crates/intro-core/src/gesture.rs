#![forbid(unsafe_code)]

//! Gesture classification for heterogeneous input.
//!
//! [`GestureAggregator`] normalizes wheel deltas, touch swipes, and clicks
//! into the sequencer's logical signals, with threshold-based filtering so
//! that scroll noise and accidental micro-swipes are ignored.
//!
//! # Invariants
//!
//! 1. Wheel classification is stateless: each event is judged on its own
//!    delta, nothing accumulates.
//! 2. The recorded touch-start coordinate is cleared after every
//!    touch-end, whether or not the swipe crossed the threshold.
//! 3. A touch-end with no recorded touch-start classifies as nothing.
//! 4. Clicks always classify; the sequencer's own debounce decides whether
//!    they are accepted.
//!
//! # Failure Modes
//!
//! - Sub-threshold wheel delta or swipe distance: returns `None`, no state
//!   change beyond invariant 2.
//! - Non-finite coordinates from a misbehaving host: compare as-is; NaN
//!   comparisons are false, so such events classify as nothing.

use tracing::trace;

use crate::event::{ClickRegion, InputEvent};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for gesture classification.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Minimum wheel delta magnitude that counts as a scroll gesture.
    /// Default: 20.0 units.
    pub wheel_threshold: f32,

    /// Minimum vertical swipe distance that counts as a swipe gesture.
    /// Default: 50.0 pixels.
    pub swipe_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            wheel_threshold: 20.0,
            swipe_threshold: 50.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Gesture types
// ---------------------------------------------------------------------------

/// The logical signal a raw input event was classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Move to the next narrative step.
    Advance,
    /// Move back to the previous narrative step.
    Regress,
    /// High-intent confirmation at the terminal step (bypasses debounce).
    Confirm,
    /// Fast-forward to the last step without completing.
    SkipToEnd,
}

/// Which input modality produced a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Wheel/scroll input.
    Wheel,
    /// Touch swipe input.
    Touch,
    /// Click or tap input.
    Click,
}

/// A classified gesture. Transient: produced and consumed immediately,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    /// The logical signal.
    pub direction: Direction,
    /// The input modality that produced it.
    pub source: Source,
}

impl Gesture {
    const fn new(direction: Direction, source: Source) -> Self {
        Self { direction, source }
    }
}

// ---------------------------------------------------------------------------
// GestureAggregator
// ---------------------------------------------------------------------------

/// Translates raw input events into logical gestures.
///
/// The only state carried is the transient touch-start coordinate; the
/// aggregator never owns any narrative truth.
#[derive(Debug, Clone, Default)]
pub struct GestureAggregator {
    config: GestureConfig,

    /// Vertical coordinate recorded at touch-start, cleared at touch-end.
    touch_start_y: Option<f32>,
}

impl GestureAggregator {
    /// Create an aggregator with the given thresholds.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            touch_start_y: None,
        }
    }

    /// Classify a raw input event.
    ///
    /// Returns `Some(gesture)` when the event crosses its threshold (or is
    /// a click, which always classifies), `None` otherwise.
    pub fn classify(&mut self, event: &InputEvent) -> Option<Gesture> {
        let gesture = match *event {
            InputEvent::Wheel { delta_y } => {
                if delta_y > self.config.wheel_threshold {
                    Some(Gesture::new(Direction::Advance, Source::Wheel))
                } else if delta_y < -self.config.wheel_threshold {
                    Some(Gesture::new(Direction::Regress, Source::Wheel))
                } else {
                    None
                }
            }
            InputEvent::TouchStart { y } => {
                self.touch_start_y = Some(y);
                None
            }
            InputEvent::TouchEnd { y: end_y } => {
                let start_y = self.touch_start_y.take()?;
                let delta = start_y - end_y;
                if delta > self.config.swipe_threshold {
                    Some(Gesture::new(Direction::Advance, Source::Touch))
                } else if delta < -self.config.swipe_threshold {
                    Some(Gesture::new(Direction::Regress, Source::Touch))
                } else {
                    None
                }
            }
            InputEvent::Click { region } => {
                let direction = match region {
                    ClickRegion::Surface => Direction::Advance,
                    ClickRegion::Continue => Direction::Confirm,
                    ClickRegion::Skip => Direction::SkipToEnd,
                };
                Some(Gesture::new(direction, Source::Click))
            }
        };

        if let Some(g) = gesture {
            trace!(direction = ?g.direction, source = ?g.source, "gesture classified");
        }
        gesture
    }

    /// Clear transient state (call when the narrative view unmounts).
    pub fn reset(&mut self) {
        self.touch_start_y = None;
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregator() -> GestureAggregator {
        GestureAggregator::new(GestureConfig::default())
    }

    // --- Wheel tests ---

    #[test]
    fn wheel_above_threshold_advances() {
        let mut agg = aggregator();
        let g = agg.classify(&InputEvent::wheel(25.0)).unwrap();
        assert_eq!(g.direction, Direction::Advance);
        assert_eq!(g.source, Source::Wheel);
    }

    #[test]
    fn wheel_below_negative_threshold_regresses() {
        let mut agg = aggregator();
        let g = agg.classify(&InputEvent::wheel(-25.0)).unwrap();
        assert_eq!(g.direction, Direction::Regress);
        assert_eq!(g.source, Source::Wheel);
    }

    #[test]
    fn wheel_inside_deadband_ignored() {
        let mut agg = aggregator();
        assert!(agg.classify(&InputEvent::wheel(20.0)).is_none());
        assert!(agg.classify(&InputEvent::wheel(-20.0)).is_none());
        assert!(agg.classify(&InputEvent::wheel(0.0)).is_none());
    }

    // --- Touch tests ---

    #[test]
    fn swipe_up_advances() {
        let mut agg = aggregator();
        assert!(agg.classify(&InputEvent::TouchStart { y: 500.0 }).is_none());
        let g = agg.classify(&InputEvent::TouchEnd { y: 400.0 }).unwrap();
        assert_eq!(g.direction, Direction::Advance);
        assert_eq!(g.source, Source::Touch);
    }

    #[test]
    fn swipe_down_regresses() {
        let mut agg = aggregator();
        agg.classify(&InputEvent::TouchStart { y: 400.0 });
        let g = agg.classify(&InputEvent::TouchEnd { y: 500.0 }).unwrap();
        assert_eq!(g.direction, Direction::Regress);
    }

    #[test]
    fn short_swipe_ignored() {
        let mut agg = aggregator();
        agg.classify(&InputEvent::TouchStart { y: 500.0 });
        assert!(agg.classify(&InputEvent::TouchEnd { y: 460.0 }).is_none());
    }

    #[test]
    fn exact_threshold_swipe_ignored() {
        let mut agg = aggregator();
        agg.classify(&InputEvent::TouchStart { y: 500.0 });
        // Exactly 50 is not greater than 50.
        assert!(agg.classify(&InputEvent::TouchEnd { y: 450.0 }).is_none());
    }

    #[test]
    fn touch_start_cleared_after_every_touch_end() {
        let mut agg = aggregator();
        agg.classify(&InputEvent::TouchStart { y: 500.0 });
        // Ignored swipe still clears the start coordinate.
        assert!(agg.classify(&InputEvent::TouchEnd { y: 490.0 }).is_none());
        // With no recorded start, a touch-end classifies as nothing.
        assert!(agg.classify(&InputEvent::TouchEnd { y: 100.0 }).is_none());
    }

    #[test]
    fn touch_end_without_start_ignored() {
        let mut agg = aggregator();
        assert!(agg.classify(&InputEvent::TouchEnd { y: 100.0 }).is_none());
    }

    #[test]
    fn later_touch_start_wins() {
        let mut agg = aggregator();
        agg.classify(&InputEvent::TouchStart { y: 900.0 });
        agg.classify(&InputEvent::TouchStart { y: 500.0 });
        // Delta measured from the most recent start: 500 - 460 = 40, ignored.
        assert!(agg.classify(&InputEvent::TouchEnd { y: 460.0 }).is_none());
    }

    // --- Click tests ---

    #[test]
    fn surface_click_advances() {
        let mut agg = aggregator();
        let g = agg.classify(&InputEvent::click(ClickRegion::Surface)).unwrap();
        assert_eq!(g.direction, Direction::Advance);
        assert_eq!(g.source, Source::Click);
    }

    #[test]
    fn continue_click_confirms() {
        let mut agg = aggregator();
        let g = agg
            .classify(&InputEvent::click(ClickRegion::Continue))
            .unwrap();
        assert_eq!(g.direction, Direction::Confirm);
    }

    #[test]
    fn skip_click_skips() {
        let mut agg = aggregator();
        let g = agg.classify(&InputEvent::click(ClickRegion::Skip)).unwrap();
        assert_eq!(g.direction, Direction::SkipToEnd);
    }

    // --- Lifecycle tests ---

    #[test]
    fn reset_clears_pending_touch() {
        let mut agg = aggregator();
        agg.classify(&InputEvent::TouchStart { y: 500.0 });
        agg.reset();
        assert!(agg.classify(&InputEvent::TouchEnd { y: 100.0 }).is_none());
    }

    #[test]
    fn nan_coordinates_classify_as_nothing() {
        let mut agg = aggregator();
        assert!(agg.classify(&InputEvent::wheel(f32::NAN)).is_none());
        agg.classify(&InputEvent::TouchStart { y: f32::NAN });
        assert!(agg.classify(&InputEvent::TouchEnd { y: 100.0 }).is_none());
    }

    #[test]
    fn custom_thresholds_respected() {
        let mut agg = GestureAggregator::new(GestureConfig {
            wheel_threshold: 5.0,
            swipe_threshold: 10.0,
        });
        assert!(agg.classify(&InputEvent::wheel(6.0)).is_some());
        agg.classify(&InputEvent::TouchStart { y: 20.0 });
        assert!(agg.classify(&InputEvent::TouchEnd { y: 5.0 }).is_some());
    }
}
