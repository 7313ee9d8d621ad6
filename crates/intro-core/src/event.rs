#![forbid(unsafe_code)]

//! Canonical host input events.
//!
//! The host feeds these into the narrative loop; the core never talks to
//! an input backend directly. All events derive `Clone`, `Copy`, and
//! `PartialEq` for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - Wheel deltas and touch coordinates are raw, unthresholded values;
//!   filtering lives in [`gesture`](crate::gesture).
//! - Clicks carry only which designated region was activated, not a
//!   position. The host owns hit testing.

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A wheel/scroll event with a vertical delta.
    ///
    /// Positive means scrolling down (toward later content).
    Wheel {
        /// Vertical delta in host scroll units.
        delta_y: f32,
    },

    /// A touch began at the given vertical coordinate.
    TouchStart {
        /// Vertical coordinate in viewport pixels.
        y: f32,
    },

    /// A touch ended at the given vertical coordinate.
    TouchEnd {
        /// Vertical coordinate in viewport pixels.
        y: f32,
    },

    /// A click or tap on a designated region.
    Click {
        /// Which region was activated.
        region: ClickRegion,
    },
}

impl InputEvent {
    /// Shorthand for a wheel event.
    #[must_use]
    pub const fn wheel(delta_y: f32) -> Self {
        Self::Wheel { delta_y }
    }

    /// Shorthand for a click on a region.
    #[must_use]
    pub const fn click(region: ClickRegion) -> Self {
        Self::Click { region }
    }
}

/// The designated click regions of the narrative surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickRegion {
    /// The general narrative surface (anywhere that is not a control).
    Surface,

    /// The explicit "continue" control shown at the terminal step.
    Continue,

    /// The explicit "skip" control.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_constructors() {
        assert_eq!(InputEvent::wheel(25.0), InputEvent::Wheel { delta_y: 25.0 });
        assert_eq!(
            InputEvent::click(ClickRegion::Skip),
            InputEvent::Click {
                region: ClickRegion::Skip
            }
        );
    }
}
