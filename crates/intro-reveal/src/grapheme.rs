#![forbid(unsafe_code)]

//! Grapheme span derivation for staggered text reveal.
//!
//! [`grapheme_spans`] is a pure function mapping a heading's text to an
//! ordered sequence of [`GraphemeSpan`]s, one per user-perceived character
//! (extended grapheme cluster). Splitting by raw code unit would corrupt
//! combining sequences and multi-part emoji; clusters keep them whole. The
//! rendering layer consumes this sequence to produce visual elements, so
//! segmentation stays independently testable.
//!
//! # Invariants
//!
//! 1. Concatenating `cluster` values in index order reproduces the input
//!    byte-for-byte (clusters are borrowed sub-slices of it).
//! 2. `delay` is `index * stagger`, hence non-decreasing in `index`.
//!
//! # Failure Modes
//!
//! - Empty input: an empty vec, never an error.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Reference stagger increment between consecutive clusters.
pub const STAGGER_INCREMENT: Duration = Duration::from_millis(30);

/// One user-perceived character of a heading, with its reveal delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphemeSpan<'a> {
    /// The grapheme cluster, borrowed from the input text.
    pub cluster: &'a str,
    /// Position in the heading, starting at 0.
    pub index: usize,
    /// Reveal delay from the moment of triggering.
    pub delay: Duration,
}

/// Split `text` into grapheme spans with linearly staggered delays.
#[must_use]
pub fn grapheme_spans(text: &str, stagger: Duration) -> Vec<GraphemeSpan<'_>> {
    text.graphemes(true)
        .enumerate()
        .map(|(index, cluster)| GraphemeSpan {
            cluster,
            index,
            delay: stagger.saturating_mul(index as u32),
        })
        .collect()
}

/// Display width of a cluster in terminal-style cells, for hosts laying
/// out span boxes. Zero-width clusters (pure combining marks) report 0.
#[must_use]
pub fn cluster_width(cluster: &str) -> usize {
    cluster.width()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
