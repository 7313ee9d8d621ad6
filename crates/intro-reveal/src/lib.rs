#![forbid(unsafe_code)]

//! Viewport-triggered one-shot reveals and grapheme stagger animation.

pub mod animator;
pub mod easing;
pub mod grapheme;
pub mod observer;
pub mod reveal;

pub use animator::{AnimatorConfig, GraphemeAnimator, ScopeLayout};
pub use grapheme::{GraphemeSpan, STAGGER_INCREMENT, cluster_width, grapheme_spans};
pub use observer::{ObserverConfig, RevealObserver, TargetId};
pub use reveal::{Reveal, RevealPlayback};
