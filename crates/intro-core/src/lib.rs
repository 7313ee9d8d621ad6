#![forbid(unsafe_code)]

//! Core: input events, gesture classification, and the narrative step sequencer.

pub mod auto_advance;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod sequencer;

pub use auto_advance::AutoAdvance;
pub use event::{ClickRegion, InputEvent};
pub use geometry::Rect;
pub use gesture::{Direction, Gesture, GestureAggregator, GestureConfig, Source};
pub use sequencer::{
    SequencerConfig, SequencerEvent, StepSequencer, TransitionOutcome,
};
