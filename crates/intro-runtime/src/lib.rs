#![forbid(unsafe_code)]

//! Runtime: the narrative program loop and its scripted test harness.

pub mod harness;
pub mod narrative;

pub use harness::{NarrativeDriver, ScriptedClock};
pub use narrative::Narrative;
