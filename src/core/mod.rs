//! Core engine — geometry, band math, motion state machine, drag, tween.
//!
//! Nothing in this module depends on any TUI or rendering crate, and
//! time only enters as `now_ms` arguments, so every path is
//! deterministic under test.

pub mod band;
pub mod deck;
pub mod drag;
pub mod geometry;
pub mod motion;
pub mod tween;
