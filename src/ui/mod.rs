//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into
//! cells on the terminal.  The only state flowing back out is the
//! strip's layout measurement, which feeds the geometry engine.

pub mod strip;
pub mod theme;
