//! Viewer state machine (pure).
//!
//! All state transitions are pure functions testable without a terminal.

pub mod app_state;

pub use app_state::{AppState, InFlight, ScrollGeometry};
