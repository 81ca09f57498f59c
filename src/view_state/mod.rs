//! View-state layer - Blocks, scrolling, and viewport allocation
//!
//! This module owns the terminal-independent layout of a frame: what a post
//! looks like once rendered into rows, how the focused post scrolls, and
//! which rows of which posts fit the line budget.
//!
//! # Module Structure
//!
//! - `types`: Core newtypes (ViewportDimensions, PostIndex)
//! - `block`: PhysicalLine and ContentBlock - rendered rows per post
//! - `scroll`: Offset clamping for the focused block
//! - `viewport`: ViewportAllocator - budget split across blocks

pub mod block;
pub mod scroll;
pub mod types;
pub mod viewport;

pub use block::{ContentBlock, PhysicalLine};
pub use types::{PostIndex, ViewportDimensions};
pub use viewport::{focus_window, Viewport, ViewportAllocator, ViewportChrome};
