//! Unicode-aware measurement, escape handling and wrapping.
//!
//! Everything here is pure: identical inputs always produce identical
//! outputs, so the functions are safe to call from any render pass.

pub mod escape;
pub mod segment;
pub mod width;
pub mod wrap;

pub use escape::{
    hyperlink, pad_visible, strip_escapes, styled, truncate_keeping_escapes, visible_width,
    LINK_CLOSE, SGR_RESET,
};
pub use segment::{display_url, segment_line, TextSegment};
pub use width::{char_width, classify, str_width, take_by_width, WidthClass};
pub use wrap::{wrap_line, wrap_text};
