//! threadview
//!
//! Terminal viewer for forum threads. Posts are laid out as independently
//! scrollable blocks under a fixed line budget, with optional inline image
//! previews rendered by an external tool.
//!
//! The core (`text`, `view_state`, `preview`) is pure or side-effect
//! contained; `view` is the impure terminal shell around it.

pub mod config;
pub mod logging;
pub mod model;
pub mod preview;
pub mod source;
pub mod state;
pub mod text;
pub mod view;
pub mod view_state;
