//! CLI interface and argument parsing
//!
//! This module builds the command tree from the configuration, resolves the
//! two-phase bootstrap, and runs the invoked task.

pub mod app;
pub mod bootstrap;
pub mod flags;

// Re-export main types
pub use app::*;
pub use bootstrap::*;
pub use flags::*;
