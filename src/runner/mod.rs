//! Task execution engine
//!
//! This module links tasks into a graph, binds arg values, and runs tasks
//! with their pre-tasks.

pub mod args;
pub mod command;
pub mod context;
pub mod executor;
pub mod graph;
pub mod task;
pub mod when;

// Re-export main types
pub use args::*;
pub use command::*;
pub use context::*;
pub use executor::*;
pub use graph::*;
pub use task::*;
pub use when::*;
