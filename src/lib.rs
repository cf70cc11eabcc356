//! Tusk - a declarative, YAML-configured task runner
//!
//! Tasks, their args and their pre-tasks are described in a `tusk.yml` file.
//! Every task becomes a subcommand whose flags are generated from the args it
//! declares or references.

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod ui;

pub use error::{Result, TuskError};

/// Current version of Tusk
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
