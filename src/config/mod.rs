//! Configuration parsing and validation
//!
//! This module handles parsing of tusk.yml configuration files, placeholder
//! interpolation over their text, and validation of arg definitions.

pub mod interpolate;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use interpolate::*;
pub use parse::*;
pub use schema::*;
pub use types::*;
