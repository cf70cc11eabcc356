//! Error types for Tusk

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Tusk operations
pub type Result<T> = std::result::Result<T, TuskError>;

/// Main error type for Tusk
#[derive(Error, Debug)]
pub enum TuskError {
    /// Locating, reading or parsing the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid arg or flag definitions
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Broken links between tasks
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Command line parsing errors
    #[error("{0}")]
    Cli(#[from] clap::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TuskError {
    /// Whether the error happened before any task context existed, in which
    /// case the generic top-level help is shown after it.
    pub fn shows_generic_help(&self) -> bool {
        matches!(self, TuskError::Config(_) | TuskError::Cli(_))
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TuskError::Execution(ExecutionError::CommandFailed {
                code: Some(code), ..
            }) if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Configuration discovery and parsing errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Failed to read '{path}': {error}")]
    Read { path: PathBuf, error: io::Error },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to load env file '{path}': {error}")]
    EnvFile { path: PathBuf, error: String },

    #[error("Task '{0}' is not defined once flag values are applied")]
    TaskMissing(String),
}

/// Invalid definitions of args and the flags generated from them
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("{owner}: arg name '{arg}' must only contain letters, digits, '_' and '-'")]
    InvalidName { owner: String, arg: String },

    #[error("{owner}: arg name '{arg}' is reserved")]
    ReservedName { owner: String, arg: String },

    #[error("{owner}: short flag '{short}' for arg '{arg}' must be a single character other than 'h'")]
    InvalidShort {
        owner: String,
        arg: String,
        short: String,
    },

    #[error("{owner}: bool arg '{arg}' cannot declare allowed values")]
    BoolWithValues { owner: String, arg: String },

    #[error("{owner}: default '{default}' for arg '{arg}' is not one of {allowed:?}")]
    DefaultNotAllowed {
        owner: String,
        arg: String,
        default: String,
        allowed: Vec<String>,
    },

    #[error("{owner}: required arg '{arg}' cannot declare a default")]
    RequiredWithDefault { owner: String, arg: String },

    #[error("could not add flag '--{flag}' to command '{task}': flag is already defined")]
    DuplicateFlag { task: String, flag: String },

    #[error("could not add flag '--{flag}' to command '{task}': short '-{short}' is already used by '--{other}'")]
    DuplicateShort {
        task: String,
        flag: String,
        short: char,
        other: String,
    },

    #[error("could not serialize task '{task}': {error}")]
    Serialize { task: String, error: String },
}

/// Errors linking tasks to their pre-tasks
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("task '{task}' lists pre-task '{missing}', which is not defined")]
    UnknownPreTask { task: String, missing: String },

    #[error("pre-task cycle detected: {}", .members.join(" -> "))]
    Cycle { members: Vec<String> },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("task '{task}': command failed{}", exit_status(.code))]
    CommandFailed { task: String, code: Option<i32> },

    #[error("task '{task}': could not start '{command}': {error}")]
    Spawn {
        task: String,
        command: String,
        error: io::Error,
    },

    #[error("task '{task}': no value passed for required arg '{arg}'")]
    MissingArg { task: String, arg: String },

    #[error("task '{task}': value '{value}' for arg '{arg}' is not one of {allowed:?}")]
    InvalidValue {
        task: String,
        arg: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("task '{0}' is not defined")]
    TaskNotFound(String),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {}", code),
        None => " (terminated by signal)".to_string(),
    }
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for definition checks
pub type DefinitionResult<T> = std::result::Result<T, DefinitionError>;

/// Specialized result type for task graph operations
pub type ReferenceResult<T> = std::result::Result<T, ReferenceError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
