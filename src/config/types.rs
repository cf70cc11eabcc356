//! The tusk.yml data model
//!
//! These types mirror the file as written. Names of tasks and args live in
//! map keys and are copied into the values after parsing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A whole tusk.yml file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Program name shown in help
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// One-line description shown in help
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    #[serde(default)]
    pub tasks: HashMap<String, Task>,

    /// Global args, exposed as flags on the tasks that use them
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub args: HashMap<String, Arg>,

    /// Program and leading arguments commands are passed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// How often a pre-task shared by several tasks runs
    #[serde(default)]
    pub pre_task_policy: PreTaskPolicy,

    /// Dotenv file loaded before args are resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<String>,
}

/// Pre-task deduplication policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreTaskPolicy {
    /// Run a pre-task every time it is listed
    #[default]
    Always,

    /// Run each task at most once per invocation
    Once,
}

/// A task as written under `tasks`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Task {
    /// Task name, backfilled from its map key
    #[serde(skip)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Shown by `tusk <task> --help` only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hidden from the task list, still runnable
    #[serde(default)]
    pub private: bool,

    /// Local args for the task
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub args: HashMap<String, Arg>,

    /// Names of tasks to run before this one, in order
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_names"
    )]
    pub pre: Vec<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_run_items"
    )]
    pub run: Vec<Run>,
}

/// One entry of a task's `run` list
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Run {
    SimpleCommand(String),
    Complex(RunItem),
}

/// A run entry written as a mapping
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunItem {
    /// Every condition must hold for the item to run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub when: Vec<When>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_commands"
    )]
    pub command: Vec<Command>,

    /// Applied after the commands; `~` unsets the variable
    #[serde(
        rename = "set-environment",
        default,
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub set_environment: HashMap<String, Option<String>>,
}

/// A command, either bare text or a detailed mapping
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Command {
    Simple(String),
    Complex(CommandDetail),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandDetail {
    pub exec: String,

    /// Echoed instead of `exec`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    #[serde(default)]
    pub quiet: bool,

    /// Relative to the working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// One condition of a `when` list; all fields set must hold
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct When {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equal: Option<WhenComparison>,

    #[serde(rename = "not-equal", skip_serializing_if = "Option::is_none")]
    pub not_equal: Option<WhenComparison>,

    /// Script that must exit zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<String>,

    #[serde(rename = "env-set", skip_serializing_if = "Option::is_none")]
    pub env_set: Option<String>,

    #[serde(rename = "env-not-set", skip_serializing_if = "Option::is_none")]
    pub env_not_set: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhenComparison {
    pub left: String,
    pub right: String,
}

/// An argument definition, either global or local to a task
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Arg {
    /// Arg name, backfilled from its map key
    #[serde(skip)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Single-character alias of the flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,

    /// Declared value type
    #[serde(rename = "type", default)]
    pub arg_type: ArgType,

    /// Any scalar; kept as its text
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_scalar"
    )]
    pub default: Option<String>,

    /// Environment variable that overrides the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Allowed values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    /// Whether a value must be supplied by flag or environment
    #[serde(default)]
    pub required: bool,
}

/// Declared arg type as written in the config
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    #[default]
    String,
    #[serde(alias = "boolean")]
    Bool,
}

/// The closed set of value kinds an arg can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind<'a> {
    /// Free-form text
    String,
    /// A switch; its value is `true` or `false`
    Bool,
    /// One of an enumerated set of values
    Choice(&'a [String]),
}

impl Arg {
    /// The value kind of this arg; declared values make it a choice
    pub fn kind(&self) -> ArgKind<'_> {
        match self.arg_type {
            ArgType::Bool => ArgKind::Bool,
            ArgType::String if !self.values.is_empty() => ArgKind::Choice(&self.values),
            ArgType::String => ArgKind::String,
        }
    }
}

/// Deserialize a single name or a list of names
fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| String::deserialize(item).map_err(D::Error::custom))
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("pre must be a task name or a list of task names")),
    }
}

/// Deserialize any YAML scalar as its text
fn deserialize_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Null => Ok(None),
        _ => Err(D::Error::custom("default must be a scalar value")),
    }
}

/// Accept one run item or a list of them
fn deserialize_run_items<'de, D>(deserializer: D) -> Result<Vec<Run>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![Run::SimpleCommand(s)]),
        Value::Mapping(_) => Ok(vec![Run::deserialize(value).map_err(D::Error::custom)?]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| Run::deserialize(item).map_err(D::Error::custom))
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string, object, or array")),
    }
}

/// Accept one command or a list of them
fn deserialize_commands<'de, D>(deserializer: D) -> Result<Vec<Command>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![Command::Simple(s)]),
        Value::Mapping(_) => {
            let cmd = Command::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![cmd])
        }
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| Command::deserialize(item).map_err(D::Error::custom))
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("command must be a string, object, or array")),
    }
}
