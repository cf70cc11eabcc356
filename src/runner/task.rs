//! Task runtime types
//!
//! This module contains the runtime representation of tasks, built from the
//! configuration once the final config is known.

use crate::config::{self, ArgSource};
use std::collections::HashMap;

/// Index of a task inside a [`TaskGraph`](crate::runner::TaskGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) usize);

/// A task ready for execution
///
/// This differs from config::Task by carrying the args in scope (locals plus
/// used globals) and the resolved pre-task links.
#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,

    pub usage: Option<String>,

    /// Args visible to this task, locals first
    pub args: Vec<ScopedArg>,

    /// Pre-task names as listed in the config
    pub pre_names: Vec<String>,

    /// Pre-tasks, resolved in listed order
    pub pre_tasks: Vec<TaskId>,

    pub run: Vec<Run>,
}

impl Task {
    /// Create a runtime task; pre-task links are filled in by the graph
    pub fn from_config(task: &config::Task, args: Vec<(&config::Arg, ArgSource)>) -> Self {
        Task {
            name: task.name.clone(),
            usage: task.usage.clone(),
            args: args
                .into_iter()
                .map(|(arg, source)| ScopedArg {
                    arg: arg.clone(),
                    source,
                })
                .collect(),
            pre_names: task.pre.clone(),
            pre_tasks: Vec::new(),
            run: task.run.iter().cloned().map(Run::from_config).collect(),
        }
    }
}

/// An arg as seen by one task
#[derive(Debug, Clone)]
pub struct ScopedArg {
    pub arg: config::Arg,
    pub source: ArgSource,
}

/// A run item with its command shapes flattened
#[derive(Debug, Clone)]
pub struct Run {
    /// All must hold for the item to run
    pub when: Vec<When>,

    pub commands: Vec<Command>,

    /// `None` unsets the variable
    pub set_environment: HashMap<String, Option<String>>,
}

impl Run {
    pub fn from_config(config: config::Run) -> Self {
        match config {
            config::Run::SimpleCommand(cmd) => Run {
                when: Vec::new(),
                commands: vec![Command::Simple(cmd)],
                set_environment: HashMap::new(),
            },
            config::Run::Complex(item) => Run {
                when: item.when.into_iter().map(When::from_config).collect(),
                commands: item
                    .command
                    .into_iter()
                    .map(Command::from_config)
                    .collect(),
                set_environment: item.set_environment,
            },
        }
    }
}

/// A command of a run item
#[derive(Debug, Clone)]
pub enum Command {
    Simple(String),

    /// Mapping form with `exec` and its options
    Complex {
        exec: String,
        print: String,
        quiet: bool,
        dir: Option<String>,
    },
}

impl Command {
    pub fn from_config(config: config::Command) -> Self {
        match config {
            config::Command::Simple(cmd) => Command::Simple(cmd),
            config::Command::Complex(detail) => Command::Complex {
                print: detail.print.clone().unwrap_or_else(|| detail.exec.clone()),
                exec: detail.exec,
                quiet: detail.quiet,
                dir: detail.dir,
            },
        }
    }

    /// Text handed to the interpreter
    pub fn exec(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { exec, .. } => exec,
        }
    }

    /// Text echoed before running; `exec` unless `print` is set
    pub fn print(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { print, .. } => print,
        }
    }

    pub fn is_quiet(&self) -> bool {
        match self {
            Command::Simple(_) => false,
            Command::Complex { quiet, .. } => *quiet,
        }
    }

    pub fn dir(&self) -> Option<&str> {
        match self {
            Command::Simple(_) => None,
            Command::Complex { dir, .. } => dir.as_deref(),
        }
    }
}

/// One entry of a `when` list; holds when all of its conditions hold
#[derive(Debug, Clone, Default)]
pub struct When {
    pub conditions: Vec<WhenCondition>,
}

impl When {
    pub fn from_config(config: config::When) -> Self {
        let mut conditions = Vec::new();
        if let Some(eq) = config.equal {
            conditions.push(WhenCondition::Equal {
                left: eq.left,
                right: eq.right,
            });
        }
        if let Some(ne) = config.not_equal {
            conditions.push(WhenCondition::NotEqual {
                left: ne.left,
                right: ne.right,
            });
        }
        if let Some(cmd) = config.command {
            conditions.push(WhenCondition::Command(cmd));
        }
        if let Some(path) = config.exists {
            conditions.push(WhenCondition::Exists(path));
        }
        if let Some(var) = config.env_set {
            conditions.push(WhenCondition::EnvSet(var));
        }
        if let Some(var) = config.env_not_set {
            conditions.push(WhenCondition::EnvNotSet(var));
        }

        When { conditions }
    }
}

/// What a condition checks
#[derive(Debug, Clone)]
pub enum WhenCondition {
    Equal { left: String, right: String },
    NotEqual { left: String, right: String },
    Command(String),
    Exists(String),
    EnvSet(String),
    EnvNotSet(String),
}
