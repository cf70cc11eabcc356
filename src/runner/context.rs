//! Runtime state shared by every task of one invocation

use crate::error::{ConfigError, ConfigResult};
use crate::ui;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// State threaded through the executor and the command runner
#[derive(Debug)]
pub struct Context {
    /// Directory commands run in unless a step sets `dir`
    pub working_dir: PathBuf,

    pub config_path: Option<PathBuf>,

    /// Environment seen by args and spawned commands
    pub env: Environment,

    /// Program and leading arguments each command is appended to
    pub interpreter: Vec<String>,

    /// Tasks currently running, outermost first
    pub task_stack: Vec<String>,

    pub verbosity: Verbosity,
}

/// How much tusk itself prints; command output is never filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Context rooted at the process working directory, running through `sh -c`
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_path: None,
            env: Environment::inherited(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            task_stack: Vec::new(),
            verbosity: Verbosity::Normal,
        }
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Enter a task
    pub fn push_task(&mut self, task_name: String) {
        self.task_stack.push(task_name);
    }

    /// Leave the innermost task
    pub fn pop_task(&mut self) -> Option<String> {
        self.task_stack.pop()
    }

    /// Directory holding the config file, falling back to the working directory
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.working_dir.clone())
    }

    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            ui::info(message);
        }
    }

    /// Shown with `--verbose` only
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            ui::debug(message);
        }
    }

    pub fn print_command(&self, command: &str) {
        if self.verbosity >= Verbosity::Normal {
            ui::command(command);
        }
    }

    /// Announce the innermost task along with the chain that led to it
    pub fn print_task_start(&self) {
        self.print_info(&format!("Running task: {}", self.task_stack.join(" > ")));
    }

    pub fn print_task_complete(&self, task_name: &str) {
        self.print_debug(&format!("Finished '{}'", task_name));
    }

    pub fn print_task_skip(&self, task_name: &str, reason: &str) {
        self.print_debug(&format!("Skipped '{}' ({})", task_name, reason));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variables layered over the process environment.
///
/// Overrides come from the env file and from `set-environment` run items;
/// a `None` override hides the variable.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    overrides: HashMap<String, Option<String>>,
    inherit: bool,
}

impl Environment {
    /// Environment backed by the current process
    pub fn inherited() -> Self {
        Environment {
            overrides: HashMap::new(),
            inherit: true,
        }
    }

    /// Environment that ignores the current process
    pub fn isolated() -> Self {
        Environment::default()
    }

    /// Add a variable
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.set(key.to_string(), Some(value.to_string()));
        self
    }

    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<String> {
        match self.overrides.get(key) {
            Some(value) => value.clone(),
            None if self.inherit => env::var(key).ok(),
            None => None,
        }
    }

    /// Set (`Some`) or hide (`None`) a variable
    pub fn set(&mut self, key: String, value: Option<String>) {
        self.overrides.insert(key, value);
    }

    /// Overrides to apply to a spawned process
    pub fn overrides(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.overrides
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Load a dotenv file; variables already present are kept
    pub fn load_file(&mut self, path: &Path) -> ConfigResult<()> {
        let to_err = |error: String| ConfigError::EnvFile {
            path: path.to_path_buf(),
            error,
        };

        let iter = dotenvy::from_path_iter(path).map_err(|e| to_err(e.to_string()))?;
        for item in iter {
            let (key, value) = item.map_err(|e| to_err(e.to_string()))?;
            if self.get(&key).is_none() {
                self.set(key, Some(value));
            }
        }

        log::debug!("Loaded env file {}", path.display());
        Ok(())
    }
}
