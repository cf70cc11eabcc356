//! Argument values
//!
//! Flag values captured during discovery, and resolution of each arg's final
//! value: flag, then environment variable, then default.

use crate::config::{expand, placeholder_names, Arg, ArgKind};
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::context::Environment;
use std::collections::HashMap;

/// Accumulator filled while the discovery pass inspects the invoked command
#[derive(Debug, Default)]
pub struct FlagCapture {
    values: HashMap<String, String>,
}

impl FlagCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value of a flag supplied on the command line
    pub fn record(&mut self, name: &str, value: String) {
        log::trace!("Captured flag --{}={}", name, value);
        self.values.insert(name.to_string(), value);
    }

    /// Freeze the captured values
    pub fn finish(self) -> FlagValues {
        FlagValues {
            values: self.values,
        }
    }
}

/// Read-only flag values supplied for the invoked task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    values: HashMap<String, String>,
}

impl FlagValues {
    /// Value supplied for a flag
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Name to value mapping
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlagValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FlagValues {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Where a bound value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    Flag,
    Environment,
    Default,
    Unset,
}

/// A resolved arg value with its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub origin: ValueOrigin,
}

/// Resolve the value of `arg` for `task`.
///
/// Precedence is the command-line flag, then the arg's environment variable,
/// then its default. A required arg must come from a flag or the environment.
pub fn resolve_value(
    task: &str,
    arg: &Arg,
    flags: &FlagValues,
    env: &Environment,
) -> ExecutionResult<Resolved> {
    let supplied = match flags.get(&arg.name) {
        Some(value) => Some((value.to_string(), ValueOrigin::Flag)),
        None => arg
            .environment
            .as_deref()
            .and_then(|var| env.get(var))
            .map(|value| (value, ValueOrigin::Environment)),
    };

    if arg.required && supplied.is_none() {
        return Err(ExecutionError::MissingArg {
            task: task.to_string(),
            arg: arg.name.clone(),
        });
    }

    let (value, origin) = match supplied {
        Some((value, origin)) => (Some(value), origin),
        None => match &arg.default {
            Some(default) => (Some(default.clone()), ValueOrigin::Default),
            None => (None, ValueOrigin::Unset),
        },
    };

    let value = match arg.kind() {
        ArgKind::String => value.unwrap_or_default(),
        ArgKind::Bool => match value {
            None => "false".to_string(),
            Some(value) => match parse_bool(&value) {
                Some(b) => b.to_string(),
                None => {
                    return Err(ExecutionError::InvalidValue {
                        task: task.to_string(),
                        arg: arg.name.clone(),
                        value,
                        allowed: vec!["true".to_string(), "false".to_string()],
                    })
                }
            },
        },
        ArgKind::Choice(allowed) => match value {
            None => String::new(),
            Some(value) if allowed.contains(&value) => value,
            Some(value) => {
                return Err(ExecutionError::InvalidValue {
                    task: task.to_string(),
                    arg: arg.name.clone(),
                    value,
                    allowed: allowed.to_vec(),
                })
            }
        },
    };

    Ok(Resolved { value, origin })
}

/// Expand placeholders inside the values named in `pending` against
/// `bindings`, dependencies first.
///
/// Only default text is passed here; values typed by the user are never
/// rescanned. Defaults that depend on each other in a cycle are left as
/// written.
pub fn expand_defaults(bindings: &mut HashMap<String, String>, mut pending: Vec<String>) {
    loop {
        let ready: Vec<String> = pending
            .iter()
            .filter(|name| {
                placeholder_names(&bindings[name.as_str()])
                    .iter()
                    .all(|dep| !pending.iter().any(|p| p == dep))
            })
            .cloned()
            .collect();

        if ready.is_empty() {
            break;
        }

        for name in ready {
            let value = expand(&bindings[name.as_str()], bindings);
            bindings.insert(name.clone(), value);
            pending.retain(|p| *p != name);
        }
    }

    if !pending.is_empty() {
        log::debug!("Defaults left unexpanded due to a cycle: {}", pending.join(", "));
    }
}

/// Accepted spellings of a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" | "" => Some(false),
        _ => None,
    }
}
