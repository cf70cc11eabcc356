//! Placeholder interpolation
//!
//! Args are referenced from config text as `${name}` (whitespace inside the
//! braces is allowed). `$${` is an escaped, literal `${`: it never matches a
//! placeholder and is turned back into `${` only when text is expanded for
//! execution.

use crate::config::types::Task;
use crate::error::{DefinitionError, DefinitionResult};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
    // The escape alternative comes first so `$${x}` is consumed as an escape.
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\$\$\{|\$\{\s*([A-Za-z0-9_][A-Za-z0-9_-]*)\s*\}").unwrap();
    static ref ARG_NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").unwrap();
}

const ESCAPED_OPEN: &str = "$${";
const OPEN: &str = "${";

/// Whether `name` can be referenced by a placeholder
pub fn is_valid_arg_name(name: &str) -> bool {
    ARG_NAME_RE.is_match(name)
}

/// The placeholder of a single arg
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    name: String,
}

/// Build the placeholder matcher for an arg name
pub fn pattern_for(name: &str) -> Placeholder {
    Placeholder {
        name: name.to_string(),
    }
}

impl Placeholder {
    /// Whether the placeholder occurs unescaped in `text`
    pub fn is_in(&self, text: &str) -> bool {
        PLACEHOLDER_RE
            .captures_iter(text)
            .any(|caps| caps.get(1).is_some_and(|m| m.as_str() == self.name))
    }
}

/// Names of the unescaped placeholders in `text`, in order of appearance
pub fn placeholder_names(text: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Whether `task` references the arg `name` anywhere in its definition.
///
/// The task is serialized as YAML and searched, so usage text, local arg
/// defaults, conditions and run steps all count. Pre-task bodies do not.
pub fn task_uses(task: &Task, name: &str) -> DefinitionResult<bool> {
    let text = serde_yaml::to_string(task).map_err(|e| DefinitionError::Serialize {
        task: task.name.clone(),
        error: e.to_string(),
    })?;
    Ok(pattern_for(name).is_in(&text))
}

/// Substitute several args in one pass over raw config text.
///
/// Inserted values are not rescanned, so a value that itself looks like a
/// placeholder stays literal. Escapes are preserved for the final parse.
pub fn substitute_all(text: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures<'_>| {
            caps.get(1)
                .and_then(|m| values.get(m.as_str()))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Expand placeholders for execution and resolve escapes.
///
/// Unknown placeholders are left untouched.
pub fn expand(text: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures<'_>| {
            if &caps[0] == ESCAPED_OPEN {
                return OPEN.to_string();
            }
            caps.get(1)
                .and_then(|m| values.get(m.as_str()))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
