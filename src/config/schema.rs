//! Arg definition checks and arg scope
//!
//! This module checks arg definitions and decides which args are in scope
//! for a task.

use crate::config::interpolate::{is_valid_arg_name, task_uses};
use crate::config::types::{Arg, ArgKind, Config, Task};
use crate::error::{DefinitionError, DefinitionResult};

/// Arg names that would clash with built-in flags
const RESERVED_ARG_NAMES: &[&str] = &["help"];

/// Validate every global and local arg definition
pub fn validate_config(config: &Config) -> DefinitionResult<()> {
    let mut globals: Vec<&Arg> = config.args.values().collect();
    globals.sort_by(|a, b| a.name.cmp(&b.name));
    for arg in globals {
        validate_arg("global args", arg)?;
    }

    let mut tasks: Vec<&Task> = config.tasks.values().collect();
    tasks.sort_by(|a, b| a.name.cmp(&b.name));
    for task in tasks {
        validate_task(task)?;
    }

    Ok(())
}

/// Validate the local args of a single task
pub fn validate_task(task: &Task) -> DefinitionResult<()> {
    let owner = format!("task '{}'", task.name);
    let mut args: Vec<&Arg> = task.args.values().collect();
    args.sort_by(|a, b| a.name.cmp(&b.name));
    for arg in args {
        validate_arg(&owner, arg)?;
    }
    Ok(())
}

/// Validate a single arg definition
fn validate_arg(owner: &str, arg: &Arg) -> DefinitionResult<()> {
    let err_owner = || owner.to_string();

    if !is_valid_arg_name(&arg.name) {
        return Err(DefinitionError::InvalidName {
            owner: err_owner(),
            arg: arg.name.clone(),
        });
    }

    if RESERVED_ARG_NAMES.contains(&arg.name.as_str()) {
        return Err(DefinitionError::ReservedName {
            owner: err_owner(),
            arg: arg.name.clone(),
        });
    }

    if let Some(short) = &arg.short {
        if short_flag(short).is_none() {
            return Err(DefinitionError::InvalidShort {
                owner: err_owner(),
                arg: arg.name.clone(),
                short: short.clone(),
            });
        }
    }

    if arg.required && arg.default.is_some() {
        return Err(DefinitionError::RequiredWithDefault {
            owner: err_owner(),
            arg: arg.name.clone(),
        });
    }

    match arg.kind() {
        ArgKind::Bool if !arg.values.is_empty() => Err(DefinitionError::BoolWithValues {
            owner: err_owner(),
            arg: arg.name.clone(),
        }),
        ArgKind::Choice(values) => match &arg.default {
            Some(default) if !values.contains(default) => {
                Err(DefinitionError::DefaultNotAllowed {
                    owner: err_owner(),
                    arg: arg.name.clone(),
                    default: default.clone(),
                    allowed: values.to_vec(),
                })
            }
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

/// Parse a configured short flag; `h` is kept for help
pub fn short_flag(short: &str) -> Option<char> {
    let mut chars = short.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != 'h' && c != '-' && !c.is_whitespace() => Some(c),
        _ => None,
    }
}

/// Where an arg in scope comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSource {
    Local,
    Global,
}

/// The args a task can see: all local args, then every global arg the task
/// references. A local arg shadows a global arg of the same name.
pub fn args_in_scope<'a>(
    config: &'a Config,
    task: &'a Task,
) -> DefinitionResult<Vec<(&'a Arg, ArgSource)>> {
    let mut local: Vec<&Arg> = task.args.values().collect();
    local.sort_by(|a, b| a.name.cmp(&b.name));

    let mut global: Vec<&Arg> = config
        .args
        .values()
        .filter(|arg| !task.args.contains_key(&arg.name))
        .collect();
    global.sort_by(|a, b| a.name.cmp(&b.name));

    let mut scope: Vec<(&Arg, ArgSource)> =
        local.into_iter().map(|arg| (arg, ArgSource::Local)).collect();

    for arg in global {
        if task_uses(task, &arg.name)? {
            scope.push((arg, ArgSource::Global));
        }
    }

    Ok(scope)
}
