//! `when` conditions of run items
//!
//! Every field is expanded with the task's bound values before it is tested.

use crate::config::expand;
use crate::error::ExecutionResult;
use crate::runner::{CommandRunner, Context, When, WhenCondition};
use std::collections::HashMap;

/// True when every entry holds; stops at the first that does not
pub fn evaluate_when_list(
    when_list: &[When],
    task: &str,
    values: &HashMap<String, String>,
    ctx: &Context,
    runner: &mut dyn CommandRunner,
) -> ExecutionResult<bool> {
    for when in when_list {
        if !evaluate_when(when, task, values, ctx, runner)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// True when every condition of one entry holds
pub fn evaluate_when(
    when: &When,
    task: &str,
    values: &HashMap<String, String>,
    ctx: &Context,
    runner: &mut dyn CommandRunner,
) -> ExecutionResult<bool> {
    for condition in &when.conditions {
        if !evaluate_condition(condition, task, values, ctx, runner)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn evaluate_condition(
    condition: &WhenCondition,
    task: &str,
    values: &HashMap<String, String>,
    ctx: &Context,
    runner: &mut dyn CommandRunner,
) -> ExecutionResult<bool> {
    match condition {
        WhenCondition::Equal { left, right } => {
            Ok(expand(left, values) == expand(right, values))
        }

        WhenCondition::NotEqual { left, right } => {
            Ok(expand(left, values) != expand(right, values))
        }

        WhenCondition::Command(cmd) => runner.check(task, &expand(cmd, values), ctx),

        WhenCondition::Exists(path) => {
            let full_path = ctx.working_dir.join(expand(path, values));
            Ok(full_path.exists())
        }

        WhenCondition::EnvSet(var_name) => Ok(ctx.env.get(&expand(var_name, values)).is_some()),

        WhenCondition::EnvNotSet(var_name) => {
            Ok(ctx.env.get(&expand(var_name, values)).is_none())
        }
    }
}
