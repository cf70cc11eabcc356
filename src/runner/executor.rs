//! Task execution engine
//!
//! Runs pre-tasks depth-first in listed order, then the task's own run
//! items. The first failure stops everything above it.

use crate::config::{expand, ArgKind, PreTaskPolicy};
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::args::{expand_defaults, resolve_value, FlagValues, ValueOrigin};
use crate::runner::command::{CommandRunner, PreparedCommand};
use crate::runner::context::{Context, Environment};
use crate::runner::graph::TaskGraph;
use crate::runner::task::{Run, Task, TaskId};
use crate::runner::when::evaluate_when_list;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Bound arg values of one task, by arg name
pub type Bindings = HashMap<String, String>;

/// Executes tasks of a resolved graph
#[derive(Debug)]
pub struct Executor<'a> {
    graph: &'a TaskGraph,
    flags: &'a FlagValues,
    policy: PreTaskPolicy,
    bindings: HashMap<TaskId, Bindings>,
    completed: HashSet<TaskId>,
}

impl<'a> Executor<'a> {
    pub fn new(graph: &'a TaskGraph, flags: &'a FlagValues) -> Self {
        Executor {
            graph,
            flags,
            policy: PreTaskPolicy::default(),
            bindings: HashMap::new(),
            completed: HashSet::new(),
        }
    }

    /// Set the pre-task deduplication policy
    pub fn with_policy(mut self, policy: PreTaskPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run a task and its pre-tasks.
    ///
    /// Arg values for every reachable task are resolved first, so an invalid
    /// value fails the run before any process is spawned.
    pub fn run(
        &mut self,
        root: TaskId,
        ctx: &mut Context,
        runner: &mut dyn CommandRunner,
    ) -> ExecutionResult<()> {
        for id in self.graph.reachable(root) {
            let values = bind_task(self.graph.task(id), self.flags, &ctx.env)?;
            self.bindings.insert(id, values);
        }
        self.execute(root, ctx, runner)
    }

    fn execute(
        &mut self,
        id: TaskId,
        ctx: &mut Context,
        runner: &mut dyn CommandRunner,
    ) -> ExecutionResult<()> {
        let graph = self.graph;
        let task = graph.task(id);

        ctx.push_task(task.name.clone());
        ctx.print_task_start();

        let result = self.execute_inner(id, task, ctx, runner);

        ctx.pop_task();
        if result.is_ok() {
            self.completed.insert(id);
            ctx.print_task_complete(&task.name);
        }
        result
    }

    fn execute_inner(
        &mut self,
        id: TaskId,
        task: &Task,
        ctx: &mut Context,
        runner: &mut dyn CommandRunner,
    ) -> ExecutionResult<()> {
        let graph = self.graph;
        for &pre in graph.pre_tasks(id) {
            if self.policy == PreTaskPolicy::Once && self.completed.contains(&pre) {
                ctx.print_task_skip(&graph.task(pre).name, "already ran");
                continue;
            }
            self.execute(pre, ctx, runner)?;
        }

        let values = self
            .bindings
            .get(&id)
            .ok_or_else(|| ExecutionError::TaskNotFound(task.name.clone()))?;

        for run in &task.run {
            execute_run_item(task, run, values, ctx, runner)?;
        }
        Ok(())
    }
}

/// Resolve the values of every arg in a task's scope.
///
/// String defaults may embed other args of the scope; they are expanded
/// once every plain value is known.
pub fn bind_task(task: &Task, flags: &FlagValues, env: &Environment) -> ExecutionResult<Bindings> {
    let mut values = Bindings::with_capacity(task.args.len());
    let mut from_defaults = Vec::new();

    for scoped in &task.args {
        let resolved = resolve_value(&task.name, &scoped.arg, flags, env)?;
        if resolved.origin == ValueOrigin::Default && scoped.arg.kind() == ArgKind::String {
            from_defaults.push(scoped.arg.name.clone());
        }
        values.insert(scoped.arg.name.clone(), resolved.value);
    }

    expand_defaults(&mut values, from_defaults);
    Ok(values)
}

/// Execute a single run item
fn execute_run_item(
    task: &Task,
    run: &Run,
    values: &Bindings,
    ctx: &mut Context,
    runner: &mut dyn CommandRunner,
) -> ExecutionResult<()> {
    if !run.when.is_empty() && !evaluate_when_list(&run.when, &task.name, values, ctx, runner)? {
        ctx.print_debug("Skipping run item: condition not met");
        return Ok(());
    }

    for cmd in &run.commands {
        let prepared = PreparedCommand {
            task: task.name.clone(),
            exec: expand(cmd.exec(), values),
            print: expand(cmd.print(), values),
            quiet: cmd.is_quiet(),
            dir: cmd.dir().map(|dir| PathBuf::from(expand(dir, values))),
        };
        runner.run(&prepared, ctx)?;
    }

    for (key, value) in &run.set_environment {
        let value = value.as_deref().map(|v| expand(v, values));
        ctx.env.set(key.clone(), value);
    }

    Ok(())
}
