//! Two-phase bootstrap
//!
//! The flags a task accepts depend on the config, and the config text may
//! embed those flag values through placeholders. Discovery parses the raw
//! text, builds the command tree and captures the flags given to the invoked
//! task. Finalize substitutes the captured values into the raw text and
//! parses it again. Callers only see the final result.

use crate::cli::app::{base_command, get_verbosity};
use crate::cli::flags::FlagSchema;
use crate::config::{parse_config, substitute_all, validate_config, Config};
use crate::error::{ConfigError, Result};
use crate::runner::{FlagCapture, FlagValues, TaskGraph, TaskId, Verbosity};
use clap::error::ErrorKind;
use clap::Command;
use std::collections::HashMap;

/// Outcome of resolving the command line against a config
#[derive(Debug)]
pub enum Bootstrap {
    /// Help or version output requested; print it and stop
    Display(clap::Error),

    /// No task was named; the full help text
    NoTask(String),

    /// A task is ready to run
    Invocation(Invocation),
}

/// Everything needed to run the invoked task
#[derive(Debug)]
pub struct Invocation {
    /// Config parsed from the substituted text
    pub config: Config,

    /// Task graph of the final config
    pub graph: TaskGraph,

    /// The invoked task
    pub task: TaskId,

    /// Flags given on the command line
    pub flags: FlagValues,

    pub verbosity: Verbosity,
}

/// The discovery command tree with each task's flag schema
#[derive(Debug)]
pub struct CommandTree {
    pub command: Command,
    pub schemas: HashMap<String, FlagSchema>,
}

/// Build the root command with one subcommand per task
pub fn build_command(config: &Config) -> Result<CommandTree> {
    let mut command = base_command();
    if let Some(name) = &config.name {
        command = command.name(name.clone()).bin_name(name.clone());
    }
    if let Some(usage) = &config.usage {
        command = command.about(usage.clone());
    }

    let mut names: Vec<&String> = config.tasks.keys().collect();
    names.sort();

    let mut schemas = HashMap::with_capacity(names.len());
    for name in names {
        let task = &config.tasks[name];
        let schema = FlagSchema::for_task(config, task)?;

        let mut task_cmd = Command::new(name.clone())
            .about(task.usage.clone().unwrap_or_default())
            .hide(task.private)
            .args(schema.to_clap_args());

        if let Some(desc) = &task.description {
            task_cmd = task_cmd.long_about(desc.clone());
        }

        command = command.subcommand(task_cmd);
        schemas.insert(name.clone(), schema);
    }

    Ok(CommandTree { command, schemas })
}

/// Resolve raw config text and an argument vector into a final invocation
pub fn resolve(raw: &str, args: &[String]) -> Result<Bootstrap> {
    let discovery = parse_config(raw)?;
    validate_config(&discovery)?;
    let mut tree = build_command(&discovery)?;

    let matches = match tree.command.clone().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) if is_display(e.kind()) => return Ok(Bootstrap::Display(e)),
        Err(e) => return Err(e.into()),
    };

    let verbosity = get_verbosity(&matches);
    let Some((task_name, task_matches)) = matches.subcommand() else {
        return Ok(Bootstrap::NoTask(tree.command.render_help().to_string()));
    };

    let mut capture = FlagCapture::new();
    if let Some(schema) = tree.schemas.get(task_name) {
        schema.capture(task_matches, &mut capture);
    }
    let flags = capture.finish();
    log::debug!("Discovered {} flag value(s) for '{}'", flags.len(), task_name);

    let config = finalize(raw, &flags)?;
    let graph = TaskGraph::resolve(&config)?;
    let task = graph
        .get(task_name)
        .ok_or_else(|| ConfigError::TaskMissing(task_name.to_string()))?;

    Ok(Bootstrap::Invocation(Invocation {
        config,
        graph,
        task,
        flags,
        verbosity,
    }))
}

/// Substitute captured flag values into the raw text and parse the result
fn finalize(raw: &str, flags: &FlagValues) -> Result<Config> {
    let text = substitute_all(raw, flags.as_map());
    let config = parse_config(&text)?;
    validate_config(&config)?;
    Ok(config)
}

fn is_display(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}
