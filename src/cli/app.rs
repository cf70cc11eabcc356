//! The `tusk` command and its entry points

use crate::cli::bootstrap::{resolve, Bootstrap, Invocation};
use crate::config::read_config_text;
use crate::error::TuskError;
use crate::runner::{Context, Environment, Executor, ShellRunner, Verbosity};
use crate::ui;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::env;
use std::path::{Path, PathBuf};

/// The root command without any tasks
pub fn base_command() -> Command {
    Command::new("tusk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A task runner built with simple configuration in mind")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Set FILE to use as the config file"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// Print the help of the root command without any tasks
pub fn print_generic_help() {
    if let Err(e) = base_command().print_help() {
        log::warn!("Failed to print help: {}", e);
    }
}

/// Silent wins over quiet, quiet over verbose
pub fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<(), TuskError> {
    run_from(env::args().collect())
}

/// Run with an explicit argument vector, program name first
pub fn run_from(args: Vec<String>) -> Result<(), TuskError> {
    let file_path = extract_file_arg(&args);
    let (raw, config_path) = read_config_text(file_path.as_deref())?;

    match resolve(&raw, &args)? {
        Bootstrap::Display(e) => {
            e.print()?;
            Ok(())
        }
        Bootstrap::NoTask(help) => {
            println!("{}", help);
            Ok(())
        }
        Bootstrap::Invocation(invocation) => execute(invocation, &config_path),
    }
}

/// Run the invoked task with the process runner
fn execute(invocation: Invocation, config_path: &Path) -> Result<(), TuskError> {
    let Invocation {
        config,
        graph,
        task,
        flags,
        verbosity,
    } = invocation;

    let mut ctx = Context::new()
        .with_config_path(config_path.to_path_buf())
        .with_verbosity(verbosity);

    if let Some(env_file) = &config.env_file {
        let mut env = Environment::inherited();
        env.load_file(&ctx.config_dir().join(env_file))?;
        ctx = ctx.with_env(env);
    }

    if let Some(interpreter) = &config.interpreter {
        ctx = ctx.with_interpreter(interpreter.clone());
    }

    let name = graph.task(task).name.clone();
    Executor::new(&graph, &flags)
        .with_policy(config.pre_task_policy)
        .run(task, &mut ctx, &mut ShellRunner)?;

    if verbosity >= Verbosity::Verbose {
        ui::success(&format!("Task '{}' finished", name));
    }
    Ok(())
}

/// Find `--file` in argv; the config must be read before clap can parse
pub fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }
        if arg == "--file" || arg == "-f" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--file=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}
