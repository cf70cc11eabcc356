//! Process spawning
//!
//! Spawning processes sits behind [`CommandRunner`] so the execution engine
//! only decides what runs and in which order.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::Context;
use std::path::PathBuf;
use std::process::{Command as StdCommand, Stdio};

/// A run step with every placeholder already expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    /// Task that owns the command
    pub task: String,

    /// Text handed to the interpreter
    pub exec: String,

    /// Text shown to the user
    pub print: String,

    /// Whether to skip echoing the command
    pub quiet: bool,

    /// Working directory, relative to the context's working directory
    pub dir: Option<PathBuf>,
}

/// Process-execution collaborator
pub trait CommandRunner {
    /// Run a command to completion; a non-zero status is an error
    fn run(&mut self, cmd: &PreparedCommand, ctx: &Context) -> ExecutionResult<()>;

    /// Run a condition check silently and report whether it succeeded
    fn check(&mut self, task: &str, script: &str, ctx: &Context) -> ExecutionResult<bool>;
}

/// Runs commands through the configured interpreter with inherited stdio.
///
/// The child shares the terminal's process group, so Ctrl-C reaches it
/// directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    fn build(script: &str, ctx: &Context) -> StdCommand {
        let (program, interpreter_args) = match ctx.interpreter.split_first() {
            Some((program, rest)) => (program.as_str(), rest),
            None => ("sh", &[][..]),
        };

        let mut command = StdCommand::new(program);
        command.args(interpreter_args);
        command.arg(script);

        for (key, value) in ctx.env.overrides() {
            match value {
                Some(value) => command.env(key, value),
                None => command.env_remove(key),
            };
        }

        command
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, cmd: &PreparedCommand, ctx: &Context) -> ExecutionResult<()> {
        if !cmd.quiet {
            ctx.print_command(&cmd.print);
        }

        let working_dir = match &cmd.dir {
            Some(dir) => ctx.working_dir.join(dir),
            None => ctx.working_dir.clone(),
        };

        let mut command = Self::build(&cmd.exec, ctx);
        command.current_dir(&working_dir);
        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());

        log::debug!("Spawning {:?} in {}", cmd.exec, working_dir.display());
        let status = command.status().map_err(|error| ExecutionError::Spawn {
            task: cmd.task.clone(),
            command: cmd.exec.clone(),
            error,
        })?;

        if !status.success() {
            return Err(ExecutionError::CommandFailed {
                task: cmd.task.clone(),
                code: status.code(),
            });
        }

        Ok(())
    }

    fn check(&mut self, task: &str, script: &str, ctx: &Context) -> ExecutionResult<bool> {
        let mut command = Self::build(script, ctx);
        command.current_dir(&ctx.working_dir);
        command.stdout(Stdio::null());
        command.stderr(Stdio::null());

        let status = command.status().map_err(|error| ExecutionError::Spawn {
            task: task.to_string(),
            command: script.to_string(),
            error,
        })?;

        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{Environment, Verbosity};
    use tempfile::TempDir;

    fn prepared(exec: &str) -> PreparedCommand {
        PreparedCommand {
            task: "test".to_string(),
            exec: exec.to_string(),
            print: exec.to_string(),
            quiet: true,
            dir: None,
        }
    }

    fn quiet_ctx() -> Context {
        Context::new().with_verbosity(Verbosity::Silent)
    }

    #[test]
    fn test_execute_simple_command() {
        let result = ShellRunner.run(&prepared("echo test"), &quiet_ctx());
        assert!(result.is_ok());
    }

    #[test]
    fn test_execute_failing_command_carries_status() {
        let result = ShellRunner.run(&prepared("exit 3"), &quiet_ctx());
        match result {
            Err(ExecutionError::CommandFailed { task, code }) => {
                assert_eq!(task, "test");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_command_runs_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let mut cmd = prepared("touch marker");
        cmd.dir = Some(PathBuf::from("sub"));
        let ctx = quiet_ctx().with_working_dir(temp_dir.path().to_path_buf());

        ShellRunner.run(&cmd, &ctx).unwrap();
        assert!(temp_dir.path().join("sub").join("marker").exists());
    }

    #[test]
    fn test_environment_overrides_reach_child() {
        let env = Environment::inherited().with_var("TUSK_CHILD_VAR", "ok");
        let ctx = quiet_ctx().with_env(env);
        let result = ShellRunner.check("test", "test \"$TUSK_CHILD_VAR\" = ok", &ctx);
        assert!(result.unwrap());
    }

    #[test]
    fn test_check_command() {
        assert!(ShellRunner.check("test", "true", &quiet_ctx()).unwrap());
        assert!(!ShellRunner.check("test", "false", &quiet_ctx()).unwrap());
    }
}
