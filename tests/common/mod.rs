//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tusk::error::{ExecutionError, ExecutionResult};
use tusk::runner::{CommandRunner, Context, PreparedCommand};

/// Create a temporary directory with a tusk.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("tusk.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test config in a subdirectory
pub fn create_test_config_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("tusk.yml");
    let sub_dir = temp_dir.path().join("subdir");

    fs::write(&config_path, content).unwrap();
    fs::create_dir(&sub_dir).unwrap();

    (temp_dir, config_path, sub_dir)
}

/// Command runner that records what would run instead of spawning it
#[derive(Debug, Default)]
pub struct RecordingRunner {
    /// (task, command) pairs in execution order
    pub ran: Vec<(String, String)>,
    /// Commands that fail when run
    pub failing: Vec<String>,
}

impl RecordingRunner {
    pub fn failing_on(commands: &[&str]) -> Self {
        RecordingRunner {
            ran: Vec::new(),
            failing: commands.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn commands(&self) -> Vec<&str> {
        self.ran.iter().map(|(_, cmd)| cmd.as_str()).collect()
    }

    pub fn tasks(&self) -> Vec<&str> {
        self.ran.iter().map(|(task, _)| task.as_str()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, cmd: &PreparedCommand, _ctx: &Context) -> ExecutionResult<()> {
        self.ran.push((cmd.task.clone(), cmd.exec.clone()));
        if self.failing.contains(&cmd.exec) {
            return Err(ExecutionError::CommandFailed {
                task: cmd.task.clone(),
                code: Some(2),
            });
        }
        Ok(())
    }

    fn check(&mut self, _task: &str, script: &str, _ctx: &Context) -> ExecutionResult<bool> {
        Ok(script == "true")
    }
}
