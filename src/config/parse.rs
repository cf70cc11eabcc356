//! Locating, reading and parsing tusk.yml

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File names looked for in each directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["tusk.yml", "tusk.yaml"];

/// Search the working directory and its ancestors
pub fn find_config_file() -> ConfigResult<PathBuf> {
    let current_dir = env::current_dir().map_err(|error| ConfigError::Read {
        path: PathBuf::from("."),
        error,
    })?;
    find_config_file_from(current_dir)
}

/// Search `start_dir` and its ancestors; the closest file wins
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                log::debug!("Found config file at {}", config_path.display());
                return Ok(config_path);
            }
            searched_paths.push(config_path.display().to_string());
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Read raw configuration text, from `path` or by discovery
pub fn read_config_text(path: Option<&Path>) -> ConfigResult<(String, PathBuf)> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let text = fs::read_to_string(&path).map_err(|error| match error.kind() {
        std::io::ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
        _ => ConfigError::Read {
            path: path.clone(),
            error,
        },
    })?;

    Ok((text, path))
}

/// Parse configuration from a string and backfill names from map keys
pub fn parse_config(yaml: &str) -> ConfigResult<Config> {
    let mut config: Config = serde_yaml::from_str(yaml)?;
    backfill_names(&mut config);
    Ok(config)
}

/// Copy every task and arg map key into the item's `name` field
fn backfill_names(config: &mut Config) {
    for (name, arg) in config.args.iter_mut() {
        arg.name = name.clone();
    }

    for (name, task) in config.tasks.iter_mut() {
        task.name = name.clone();
        for (arg_name, arg) in task.args.iter_mut() {
            arg.name = arg_name.clone();
        }
    }
}
