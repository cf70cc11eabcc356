//! Per-task flag schemas
//!
//! Every task command exposes one flag per local arg plus one per global arg
//! the task references.

use crate::config::{args_in_scope, short_flag, Arg, ArgKind, ArgSource, Config, Task};
use crate::error::{DefinitionError, DefinitionResult};
use crate::runner::FlagCapture;
use clap::builder::PossibleValuesParser;
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches};

/// How a flag takes its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagKind {
    String,
    Bool,
    Choice(Vec<String>),
}

/// One generated flag
#[derive(Debug, Clone)]
pub struct FlagSpec {
    pub name: String,
    pub short: Option<char>,
    pub usage: String,
    pub default: Option<String>,
    pub environment: Option<String>,
    pub kind: FlagKind,
    pub required: bool,
    pub source: ArgSource,
}

impl FlagSpec {
    /// Describe an arg as a flag
    pub fn from_arg(arg: &Arg, source: ArgSource) -> Self {
        let kind = match arg.kind() {
            ArgKind::String => FlagKind::String,
            ArgKind::Bool => FlagKind::Bool,
            ArgKind::Choice(values) => FlagKind::Choice(values.to_vec()),
        };

        FlagSpec {
            name: arg.name.clone(),
            short: arg.short.as_deref().and_then(short_flag),
            usage: arg.usage.clone().unwrap_or_default(),
            default: arg.default.clone(),
            environment: arg.environment.clone(),
            kind,
            required: arg.required,
            source,
        }
    }

    /// Build the clap argument for this flag.
    ///
    /// Defaults and required checks are left to value resolution, where the
    /// environment is also consulted.
    pub fn to_clap_arg(&self) -> clap::Arg {
        let mut arg = clap::Arg::new(self.name.clone())
            .long(self.name.clone())
            .help(self.help_text());

        if let Some(short) = self.short {
            arg = arg.short(short);
        }

        match &self.kind {
            FlagKind::Bool => arg.action(ArgAction::SetTrue),
            FlagKind::String => arg
                .action(ArgAction::Set)
                .value_name(self.name.to_uppercase()),
            FlagKind::Choice(values) => arg
                .action(ArgAction::Set)
                .value_name(self.name.to_uppercase())
                .value_parser(PossibleValuesParser::new(values.clone())),
        }
    }

    fn help_text(&self) -> String {
        let mut help = self.usage.clone();
        let mut notes = Vec::new();
        if self.required {
            notes.push("required".to_string());
        }
        if let Some(default) = &self.default {
            notes.push(format!("default: {}", default));
        }
        if let Some(env) = &self.environment {
            notes.push(format!("env: {}", env));
        }
        if !notes.is_empty() {
            if !help.is_empty() {
                help.push(' ');
            }
            help.push_str(&format!("[{}]", notes.join(", ")));
        }
        help
    }
}

/// The flags of one task command
#[derive(Debug, Clone)]
pub struct FlagSchema {
    task: String,
    flags: Vec<FlagSpec>,
}

impl FlagSchema {
    /// Empty schema for a task
    pub fn new(task: &str) -> Self {
        FlagSchema {
            task: task.to_string(),
            flags: Vec::new(),
        }
    }

    /// Derive the schema of a task: locals, then used globals
    pub fn for_task(config: &Config, task: &Task) -> DefinitionResult<Self> {
        let mut schema = FlagSchema::new(&task.name);
        for (arg, source) in args_in_scope(config, task)? {
            schema.add(FlagSpec::from_arg(arg, source))?;
        }
        Ok(schema)
    }

    /// Add a flag; its long name and short must be unused on this task
    pub fn add(&mut self, spec: FlagSpec) -> DefinitionResult<()> {
        if self.get(&spec.name).is_some() {
            return Err(DefinitionError::DuplicateFlag {
                task: self.task.clone(),
                flag: spec.name,
            });
        }

        if let Some(short) = spec.short {
            if let Some(other) = self.flags.iter().find(|f| f.short == Some(short)) {
                return Err(DefinitionError::DuplicateShort {
                    task: self.task.clone(),
                    flag: spec.name,
                    short,
                    other: other.name.clone(),
                });
            }
        }

        self.flags.push(spec);
        Ok(())
    }

    /// Look up a flag by name
    pub fn get(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// Clap arguments for every flag
    pub fn to_clap_args(&self) -> Vec<clap::Arg> {
        self.flags.iter().map(FlagSpec::to_clap_arg).collect()
    }

    /// Record the flags that were given on the command line
    pub fn capture(&self, matches: &ArgMatches, capture: &mut FlagCapture) {
        for flag in &self.flags {
            if matches.value_source(&flag.name) != Some(ValueSource::CommandLine) {
                continue;
            }

            match flag.kind {
                FlagKind::Bool => {
                    if matches.get_flag(&flag.name) {
                        capture.record(&flag.name, "true".to_string());
                    }
                }
                FlagKind::String | FlagKind::Choice(_) => {
                    if let Some(value) = matches.get_one::<String>(&flag.name) {
                        capture.record(&flag.name, value.clone());
                    }
                }
            }
        }
    }
}
