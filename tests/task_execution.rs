//! Integration tests for task execution

mod common;

use common::RecordingRunner;
use tusk::cli::{resolve, Bootstrap, Invocation};
use tusk::config::parse_config;
use tusk::error::{ExecutionError, ReferenceError, TuskError};
use tusk::runner::{Context, Environment, Executor, FlagValues, TaskGraph, Verbosity};

fn silent_context() -> Context {
    Context::new()
        .with_verbosity(Verbosity::Silent)
        .with_env(Environment::isolated())
}

fn invoke(yaml: &str, args: &[&str]) -> Result<Invocation, TuskError> {
    let argv: Vec<String> = std::iter::once("tusk")
        .chain(args.iter().copied())
        .map(String::from)
        .collect();
    match resolve(yaml, &argv)? {
        Bootstrap::Invocation(invocation) => Ok(invocation),
        other => panic!("expected an invocation, got {other:?}"),
    }
}

fn execute(invocation: &Invocation, runner: &mut RecordingRunner) -> Result<(), ExecutionError> {
    let mut ctx = silent_context();
    Executor::new(&invocation.graph, &invocation.flags)
        .with_policy(invocation.config.pre_task_policy)
        .run(invocation.task, &mut ctx, runner)
}

#[test]
fn test_unknown_pre_task_is_reported_before_anything_runs() {
    let yaml = r#"
tasks:
  build:
    pre: compile
    run: echo build
"#;

    let err = invoke(yaml, &["build"]).unwrap_err();
    match &err {
        TuskError::Reference(ReferenceError::UnknownPreTask { task, missing }) => {
            assert_eq!(task, "build");
            assert_eq!(missing, "compile");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("build"));
    assert!(err.to_string().contains("compile"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_global_arg_default_and_flag() {
    let yaml = r#"
args:
  name:
    default: world
tasks:
  greet:
    run: echo ${name}
"#;

    let mut runner = RecordingRunner::default();
    execute(&invoke(yaml, &["greet"]).unwrap(), &mut runner).unwrap();
    assert_eq!(runner.commands(), vec!["echo world"]);

    let mut runner = RecordingRunner::default();
    execute(&invoke(yaml, &["greet", "--name", "you"]).unwrap(), &mut runner).unwrap();
    assert_eq!(runner.commands(), vec!["echo you"]);
}

#[test]
fn test_failing_pre_task_stops_the_rest() {
    let yaml = r#"
tasks:
  deploy:
    pre: [build, test]
    run: echo deploy
  build:
    run: make build
  test:
    run: make test
"#;

    let mut runner = RecordingRunner::failing_on(&["make build"]);
    let err = execute(&invoke(yaml, &["deploy"]).unwrap(), &mut runner).unwrap_err();

    assert!(matches!(err, ExecutionError::CommandFailed { ref task, .. } if task == "build"));
    assert_eq!(runner.tasks(), vec!["build"]);
    assert_ne!(TuskError::from(err).exit_code(), 0);
}

#[test]
fn test_cycle_is_rejected() {
    let yaml = r#"
tasks:
  a:
    pre: b
  b:
    pre: c
  c:
    pre: a
"#;
    let config = parse_config(yaml).unwrap();
    match TaskGraph::resolve(&config).unwrap_err() {
        err @ TuskError::Reference(ReferenceError::Cycle { .. }) => {
            assert!(err.to_string().contains("a -> b -> c -> a"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_pre_task_receives_invoked_flag_values() {
    let yaml = r#"
args:
  target:
    default: debug
tasks:
  release:
    pre: build
    run: echo release ${target}
  build:
    run: cargo build --profile ${target}
"#;

    let mut runner = RecordingRunner::default();
    let invocation = invoke(yaml, &["release", "--target", "opt"]).unwrap();
    execute(&invocation, &mut runner).unwrap();

    assert_eq!(
        runner.commands(),
        vec!["cargo build --profile opt", "echo release opt"]
    );
}

#[test]
fn test_required_arg_without_value() {
    let yaml = r#"
tasks:
  tag:
    args:
      label:
        required: true
    run: git tag ${label}
"#;

    let mut runner = RecordingRunner::default();
    let err = execute(&invoke(yaml, &["tag"]).unwrap(), &mut runner).unwrap_err();
    assert!(matches!(err, ExecutionError::MissingArg { ref arg, .. } if arg == "label"));
    assert!(runner.ran.is_empty());

    let mut runner = RecordingRunner::default();
    execute(&invoke(yaml, &["tag", "--label", "v1"]).unwrap(), &mut runner).unwrap();
    assert_eq!(runner.commands(), vec!["git tag v1"]);
}

#[test]
fn test_bool_and_choice_flags() {
    let yaml = r#"
tasks:
  build:
    args:
      release:
        type: bool
        short: r
      mode:
        values: [fast, slow]
        default: fast
    run: build ${release} ${mode}
"#;

    let mut runner = RecordingRunner::default();
    execute(&invoke(yaml, &["build"]).unwrap(), &mut runner).unwrap();
    assert_eq!(runner.commands(), vec!["build false fast"]);

    let mut runner = RecordingRunner::default();
    execute(&invoke(yaml, &["build", "-r", "--mode", "slow"]).unwrap(), &mut runner).unwrap();
    assert_eq!(runner.commands(), vec!["build true slow"]);

    let err = invoke(yaml, &["build", "--mode", "medium"]).unwrap_err();
    assert!(matches!(err, TuskError::Cli(_)));
}

#[test]
fn test_executor_directly_from_graph() {
    let yaml = r#"
tasks:
  all:
    pre: [lint, test]
  lint:
    run: cargo clippy
  test:
    run:
      - cargo test
      - cargo test --doc
"#;
    let config = parse_config(yaml).unwrap();
    let graph = TaskGraph::resolve(&config).unwrap();
    let flags = FlagValues::default();
    let mut runner = RecordingRunner::default();
    let mut ctx = silent_context();

    Executor::new(&graph, &flags)
        .run(graph.get("all").unwrap(), &mut ctx, &mut runner)
        .unwrap();

    assert_eq!(
        runner.commands(),
        vec!["cargo clippy", "cargo test", "cargo test --doc"]
    );
    assert_eq!(runner.tasks(), vec!["lint", "test", "test"]);
}

#[test]
fn test_default_embedding_another_arg() {
    let yaml = r#"
args:
  env:
    default: dev
tasks:
  deploy:
    args:
      target:
        default: ${env}-cluster
    run: echo ${target}
"#;

    let mut runner = RecordingRunner::default();
    execute(&invoke(yaml, &["deploy"]).unwrap(), &mut runner).unwrap();
    assert_eq!(runner.commands(), vec!["echo dev-cluster"]);

    let mut runner = RecordingRunner::default();
    execute(&invoke(yaml, &["deploy", "--env", "prod"]).unwrap(), &mut runner).unwrap();
    assert_eq!(runner.commands(), vec!["echo prod-cluster"]);

    let mut runner = RecordingRunner::default();
    execute(&invoke(yaml, &["deploy", "--target", "edge"]).unwrap(), &mut runner).unwrap();
    assert_eq!(runner.commands(), vec!["echo edge"]);
}

#[test]
fn test_when_entry_requires_every_condition() {
    let yaml = r#"
tasks:
  release:
    run:
      - when:
          - equal: {left: a, right: a}
            env-set: TUSK_RELEASE_TOKEN
        command: echo publish
      - when:
          - equal: {left: a, right: a}
            command: "true"
        command: echo tag
"#;

    let mut runner = RecordingRunner::default();
    execute(&invoke(yaml, &["release"]).unwrap(), &mut runner).unwrap();
    assert_eq!(runner.commands(), vec!["echo tag"]);
}
