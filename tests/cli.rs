//! End-to-end tests of the tusk binary

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn tusk() -> Command {
    Command::cargo_bin("tusk").unwrap()
}

const GREET: &str = r#"
args:
  name:
    usage: Who to greet
    default: world
tasks:
  greet:
    usage: Say hello
    run: echo hello ${name}
"#;

#[test]
fn test_global_default_is_used() {
    let (_dir, config) = common::create_test_config(GREET);

    tusk()
        .arg("-f")
        .arg(&config)
        .arg("greet")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn test_flag_overrides_default() {
    let (_dir, config) = common::create_test_config(GREET);

    tusk()
        .arg("--file")
        .arg(&config)
        .args(["greet", "--name", "you"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello you"));
}

#[test]
fn test_config_found_from_working_directory() {
    let (dir, _config) = common::create_test_config(GREET);

    tusk()
        .current_dir(dir.path())
        .args(["-q", "greet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn test_unknown_pre_task_fails() {
    let (_dir, config) = common::create_test_config(
        r#"
tasks:
  build:
    pre: compile
    run: echo building
"#,
    );

    tusk()
        .arg("-f")
        .arg(&config)
        .arg("build")
        .assert()
        .failure()
        .stdout(predicate::str::contains("building").not())
        .stderr(predicate::str::contains("build").and(predicate::str::contains("compile")));
}

#[test]
fn test_failed_pre_task_stops_run() {
    let (_dir, config) = common::create_test_config(
        r#"
tasks:
  deploy:
    pre: [build, test]
    run: echo deploying
  build:
    run: exit 3
  test:
    run: echo testing
"#,
    );

    tusk()
        .arg("-f")
        .arg(&config)
        .arg("deploy")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("testing").not())
        .stdout(predicate::str::contains("deploying").not());
}

#[test]
fn test_missing_config_shows_generic_help() {
    let dir = tempfile::TempDir::new().unwrap();

    tusk()
        .arg("-f")
        .arg(dir.path().join("missing.yml"))
        .arg("greet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.yml"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_task_help_lists_generated_flags() {
    let (_dir, config) = common::create_test_config(GREET);

    tusk()
        .arg("-f")
        .arg(&config)
        .args(["greet", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--name"))
        .stdout(predicate::str::contains("default: world"));
}

#[test]
fn test_no_task_lists_tasks() {
    let (_dir, config) = common::create_test_config(GREET);

    tusk()
        .arg("-f")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("greet"))
        .stdout(predicate::str::contains("Say hello"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    let (_dir, config) = common::create_test_config(GREET);

    tusk()
        .arg("-f")
        .arg(&config)
        .args(["greet", "--nope", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--nope"));
}
