use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn runner() -> Command {
    Command::cargo_bin("tilestyle-runner").expect("binary must build")
}

#[test]
fn eval_prints_value_on_stdout() {
    let feature = write_temp_file(
        "cli-feature",
        "yaml",
        "properties:\n  Temperature: 95\n",
    );
    runner()
        .args(["eval", "--expr", "(${Temperature} > 90) ? 'hot' : 'mild'", "--feature"])
        .arg(&feature)
        .assert()
        .success()
        .stdout("hot\n");
}

#[test]
fn eval_json_output_is_machine_readable() {
    runner()
        .args(["eval", "--expr", "rgba(255, 0, 0, 0.5)", "--color", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"color\""));
}

#[test]
fn shader_reports_translucency() {
    runner()
        .args(["shader", "--expr", "rgba(255, 0, 0, ${Alpha})"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vec4 getStyleColor()"))
        .stdout(predicate::str::contains("translucent: true"));
}

#[test]
fn unsupported_shader_exits_with_error() {
    runner()
        .args(["shader", "--expr", "regExp('a').test(${Name})"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no shader form"));
}

#[test]
fn check_classifies_errors() {
    runner()
        .args(["check", "--expr", "${Height} > 1"])
        .assert()
        .success()
        .stdout("ok\n");

    runner()
        .args(["check", "--expr", "Height > 1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("compile failed (unsupported)"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    runner()
        .args(["check", "--expr", "1 + 1", "--verbose"])
        .assert()
        .success()
        .stdout("ok\n")
        .stderr(predicate::str::contains("compiled expression"));
}

fn write_temp_file(prefix: &str, extension: &str, content: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time must be monotonic")
        .as_nanos();
    path.push(format!(
        "tilestyle-runner-{prefix}-{}-{nanos}.{extension}",
        std::process::id()
    ));
    fs::write(&path, content).expect("must write temp file");
    path
}
