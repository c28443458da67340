use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `todo` against a local file in `dir`, isolated from user config and env.
fn todo(dir: &Path) -> Command {
    let config = dir.join("config.toml");
    if !config.exists() {
        fs::write(&config, "backend = \"local\"\n").unwrap();
    }
    let mut cmd = Command::cargo_bin("todo").unwrap();
    cmd.env_remove("TODOLIST_BACKEND")
        .env_remove("TODOLIST_BASE_URL")
        .env_remove("TODOLIST_STORE")
        .env("TODOLIST_LOG", "off")
        .arg("--config")
        .arg(&config)
        .arg("--store")
        .arg(dir.join("todos.json"));
    cmd
}

fn stored(dir: &TempDir) -> serde_json::Value {
    let raw = fs::read_to_string(dir.path().join("todos.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn empty_list() {
    let dir = TempDir::new().unwrap();
    todo(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos yet."));
}

#[test]
fn add_trims_and_persists() {
    let dir = TempDir::new().unwrap();
    todo(dir.path())
        .args(["add", "  buy", "milk  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [ ] buy milk"));

    let value = stored(&dir);
    assert_eq!(value[0]["text"], "buy milk");
    assert_eq!(value[0]["done"], false);
    assert!(value[0]["id"].is_string());
}

#[test]
fn toggle_edit_delete_by_position() {
    let dir = TempDir::new().unwrap();
    todo(dir.path()).args(["add", "buy milk"]).assert().success();
    todo(dir.path()).args(["add", "walk dog"]).assert().success();

    todo(dir.path())
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [x] buy milk"));

    todo(dir.path())
        .args(["edit", "1", "buy", "oat", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [x] buy oat milk"));

    todo(dir.path())
        .args(["delete", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("walk dog").not());

    let value = stored(&dir);
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["text"], "buy oat milk");
    assert_eq!(value[0]["done"], true);
}

#[test]
fn legacy_file_without_ids_is_readable() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("todos.json"),
        r#"[{"text":"old task","done":true}]"#,
    )
    .unwrap();
    todo(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [x] old task"));
}

#[test]
fn malformed_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("todos.json"), "not json").unwrap();
    todo(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos yet."));
}

#[test]
fn unknown_reference_fails() {
    let dir = TempDir::new().unwrap();
    todo(dir.path())
        .args(["toggle", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no todo at"));
}

#[test]
fn shell_session_from_stdin() {
    let dir = TempDir::new().unwrap();
    todo(dir.path())
        .arg("shell")
        .write_stdin("add buy milk\nedit 1\ninput buy oat milk\nsubmit\ntoggle 1\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Update]"))
        .stdout(predicate::str::contains("[x] buy oat milk"));

    assert_eq!(stored(&dir)[0]["text"], "buy oat milk");
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "backend = 42\n").unwrap();
    todo(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading configuration"));
}

/// A base URL nothing is listening on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[test]
fn shell_starts_when_server_is_down() {
    let dir = TempDir::new().unwrap();
    todo(dir.path())
        .args(["--backend", "remote", "--base-url", &closed_port_url(), "--retries", "1"])
        .arg("shell")
        .write_stdin("reload\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("error: loading todo list"))
        .stdout(predicate::str::contains("error: network failure"));
}

#[test]
fn one_shot_command_fails_when_server_is_down() {
    let dir = TempDir::new().unwrap();
    todo(dir.path())
        .args(["--backend", "remote", "--base-url", &closed_port_url(), "--retries", "1"])
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading todo list"));
}
