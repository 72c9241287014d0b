use std::path::Path;
use std::process::{Command, Output};

fn run(data_dir: &Path, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_board");
    Command::new(exe)
        .args(args)
        .env("BOARD_DATA_DIR", data_dir)
        .env("BOARD_CONFIG_PATH", data_dir.join("missing-config.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run board")
}

fn login_remembered(data_dir: &Path) {
    let output = run(
        data_dir,
        &[
            "login",
            "--email",
            "intern@demo.com",
            "--password",
            "intern123",
            "--remember",
        ],
    );
    assert!(output.status.success());
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("login"));
    assert!(stdout.contains("reorder"));
}

#[test]
fn login_with_wrong_password_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &["login", "--email", "intern@demo.com", "--password", "nope"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: auth_failed - Invalid email or password"));
    assert!(!dir.path().join("auth-storage.json").exists());
}

#[test]
fn remembered_login_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    login_remembered(dir.path());

    let output = run(dir.path(), &["whoami"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Signed in as Intern <intern@demo.com> (remembered)"));
}

#[test]
fn login_without_remember_does_not_outlive_the_process() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &["login", "--email", "intern@demo.com", "--password", "intern123"],
    );
    assert!(output.status.success());

    let output = run(dir.path(), &["whoami"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Not signed in"));
}

#[test]
fn board_commands_require_login() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["add", "Write report"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: unauthenticated"));
}

#[test]
fn logout_wipes_tasks_and_activity() {
    let dir = tempfile::tempdir().unwrap();
    login_remembered(dir.path());
    assert!(run(dir.path(), &["add", "Write report"]).status.success());
    assert!(dir.path().join("task-storage.json").exists());
    assert!(dir.path().join("activity-storage.json").exists());

    let output = run(dir.path(), &["logout"]);
    assert!(output.status.success());
    assert!(!dir.path().join("task-storage.json").exists());
    assert!(!dir.path().join("activity-storage.json").exists());

    let output = run(dir.path(), &["whoami", "--json"]);
    let session: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(session["isAuthenticated"], false);
    assert!(session["user"].is_null());
}

#[test]
fn invalid_config_override_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["whoami", "--config-override", "colour=red"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - unknown config field 'colour'"));
}
