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

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = args.to_vec();
    full.push("--json");
    let output = run(data_dir, &full);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

fn signed_in() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
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
    dir
}

fn add(data_dir: &Path, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    let task = run_json(data_dir, &full);
    task["id"].as_str().expect("task id").to_string()
}

fn column_titles(board: &serde_json::Value, index: usize) -> Vec<String> {
    board["columns"][index]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn add_creates_task_in_todo_and_logs_activity() {
    let dir = signed_in();
    let task = run_json(
        dir.path(),
        &[
            "add",
            "Write report",
            "--priority",
            "high",
            "--due",
            "2026-03-01",
            "--tag",
            "work",
            "--tag",
            "work",
        ],
    );

    assert_eq!(task["title"], "Write report");
    assert_eq!(task["column"], "todo");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["dueDate"], "2026-03-01");
    assert_eq!(task["tags"], serde_json::json!(["work"]));

    let activity = run_json(dir.path(), &["activity"]);
    assert_eq!(activity[0]["type"], "created");
    assert_eq!(activity[0]["details"]["taskTitle"], "Write report");
}

#[test]
fn add_without_title_is_rejected() {
    let dir = signed_in();
    let output = run(dir.path(), &["add", "   "]);

    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("ERROR: invalid_input - title is required")
    );
}

#[test]
fn move_changes_column_and_records_transition() {
    let dir = signed_in();
    let id = add(dir.path(), &["Write report"]);

    let moves = run_json(dir.path(), &["move", &id, "doing"]);
    assert_eq!(moves[0]["from"], "todo");
    assert_eq!(moves[0]["to"], "doing");

    let board = run_json(dir.path(), &["list"]);
    assert!(column_titles(&board, 0).is_empty());
    assert_eq!(column_titles(&board, 1), vec!["Write report"]);

    let output = run(dir.path(), &["activity"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Moved \"Write report\" from To Do to In Progress"));
}

#[test]
fn move_to_same_column_is_a_no_op() {
    let dir = signed_in();
    let id = add(dir.path(), &["Write report"]);

    let output = run(dir.path(), &["move", &id, "todo"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Task already in To Do"));

    let activity = run_json(dir.path(), &["activity"]);
    assert_eq!(activity.as_array().unwrap().len(), 1);
}

#[test]
fn move_rejects_unknown_column_and_task() {
    let dir = signed_in();
    let id = add(dir.path(), &["Write report"]);

    let output = run(dir.path(), &["move", &id, "archive"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: invalid_input"));

    let output = run(dir.path(), &["move", "no-such-task", "done"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("task not found"));
}

#[test]
fn drag_without_drop_keeps_hover_moves() {
    let dir = signed_in();
    let id = add(dir.path(), &["Write report"]);

    let moves = run_json(dir.path(), &["drag", &id, "--over", "doing"]);
    assert_eq!(moves.as_array().unwrap().len(), 1);
    assert_eq!(moves[0]["to"], "doing");

    let board = run_json(dir.path(), &["list"]);
    assert_eq!(column_titles(&board, 1), vec!["Write report"]);
}

#[test]
fn drop_on_a_card_is_not_a_column_target() {
    let dir = signed_in();
    let first = add(dir.path(), &["First"]);
    let second = add(dir.path(), &["Second"]);
    run_json(dir.path(), &["move", &second, "done"]);

    let moves = run_json(dir.path(), &["drag", &first, "--drop", &second]);
    assert_eq!(moves, serde_json::json!([]));

    let board = run_json(dir.path(), &["list"]);
    assert_eq!(column_titles(&board, 0), vec!["First"]);
    assert_eq!(column_titles(&board, 2), vec!["Second"]);
}

#[test]
fn edit_updates_fields_and_logs_edit() {
    let dir = signed_in();
    let id = add(dir.path(), &["Draft", "--due", "2026-03-01", "--tag", "old"]);

    let task = run_json(
        dir.path(),
        &["edit", &id, "--title", "Final", "--clear-due", "--clear-tags", "--tag", "new"],
    );
    assert_eq!(task["title"], "Final");
    assert!(task.get("dueDate").is_none() || task["dueDate"].is_null());
    assert_eq!(task["tags"], serde_json::json!(["new"]));

    let activity = run_json(dir.path(), &["activity"]);
    assert_eq!(activity[0]["type"], "edited");
    assert_eq!(activity[0]["details"]["taskTitle"], "Final");
}

#[test]
fn delete_needs_confirmation() {
    let dir = signed_in();
    let id = add(dir.path(), &["Write report"]);

    let output = run(dir.path(), &["delete", &id]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: cancelled"));

    let output = run(dir.path(), &["delete", &id, "--yes"]);
    assert!(output.status.success());

    let board = run_json(dir.path(), &["list"]);
    assert!(column_titles(&board, 0).is_empty());
    let activity = run_json(dir.path(), &["activity"]);
    assert_eq!(activity[0]["type"], "deleted");
}

#[test]
fn search_filter_and_sort_persist_between_runs() {
    let dir = signed_in();
    add(dir.path(), &["Later", "--priority", "low", "--due", "2026-05-01"]);
    add(dir.path(), &["Sooner", "--priority", "low", "--due", "2026-02-01"]);
    add(dir.path(), &["Undated", "--priority", "low"]);
    add(dir.path(), &["Loud", "--priority", "high"]);

    run_json(dir.path(), &["filter", "low"]);
    run_json(dir.path(), &["sort-due"]);

    let board = run_json(dir.path(), &["list"]);
    assert_eq!(board["priorityFilter"], "low");
    assert_eq!(board["sortByDueDate"], true);
    assert_eq!(column_titles(&board, 0), vec!["Sooner", "Later", "Undated"]);

    run_json(dir.path(), &["search", "SOON"]);
    let board = run_json(dir.path(), &["list"]);
    assert_eq!(column_titles(&board, 0), vec!["Sooner"]);

    let query = run_json(dir.path(), &["search"]);
    assert_eq!(query["searchQuery"], "");
}

#[test]
fn reorder_moves_task_within_column() {
    let dir = signed_in();
    add(dir.path(), &["A"]);
    add(dir.path(), &["B"]);
    add(dir.path(), &["C"]);

    let result = run_json(dir.path(), &["reorder", "todo", "2", "0"]);
    assert_eq!(result["reordered"], true);

    let board = run_json(dir.path(), &["list"]);
    assert_eq!(column_titles(&board, 0), vec!["C", "A", "B"]);

    let result = run_json(dir.path(), &["reorder", "todo", "9", "0"]);
    assert_eq!(result["reordered"], false);
}

#[test]
fn reset_clears_tasks_and_query_but_keeps_activity() {
    let dir = signed_in();
    add(dir.path(), &["A"]);
    run_json(dir.path(), &["search", "a"]);

    let output = run(dir.path(), &["reset"]);
    assert!(!output.status.success());

    let output = run(dir.path(), &["reset", "--yes"]);
    assert!(output.status.success());

    let board = run_json(dir.path(), &["list"]);
    assert_eq!(board["searchQuery"], "");
    assert!(column_titles(&board, 0).is_empty());
    let activity = run_json(dir.path(), &["activity"]);
    assert_eq!(activity.as_array().unwrap().len(), 1);
}

#[test]
fn activity_clear_empties_log() {
    let dir = signed_in();
    add(dir.path(), &["A"]);

    let cleared = run_json(dir.path(), &["activity", "--clear"]);
    assert_eq!(cleared, serde_json::json!([]));

    let output = run(dir.path(), &["activity"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No activity yet"));
}
