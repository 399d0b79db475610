use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn batchname(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("batchname").unwrap();
    cmd.current_dir(dir.path()).env_remove("BATCHNAME_LOG").env_remove("BATCHNAME_YES");
    cmd
}

fn photos() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.txt").write_str("a").unwrap();
    temp_dir.child("b.txt").write_str("b").unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("batchname").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch file renaming"));
}

#[test]
fn test_version_subcommand_json() {
    let mut cmd = Command::cargo_bin("batchname").unwrap();
    cmd.args(["version", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r#"\{"name":"batchname","version":"\d+\.\d+\.\d+"\}"#).unwrap());
}

#[test]
fn test_preview_summary_changes_nothing() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .args(["preview", "-m", "text:img_", "-m", "counter:1:1:2", "--preview", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt -> img_01.txt"))
        .stdout(predicate::str::contains("b.txt -> img_02.txt"));

    temp_dir.child("a.txt").assert(predicate::path::exists());
    temp_dir.child(".batchname").assert(predicate::path::missing());
}

#[test]
fn test_preview_json() {
    let temp_dir = photos();

    let output = batchname(&temp_dir)
        .args(["preview", "-m", "original:upper", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "preview");
    assert_eq!(json["summary"]["valid"], 2);
    assert_eq!(json["pairs"][0]["new_name"], "A.txt");
}

#[test]
fn test_rename_with_yes_and_undo() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .args(["-y", "rename", "-m", "text:trip_", "-m", "counter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ 2 of 2 renamed"))
        .stdout(predicate::str::contains("Undo with: batchname undo"));

    temp_dir.child("trip_1.txt").assert("a");
    temp_dir.child("trip_2.txt").assert("b");
    temp_dir.child("a.txt").assert(predicate::path::missing());

    batchname(&temp_dir)
        .arg("undo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 2 files"));

    temp_dir.child("a.txt").assert("a");
    temp_dir.child("trip_1.txt").assert(predicate::path::missing());

    // Nothing left to undo
    batchname(&temp_dir)
        .arg("undo")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already been undone"));
}

#[test]
fn test_rename_asks_for_confirmation() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .args(["rename", "-m", "text:x_", "-m", "counter", "--preview", "none"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation cancelled."));
    temp_dir.child("a.txt").assert(predicate::path::exists());

    batchname(&temp_dir)
        .args(["rename", "-m", "text:x_", "-m", "counter", "--preview", "none"])
        .write_stdin("y\n")
        .assert()
        .success();
    temp_dir.child("x_1.txt").assert("a");
}

#[test]
fn test_dry_run_changes_nothing() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .args(["rename", "--dry-run", "-m", "text:new", "-m", "counter", "--preview", "none"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: 2 of 2 files would be renamed"));

    temp_dir.child("a.txt").assert(predicate::path::exists());
    temp_dir.child(".batchname").assert(predicate::path::missing());
}

#[test]
fn test_duplicate_names_block_the_batch() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .args(["-y", "rename", "-m", "text:same"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Nothing renamed: 0 invalid and 2 duplicate names"))
        .stderr(predicate::str::contains("0 of 2 files renamed"));

    temp_dir.child("a.txt").assert("a");
    temp_dir.child("b.txt").assert("b");
}

#[test]
fn test_conflict_skip_is_partial_failure() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.txt").write_str("a").unwrap();
    temp_dir.child("keep.txt").write_str("precious").unwrap();

    batchname(&temp_dir)
        .args(["-y", "rename", "a.txt", "-m", "text:keep", "--on-conflict", "skip"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No files were renamed"))
        .stdout(predicate::str::contains("skipped a.txt: conflict"));

    temp_dir.child("keep.txt").assert("precious");
    temp_dir.child("a.txt").assert("a");
}

#[test]
fn test_conflict_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("a.txt").write_str("a").unwrap();
    temp_dir.child("old.txt").write_str("old").unwrap();

    batchname(&temp_dir)
        .args(["-y", "rename", "a.txt", "-m", "text:old", "--on-conflict", "overwrite"])
        .assert()
        .success();

    temp_dir.child("old.txt").assert("a");
    temp_dir.child("a.txt").assert(predicate::path::missing());
}

#[test]
fn test_json_rename_needs_yes() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .args(["rename", "-m", "counter", "--output", "json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--output json needs --yes"));
}

#[test]
fn test_json_rename_report() {
    let temp_dir = photos();

    let output = batchname(&temp_dir)
        .args(["-y", "rename", "-m", "text:n", "-m", "counter", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "rename");
    assert_eq!(json["summary"]["renamed"], 2);
    assert_eq!(json["outcomes"][0]["success"], true);
    assert_eq!(json["operation_id"].as_str().unwrap().len(), 16);
}

#[test]
fn test_no_modules_is_invalid_input() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .arg("preview")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No modules given"));
}

#[test]
fn test_bad_paths_and_globs_are_invalid_input() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .args(["preview", "missing.txt", "-m", "counter"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Path not found"));

    batchname(&temp_dir)
        .args(["preview", "-m", "counter", "--include", "["])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid glob pattern"));
}

#[test]
fn test_chain_file() {
    let temp_dir = photos();
    temp_dir
        .child("chain.json")
        .write_str(
            r#"{
                "modules": [
                    {"type": "literal_text", "text": "Holiday "},
                    {"type": "sparkles"},
                    {"type": "counter", "start": 10, "step": 10, "padding": 3}
                ],
                "post_transform": {"case": "lower", "separator": "snake"}
            }"#,
        )
        .unwrap();

    batchname(&temp_dir)
        .args(["preview", "a.txt", "b.txt", "--chain", "chain.json", "--preview", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt -> holiday_010.txt"))
        .stdout(predicate::str::contains("b.txt -> holiday_020.txt"));
}

#[test]
fn test_include_and_exclude_globs() {
    let temp_dir = photos();
    temp_dir.child("c.jpg").write_str("c").unwrap();

    batchname(&temp_dir)
        .args(["preview", "-m", "text:pic", "--include", "*.jpg", "--preview", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("c.jpg -> pic.jpg"))
        .stdout(predicate::str::contains("a.txt").not());
}

#[test]
fn test_directory_flag() {
    let temp_dir = photos();
    let mut cmd = Command::cargo_bin("batchname").unwrap();

    cmd.arg("-C")
        .arg(temp_dir.path())
        .args(["preview", "-m", "original:upper", "--preview", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt -> A.txt"));
}

#[test]
fn test_history_and_status() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No history entries found"));

    batchname(&temp_dir)
        .args(["-y", "rename", "-m", "text:h", "-m", "counter"])
        .assert()
        .success();

    let output = batchname(&temp_dir)
        .args(["history", "--output", "json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["entries"].as_array().unwrap().len(), 1);
    assert_eq!(json["entries"][0]["file_count"], 2);

    batchname(&temp_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("History entries: 1 (1 undoable)"));
}

#[test]
fn test_undo_unknown_id() {
    let temp_dir = photos();

    batchname(&temp_dir)
        .arg("undo")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No rename history found"));

    batchname(&temp_dir)
        .args(["-y", "rename", "-m", "text:u", "-m", "counter"])
        .assert()
        .success();

    batchname(&temp_dir)
        .args(["undo", "zzzz"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("History entry 'zzzz' not found"));
}

#[test]
fn test_completions_to_stdout() {
    let mut cmd = Command::cargo_bin("batchname").unwrap();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("batchname"));
}
