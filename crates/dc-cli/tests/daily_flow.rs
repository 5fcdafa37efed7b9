//! End-to-end tests for the attendance and meal flow.
//!
//! Drives the compiled binary against a temporary database:
//! enroll -> check-in -> present -> check-out -> query.

use std::process::Command;

use tempfile::TempDir;

fn dc_binary() -> String {
    env!("CARGO_BIN_EXE_dc").to_string()
}

fn run_dc(temp: &TempDir, args: &[&str]) -> std::process::Output {
    Command::new(dc_binary())
        .env("DC_DATABASE_PATH", temp.path().join("dc.db"))
        .args(args)
        .output()
        .expect("failed to run dc")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Enroll a child in the directory. Required before check-in or meals.
fn enroll(temp: &TempDir, name: &str) {
    let output = run_dc(
        temp,
        &[
            "child",
            "add",
            "--name",
            name,
            "--birthdate",
            "2020-06-01",
            "--guardian",
            "Sarah Johnson",
            "--phone",
            "555-0101",
            "--email",
            "sarah@example.com",
            "--emergency-contact",
            "Mike Johnson",
            "--emergency-phone",
            "555-0102",
        ],
    );
    assert!(
        output.status.success(),
        "child add should succeed: {}",
        stderr(&output)
    );
}

#[test]
fn test_attendance_cycle() {
    let temp = TempDir::new().unwrap();
    enroll(&temp, "Alice Johnson");

    let output = run_dc(&temp, &["check-in", "1"]);
    assert!(
        output.status.success(),
        "check-in should succeed: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("attendance record 1"));

    let output = run_dc(&temp, &["present"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Alice Johnson"));

    // A second check-in before check-out must be rejected.
    let output = run_dc(&temp, &["check-in", "1"]);
    assert!(
        !output.status.success(),
        "double check-in should fail, got: {}",
        stdout(&output)
    );
    assert!(stderr(&output).contains("already checked in"));

    let output = run_dc(&temp, &["check-out", "1"]);
    assert!(
        output.status.success(),
        "check-out should succeed: {}",
        stderr(&output)
    );

    let output = run_dc(&temp, &["present"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No children are checked in."));

    // After check-out, a new check-in opens a fresh record.
    let output = run_dc(&temp, &["check-in", "1"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("attendance record 2"));
}

#[test]
fn test_check_out_of_closed_record_fails() {
    let temp = TempDir::new().unwrap();
    enroll(&temp, "Alice Johnson");

    let output = run_dc(&temp, &["check-in", "1"]);
    assert!(output.status.success());
    let output = run_dc(&temp, &["check-out", "1"]);
    assert!(output.status.success());

    let output = run_dc(&temp, &["check-out", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("already checked out"));
}

#[test]
fn test_attendance_json_reflects_the_closed_session() {
    let temp = TempDir::new().unwrap();
    enroll(&temp, "Alice Johnson");

    assert!(run_dc(&temp, &["check-in", "1"]).status.success());
    assert!(
        run_dc(&temp, &["check-out", "1", "--notes", "picked up by aunt"])
            .status
            .success()
    );

    let output = run_dc(&temp, &["attendance", "1", "--json"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);

    let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record["child_id"], 1);
    assert!(record["check_out_time"].is_string());
    assert_eq!(record["notes"], "picked up by aunt");
}

#[test]
fn test_meal_flow() {
    let temp = TempDir::new().unwrap();
    enroll(&temp, "Alice Johnson");

    let output = run_dc(
        &temp,
        &[
            "meal",
            "1",
            "--meal-type",
            "breakfast",
            "--description",
            "oatmeal with berries",
            "--amount",
            "full",
        ],
    );
    assert!(
        output.status.success(),
        "meal should succeed: {}",
        stderr(&output)
    );

    let output = run_dc(
        &temp,
        &[
            "meal",
            "1",
            "--meal-type",
            "lunch",
            "--description",
            "pasta with peas",
            "--amount",
            "half",
        ],
    );
    assert!(output.status.success());

    // The meal-type filter narrows to the one lunch record.
    let output = run_dc(&temp, &["meals", "1", "--meal-type", "lunch"]);
    assert!(output.status.success());
    let listing = stdout(&output);
    assert!(listing.contains("pasta with peas"));
    assert!(!listing.contains("oatmeal with berries"));

    // Both meals default to now, so today's report carries them.
    let output = run_dc(&temp, &["daily"]);
    assert!(output.status.success());
    let report = stdout(&output);
    assert!(report.contains("Alice Johnson (guardian: Sarah Johnson)"));
    assert!(report.contains("oatmeal with berries"));
    assert!(report.contains("pasta with peas"));
}

#[test]
fn test_meal_for_unknown_child_fails() {
    let temp = TempDir::new().unwrap();

    let output = run_dc(
        &temp,
        &[
            "meal",
            "9",
            "--meal-type",
            "snack",
            "--description",
            "crackers",
            "--amount",
            "some",
        ],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("child 9 not found"));
}

#[test]
fn test_invalid_meal_type_is_rejected_by_the_parser() {
    let temp = TempDir::new().unwrap();
    enroll(&temp, "Alice Johnson");

    let output = run_dc(
        &temp,
        &[
            "meal",
            "1",
            "--meal-type",
            "brunch",
            "--description",
            "pancakes",
            "--amount",
            "full",
        ],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid meal type"));
}

#[test]
fn test_status_counts_rows() {
    let temp = TempDir::new().unwrap();
    enroll(&temp, "Alice Johnson");
    assert!(run_dc(&temp, &["check-in", "1"]).status.success());

    let output = run_dc(&temp, &["status"]);
    assert!(output.status.success());
    let report = stdout(&output);
    assert!(report.contains("Children: 1"));
    assert!(report.contains("Attendance records: 1 (1 open)"));
    assert!(report.contains("Meal records: 0"));
}
