//! Attendance history command.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};

use dc_core::{day_window, parse_day};
use dc_db::{AttendanceRecord, Database};

/// Renders an instant for listings.
pub(crate) fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One listing line for an attendance record.
pub(crate) fn format_record(record: &AttendanceRecord) -> String {
    let check_out = record
        .check_out_time
        .map_or_else(|| "still present".to_string(), format_instant);
    let mut line = format!(
        "[{}] in {}  out {}",
        record.id,
        format_instant(record.check_in_time),
        check_out
    );
    if let Some(notes) = record.notes.as_deref() {
        if !notes.is_empty() {
            line.push_str(&format!("  ({notes})"));
        }
    }
    line
}

/// Runs the attendance command: a child's records, newest first.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    child_id: i64,
    date: Option<&str>,
    json: bool,
) -> Result<()> {
    let window = date.map(parse_day).transpose()?.map(day_window);
    let records = db.child_attendance(child_id, window)?;

    if json {
        for record in &records {
            writeln!(writer, "{}", serde_json::to_string(record)?)?;
        }
        return Ok(());
    }

    if records.is_empty() {
        writeln!(writer, "No attendance records.")?;
        return Ok(());
    }
    for record in &records {
        writeln!(writer, "{}", format_record(record))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn instant(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn format_record_open_session() {
        let record = AttendanceRecord {
            id: 3,
            child_id: 1,
            check_in_time: instant("2024-01-15T08:00:00Z"),
            check_out_time: None,
            notes: Some("with mittens".to_string()),
            created_at: instant("2024-01-15T08:00:00Z"),
        };
        assert_snapshot!(
            format_record(&record),
            @"[3] in 2024-01-15T08:00:00Z  out still present  (with mittens)"
        );
    }

    #[test]
    fn format_record_closed_session_without_notes() {
        let record = AttendanceRecord {
            id: 4,
            child_id: 1,
            check_in_time: instant("2024-01-15T08:00:00Z"),
            check_out_time: Some(instant("2024-01-15T17:00:00Z")),
            notes: None,
            created_at: instant("2024-01-15T08:00:00Z"),
        };
        assert_snapshot!(
            format_record(&record),
            @"[4] in 2024-01-15T08:00:00Z  out 2024-01-15T17:00:00Z"
        );
    }

    #[test]
    fn run_outputs_json_lines() {
        let mut db = Database::open_in_memory().unwrap();
        let child = db
            .add_child(&crate::commands::test_support::child_draft("Alice Johnson"))
            .unwrap();
        db.check_in(child.id, Some("dropped off early")).unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, child.id, None, true).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["child_id"], child.id);
        assert_eq!(value["check_out_time"], serde_json::Value::Null);
        assert_eq!(value["notes"], "dropped off early");
    }

    #[test]
    fn run_reports_empty_history() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, 1, None, false).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No attendance records.\n");
    }

    #[test]
    fn run_rejects_malformed_date() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let result = run(&mut output, &db, 1, Some("not-a-date"), false);
        assert!(result.is_err());
    }
}
