//! Check-in command.

use std::io::Write;

use anyhow::Result;

use dc_db::Database;

use super::attendance::format_instant;

/// Runs the check-in command, opening a new attendance record.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    child_id: i64,
    notes: Option<&str>,
) -> Result<()> {
    let record = db.check_in(child_id, notes)?;
    writeln!(
        writer,
        "Checked in child {} at {} (attendance record {})",
        record.child_id,
        format_instant(record.check_in_time),
        record.id
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::child_draft;

    use super::*;

    #[test]
    fn check_in_prints_the_record_id() {
        let mut db = Database::open_in_memory().unwrap();
        let child = db.add_child(&child_draft("Alice Johnson")).unwrap();

        let mut output = Vec::new();
        run(&mut output, &mut db, child.id, None).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with(&format!("Checked in child {} at ", child.id)));
        assert!(output.trim_end().ends_with("(attendance record 1)"));
    }

    #[test]
    fn conflict_surfaces_with_child_context() {
        let mut db = Database::open_in_memory().unwrap();
        let child = db.add_child(&child_draft("Alice Johnson")).unwrap();

        let mut output = Vec::new();
        run(&mut output, &mut db, child.id, None).unwrap();
        let err = run(&mut output, &mut db, child.id, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("child {} is already checked in", child.id)
        );
    }

    #[test]
    fn unknown_child_surfaces_with_id_context() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let err = run(&mut output, &mut db, 42, None).unwrap_err();
        assert_eq!(err.to_string(), "child 42 not found");
    }
}
