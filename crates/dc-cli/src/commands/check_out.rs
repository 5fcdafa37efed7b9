//! Check-out command.

use std::io::Write;

use anyhow::Result;

use dc_db::Database;

use super::attendance::format_instant;

/// Runs the check-out command, closing an open attendance record.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    attendance_id: i64,
    notes: Option<&str>,
) -> Result<()> {
    let record = db.check_out(attendance_id, notes)?;
    // check_out always sets the close time before returning
    let checked_out = record.check_out_time.unwrap_or(record.check_in_time);
    writeln!(
        writer,
        "Checked out child {} at {} (attendance record {})",
        record.child_id,
        format_instant(checked_out),
        record.id
    )?;
    Ok(())
}
