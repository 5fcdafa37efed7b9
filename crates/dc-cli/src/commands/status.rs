//! Status command showing the database location and row counts.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use dc_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database, database_path: &Path) -> Result<()> {
    let counts = db.counts()?;

    writeln!(writer, "Daycare tracker status")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(writer, "Children: {}", counts.children)?;
    writeln!(
        writer,
        "Attendance records: {} ({} open)",
        counts.attendance, counts.open_attendance
    )?;
    writeln!(writer, "Meal records: {}", counts.meals)?;

    Ok(())
}
