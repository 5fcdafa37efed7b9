//! Present command listing the children currently checked in.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use dc_db::{AttendanceRecord, Database};

use super::attendance::format_instant;

/// An open attendance record joined with the child's display name.
#[derive(Debug, Clone, Serialize)]
struct PresentEntry {
    #[serde(flatten)]
    record: AttendanceRecord,
    child_name: Option<String>,
}

/// Runs the present command.
pub fn run<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let records = db.current_attendance()?;
    let names: HashMap<i64, String> = db
        .list_children()?
        .into_iter()
        .map(|child| (child.id, child.name))
        .collect();
    let entries: Vec<PresentEntry> = records
        .into_iter()
        .map(|record| {
            let child_name = names.get(&record.child_id).cloned();
            PresentEntry { record, child_name }
        })
        .collect();

    if json {
        for entry in &entries {
            writeln!(writer, "{}", serde_json::to_string(entry)?)?;
        }
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No children are checked in.")?;
        return Ok(());
    }
    writeln!(writer, "Currently checked in: {}", entries.len())?;
    for entry in &entries {
        let name = entry.child_name.as_deref().unwrap_or("(unknown)");
        writeln!(
            writer,
            "- {} (child {}), in since {}, record {}",
            name,
            entry.record.child_id,
            format_instant(entry.record.check_in_time),
            entry.record.id
        )?;
    }
    Ok(())
}
