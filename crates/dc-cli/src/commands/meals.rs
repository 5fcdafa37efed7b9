//! Meal history command.

use std::io::Write;

use anyhow::Result;

use dc_core::{MealType, day_window, parse_day};
use dc_db::{Database, MealRecord};

use super::attendance::format_instant;

/// One listing line for a meal record.
pub(crate) fn format_record(record: &MealRecord) -> String {
    let mut line = format!(
        "[{}] {} {}: {} ({})",
        record.id,
        format_instant(record.meal_date),
        record.meal_type,
        record.description,
        record.consumed_amount.display_label()
    );
    if let Some(notes) = record.notes.as_deref() {
        if !notes.is_empty() {
            line.push_str(&format!("  ({notes})"));
        }
    }
    line
}

/// Runs the meals command: a child's meal history, newest first.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    child_id: i64,
    date: Option<&str>,
    meal_type: Option<MealType>,
    json: bool,
) -> Result<()> {
    let window = date.map(parse_day).transpose()?.map(day_window);
    let records = db.child_meals(child_id, window, meal_type)?;

    if json {
        for record in &records {
            writeln!(writer, "{}", serde_json::to_string(record)?)?;
        }
        return Ok(());
    }

    if records.is_empty() {
        writeln!(writer, "No meal records.")?;
        return Ok(());
    }
    for record in &records {
        writeln!(writer, "{}", format_record(record))?;
    }
    Ok(())
}
