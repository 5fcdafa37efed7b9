//! Daily meal report across all children.

use std::io::Write;

use anyhow::Result;
use chrono::Local;

use dc_core::{day_window, parse_day};
use dc_db::Database;

use super::attendance::format_instant;

/// Runs the daily command: every child's meals for one day, grouped by
/// child name.
pub fn run<W: Write>(writer: &mut W, db: &Database, date: Option<&str>, json: bool) -> Result<()> {
    let date = match date {
        Some(value) => parse_day(value)?,
        None => Local::now().date_naive(),
    };
    let meals = db.daily_meals(day_window(date))?;

    if json {
        for meal in &meals {
            writeln!(writer, "{}", serde_json::to_string(meal)?)?;
        }
        return Ok(());
    }

    writeln!(writer, "Meals on {date}")?;
    if meals.is_empty() {
        writeln!(writer, "No meals recorded.")?;
        return Ok(());
    }
    let mut current_child: Option<i64> = None;
    for meal in &meals {
        if current_child != Some(meal.record.child_id) {
            current_child = Some(meal.record.child_id);
            writeln!(
                writer,
                "{} (guardian: {})",
                meal.child_name, meal.guardian_name
            )?;
        }
        writeln!(
            writer,
            "  {} {}: {} ({})",
            format_instant(meal.record.meal_date),
            meal.record.meal_type,
            meal.record.description,
            meal.record.consumed_amount.display_label()
        )?;
    }
    Ok(())
}
