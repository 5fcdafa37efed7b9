//! Meal recording command.

use std::io::Write;

use anyhow::Result;

use dc_core::{MealType, NewMeal, parse_instant};
use dc_db::Database;

/// Runs the meal command, recording one meal for a child.
#[expect(
    clippy::too_many_arguments,
    reason = "the CLI surface maps one flag per record field"
)]
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    child_id: i64,
    meal_type: MealType,
    description: &str,
    amount: &str,
    date: Option<&str>,
    notes: Option<String>,
) -> Result<()> {
    let meal_date = date.map(parse_instant).transpose()?;
    let meal = NewMeal::new(child_id, meal_type, description, amount, meal_date, notes)?;
    let record = db.record_meal(&meal)?;
    writeln!(
        writer,
        "Recorded {} for child {} (meal record {})",
        record.meal_type, record.child_id, record.id
    )?;
    Ok(())
}
