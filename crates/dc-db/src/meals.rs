//! Meal recording and meal queries.
//!
//! Meal records are immutable once written; there is deliberately no
//! uniqueness constraint, a child may have any number of records of the
//! same meal type per day.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use serde::Serialize;

use dc_core::{ConsumedAmount, DayWindow, MealType, NewMeal};

use crate::{Database, DbError, child_exists, format_timestamp, parse_timestamp};

/// One recorded meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealRecord {
    pub id: i64,
    pub child_id: i64,
    pub meal_type: MealType,
    pub description: String,
    pub consumed_amount: ConsumedAmount,
    pub meal_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A meal enriched with display-only child attributes for the daily report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyMeal {
    #[serde(flatten)]
    pub record: MealRecord,
    pub child_name: String,
    pub guardian_name: String,
}

const SELECT_MEAL: &str = "
    SELECT id, child_id, meal_type, description, consumed_amount, meal_date, notes, created_at
    FROM meals";

type MealRow = (
    i64,
    i64,
    String,
    String,
    String,
    String,
    Option<String>,
    String,
);

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<MealRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn into_record(row: MealRow) -> Result<MealRecord, DbError> {
    let (id, child_id, meal_type, description, consumed_amount, meal_date, notes, created_at) = row;
    let meal_type = meal_type
        .parse::<MealType>()
        .map_err(|err| DbError::InvalidMealRow {
            id,
            message: err.to_string(),
        })?;
    Ok(MealRecord {
        id,
        child_id,
        meal_type,
        description,
        consumed_amount: ConsumedAmount::parse(&consumed_amount),
        meal_date: parse_timestamp(&meal_date, "meal_date", id)?,
        notes,
        created_at: parse_timestamp(&created_at, "created_at", id)?,
    })
}

fn fetch_record(conn: &Connection, id: i64) -> Result<Option<MealRecord>, DbError> {
    let row = conn
        .query_row(&format!("{SELECT_MEAL} WHERE id = ?"), [id], map_row)
        .optional()?;
    row.map(into_record).transpose()
}

impl Database {
    /// Records a meal for a child.
    ///
    /// Fails with [`DbError::ChildNotFound`] if the child does not resolve.
    /// A missing `meal_date` means the current instant.
    pub fn record_meal(&mut self, meal: &NewMeal) -> Result<MealRecord, DbError> {
        self.record_meal_at(meal, Utc::now())
    }

    fn record_meal_at(&mut self, meal: &NewMeal, now: DateTime<Utc>) -> Result<MealRecord, DbError> {
        let tx = self.conn.transaction()?;

        if !child_exists(&tx, meal.child_id)? {
            return Err(DbError::ChildNotFound { id: meal.child_id });
        }

        let meal_date = meal.meal_date.unwrap_or(now);
        tx.execute(
            "
            INSERT INTO meals
            (child_id, meal_type, description, consumed_amount, meal_date, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
            rusqlite::params![
                meal.child_id,
                meal.meal_type.as_str(),
                meal.description,
                meal.consumed_amount.as_str(),
                format_timestamp(meal_date),
                meal.notes,
                format_timestamp(now),
            ],
        )?;

        let id = tx.last_insert_rowid();
        let record = fetch_record(&tx, id)?.ok_or(DbError::InvalidMealRow {
            id,
            message: "row vanished after insert".to_string(),
        })?;
        tx.commit()?;
        tracing::debug!(
            child_id = meal.child_id,
            meal_id = id,
            meal_type = %meal.meal_type,
            "meal recorded"
        );
        Ok(record)
    }

    /// Meals for a child, newest first. The filters compose: a window
    /// restricts to one day, a meal type to that type.
    pub fn child_meals(
        &self,
        child_id: i64,
        window: Option<DayWindow>,
        meal_type: Option<MealType>,
    ) -> Result<Vec<MealRecord>, DbError> {
        let mut query = format!("{SELECT_MEAL} WHERE child_id = ?");
        let mut values: Vec<Value> = vec![Value::Integer(child_id)];

        if let Some(window) = window {
            query.push_str(" AND meal_date >= ? AND meal_date < ?");
            values.push(Value::Text(format_timestamp(window.start)));
            values.push(Value::Text(format_timestamp(window.end)));
        }
        if let Some(meal_type) = meal_type {
            query.push_str(" AND meal_type = ?");
            values.push(Value::Text(meal_type.as_str().to_string()));
        }
        query.push_str(" ORDER BY meal_date DESC, id ASC");

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(values), map_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(into_record(row?)?);
        }
        Ok(records)
    }

    /// All children's meals inside the window, enriched with the child's
    /// name and guardian name, ordered by child name then meal time.
    pub fn daily_meals(&self, window: DayWindow) -> Result<Vec<DailyMeal>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT m.id, m.child_id, m.meal_type, m.description, m.consumed_amount,
                   m.meal_date, m.notes, m.created_at, c.name, c.guardian_name
            FROM meals m
            INNER JOIN children c ON c.id = m.child_id
            WHERE m.meal_date >= ? AND m.meal_date < ?
            ORDER BY c.name ASC, m.meal_date ASC, m.id ASC
            ",
        )?;
        let rows = stmt.query_map(
            [format_timestamp(window.start), format_timestamp(window.end)],
            |row| {
                let meal = map_row(row)?;
                let child_name: String = row.get(8)?;
                let guardian_name: String = row.get(9)?;
                Ok((meal, child_name, guardian_name))
            },
        )?;

        let mut meals = Vec::new();
        for row in rows {
            let (meal, child_name, guardian_name) = row?;
            meals.push(DailyMeal {
                record: into_record(meal)?,
                child_name,
                guardian_name,
            });
        }
        Ok(meals)
    }
}
