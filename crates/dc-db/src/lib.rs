//! Storage layer for the daycare tracker.
//!
//! Provides persistence for the child directory, attendance sessions and
//! meal records using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A `Database` instance can be moved between threads but cannot
//! be shared across threads without external synchronization. The
//! no-double-check-in invariant does not depend on that: a partial unique
//! index on `attendance(child_id) WHERE check_out_time IS NULL` holds even
//! against writers on other connections.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in ISO 8601 format (e.g.,
//! `2024-01-15T10:30:00.000Z`), always UTC, so lexicographic ordering
//! matches chronological ordering and range predicates can compare text
//! directly. Calendar dates (`date_of_birth`) are stored as `YYYY-MM-DD`.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde::Serialize;
use thiserror::Error;

use dc_core::{ChildUpdate, NewChild};

mod attendance;
mod meals;

pub use attendance::AttendanceRecord;
pub use meals::{DailyMeal, MealRecord};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The referenced child does not exist.
    #[error("child {id} not found")]
    ChildNotFound { id: i64 },
    /// The referenced attendance record does not exist.
    #[error("attendance record {id} not found")]
    AttendanceNotFound { id: i64 },
    /// The child already has an open attendance record.
    #[error("child {child_id} is already checked in")]
    AlreadyCheckedIn { child_id: i64 },
    /// The attendance record is already closed.
    #[error("attendance record {id} is already checked out")]
    AlreadyCheckedOut { id: i64 },
    /// A stored timestamp or date failed to parse.
    #[error("invalid {column} for row {id}: {value}")]
    TimestampParse {
        column: &'static str,
        id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored meal row holds a value outside the meal vocabulary.
    #[error("invalid meal row {id}: {message}")]
    InvalidMealRow { id: i64, message: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A child profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Child {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
    pub created_at: DateTime<Utc>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS children (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                date_of_birth TEXT NOT NULL,
                guardian_name TEXT NOT NULL,
                guardian_phone TEXT NOT NULL,
                guardian_email TEXT NOT NULL,
                emergency_contact TEXT NOT NULL,
                emergency_phone TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_children_name ON children(name);

            -- Attendance table: one row per check-in
            -- check_out_time stays NULL while the child is present
            CREATE TABLE IF NOT EXISTS attendance (
                id INTEGER PRIMARY KEY,
                child_id INTEGER NOT NULL,
                check_in_time TEXT NOT NULL,
                check_out_time TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (child_id) REFERENCES children(id)
            );

            CREATE INDEX IF NOT EXISTS idx_attendance_child ON attendance(child_id);
            CREATE INDEX IF NOT EXISTS idx_attendance_check_in ON attendance(check_in_time);

            -- At most one open attendance record per child, enforced at the
            -- store so concurrent check-ins cannot both commit
            CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_open_child
                ON attendance(child_id) WHERE check_out_time IS NULL;

            CREATE TABLE IF NOT EXISTS meals (
                id INTEGER PRIMARY KEY,
                child_id INTEGER NOT NULL,
                meal_type TEXT NOT NULL,
                description TEXT NOT NULL,
                consumed_amount TEXT NOT NULL,
                meal_date TEXT NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (child_id) REFERENCES children(id)
            );

            CREATE INDEX IF NOT EXISTS idx_meals_child ON meals(child_id);
            CREATE INDEX IF NOT EXISTS idx_meals_date ON meals(meal_date);
            CREATE INDEX IF NOT EXISTS idx_meals_type ON meals(meal_type);
            ",
        )?;
        Ok(())
    }

    /// Adds a child to the directory.
    pub fn add_child(&mut self, child: &NewChild) -> Result<Child, DbError> {
        self.add_child_at(child, Utc::now())
    }

    fn add_child_at(&mut self, child: &NewChild, now: DateTime<Utc>) -> Result<Child, DbError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "
            INSERT INTO children
            (name, date_of_birth, guardian_name, guardian_phone, guardian_email,
             emergency_contact, emergency_phone, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                child.name,
                format_date(child.date_of_birth),
                child.guardian_name,
                child.guardian_phone,
                child.guardian_email,
                child.emergency_contact,
                child.emergency_phone,
                format_timestamp(now),
            ],
        )?;
        let id = tx.last_insert_rowid();
        let stored = fetch_child(&tx, id)?.ok_or(DbError::ChildNotFound { id })?;
        tx.commit()?;
        tracing::debug!(child_id = id, name = %stored.name, "child added");
        Ok(stored)
    }

    /// Looks up a child by id.
    pub fn child(&self, id: i64) -> Result<Option<Child>, DbError> {
        fetch_child(&self.conn, id)
    }

    /// Lists the whole directory, ordered by name then id.
    pub fn list_children(&self) -> Result<Vec<Child>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_CHILD} ORDER BY name ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], map_child_row)?;
        let mut children = Vec::new();
        for row in rows {
            children.push(into_child(row?)?);
        }
        Ok(children)
    }

    /// Applies a partial update to a child profile.
    ///
    /// Only provided fields change; an empty update returns the stored row
    /// untouched.
    pub fn update_child(&mut self, id: i64, update: &ChildUpdate) -> Result<Child, DbError> {
        if update.is_empty() {
            return self
                .child(id)?
                .ok_or(DbError::ChildNotFound { id });
        }

        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(name) = &update.name {
            sets.push("name = ?");
            values.push(Value::Text(name.clone()));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            sets.push("date_of_birth = ?");
            values.push(Value::Text(format_date(date_of_birth)));
        }
        if let Some(guardian_name) = &update.guardian_name {
            sets.push("guardian_name = ?");
            values.push(Value::Text(guardian_name.clone()));
        }
        if let Some(guardian_phone) = &update.guardian_phone {
            sets.push("guardian_phone = ?");
            values.push(Value::Text(guardian_phone.clone()));
        }
        if let Some(guardian_email) = &update.guardian_email {
            sets.push("guardian_email = ?");
            values.push(Value::Text(guardian_email.clone()));
        }
        if let Some(emergency_contact) = &update.emergency_contact {
            sets.push("emergency_contact = ?");
            values.push(Value::Text(emergency_contact.clone()));
        }
        if let Some(emergency_phone) = &update.emergency_phone {
            sets.push("emergency_phone = ?");
            values.push(Value::Text(emergency_phone.clone()));
        }
        values.push(Value::Integer(id));

        let tx = self.conn.transaction()?;
        let query = format!("UPDATE children SET {} WHERE id = ?", sets.join(", "));
        let updated = tx.execute(&query, params_from_iter(values))?;
        if updated == 0 {
            return Err(DbError::ChildNotFound { id });
        }
        let stored = fetch_child(&tx, id)?.ok_or(DbError::ChildNotFound { id })?;
        tx.commit()?;
        Ok(stored)
    }

    /// Row counts per table, for the status command.
    pub fn counts(&self) -> Result<TableCounts, DbError> {
        let count = |table: &str| -> Result<i64, rusqlite::Error> {
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
        };
        Ok(TableCounts {
            children: count("children")?,
            attendance: count("attendance")?,
            open_attendance: self.conn.query_row(
                "SELECT COUNT(*) FROM attendance WHERE check_out_time IS NULL",
                [],
                |row| row.get(0),
            )?,
            meals: count("meals")?,
        })
    }
}

/// Row counts for the status command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub children: i64,
    pub attendance: i64,
    pub open_attendance: i64,
    pub meals: i64,
}

const SELECT_CHILD: &str = "
    SELECT id, name, date_of_birth, guardian_name, guardian_phone, guardian_email,
           emergency_contact, emergency_phone, created_at
    FROM children";

type ChildRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

fn map_child_row(row: &rusqlite::Row) -> rusqlite::Result<ChildRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn into_child(row: ChildRow) -> Result<Child, DbError> {
    let (
        id,
        name,
        date_of_birth,
        guardian_name,
        guardian_phone,
        guardian_email,
        emergency_contact,
        emergency_phone,
        created_at,
    ) = row;
    Ok(Child {
        id,
        name,
        date_of_birth: parse_date(&date_of_birth, "date_of_birth", id)?,
        guardian_name,
        guardian_phone,
        guardian_email,
        emergency_contact,
        emergency_phone,
        created_at: parse_timestamp(&created_at, "created_at", id)?,
    })
}

fn fetch_child(conn: &Connection, id: i64) -> Result<Option<Child>, DbError> {
    let row = conn
        .query_row(&format!("{SELECT_CHILD} WHERE id = ?"), [id], map_child_row)
        .optional()?;
    row.map(into_child).transpose()
}

pub(crate) fn child_exists(conn: &Connection, id: i64) -> Result<bool, DbError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM children WHERE id = ?)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(
    value: &str,
    column: &'static str,
    id: i64,
) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            column,
            id,
            value: value.to_string(),
            source,
        })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(value: &str, column: &'static str, id: i64) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| DbError::TimestampParse {
        column,
        id,
        value: value.to_string(),
        source,
    })
}
