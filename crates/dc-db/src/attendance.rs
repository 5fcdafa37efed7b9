//! Check-in/check-out state machine and attendance queries.
//!
//! An attendance record is open while `check_out_time` is NULL. The store
//! guarantees at most one open record per child: the mutations run inside
//! immediate transactions, and the partial unique index
//! `idx_attendance_open_child` rejects a racing insert from another
//! connection.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, TransactionBehavior, params};
use serde::Serialize;

use dc_core::DayWindow;

use crate::{Database, DbError, child_exists, format_timestamp, parse_timestamp};

/// One attendance session. `check_out_time` is `None` while the child is
/// still present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub child_id: i64,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Whether the session is still open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

const SELECT_ATTENDANCE: &str = "
    SELECT id, child_id, check_in_time, check_out_time, notes, created_at
    FROM attendance";

type AttendanceRow = (i64, i64, String, Option<String>, Option<String>, String);

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<AttendanceRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn into_record(row: AttendanceRow) -> Result<AttendanceRecord, DbError> {
    let (id, child_id, check_in_time, check_out_time, notes, created_at) = row;
    Ok(AttendanceRecord {
        id,
        child_id,
        check_in_time: parse_timestamp(&check_in_time, "check_in_time", id)?,
        check_out_time: check_out_time
            .map(|value| parse_timestamp(&value, "check_out_time", id))
            .transpose()?,
        notes,
        created_at: parse_timestamp(&created_at, "created_at", id)?,
    })
}

fn fetch_record(conn: &Connection, id: i64) -> Result<Option<AttendanceRecord>, DbError> {
    let row = conn
        .query_row(&format!("{SELECT_ATTENDANCE} WHERE id = ?"), [id], map_row)
        .optional()?;
    row.map(into_record).transpose()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
}

impl Database {
    /// Checks a child in, creating a new open attendance record.
    ///
    /// Fails with [`DbError::ChildNotFound`] if the child does not resolve
    /// and [`DbError::AlreadyCheckedIn`] if an open record exists. The
    /// existence check, the open-record check and the insert commit as one
    /// atomic unit.
    pub fn check_in(
        &mut self,
        child_id: i64,
        notes: Option<&str>,
    ) -> Result<AttendanceRecord, DbError> {
        self.check_in_at(child_id, notes, Utc::now())
    }

    fn check_in_at(
        &mut self,
        child_id: i64,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, DbError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !child_exists(&tx, child_id)? {
            return Err(DbError::ChildNotFound { id: child_id });
        }

        let open: Option<i64> = tx
            .query_row(
                "SELECT id FROM attendance WHERE child_id = ? AND check_out_time IS NULL",
                [child_id],
                |row| row.get(0),
            )
            .optional()?;
        if open.is_some() {
            return Err(DbError::AlreadyCheckedIn { child_id });
        }

        let timestamp = format_timestamp(now);
        let inserted = tx.execute(
            "
            INSERT INTO attendance (child_id, check_in_time, check_out_time, notes, created_at)
            VALUES (?, ?, NULL, ?, ?)
            ",
            params![child_id, timestamp, notes, timestamp],
        );
        match inserted {
            // The partial unique index fires if another connection slipped an
            // open record in between our check and this insert.
            Err(err) if is_unique_violation(&err) => {
                return Err(DbError::AlreadyCheckedIn { child_id });
            }
            other => {
                other?;
            }
        }

        let id = tx.last_insert_rowid();
        let record = fetch_record(&tx, id)?.ok_or(DbError::AttendanceNotFound { id })?;
        tx.commit()?;
        tracing::debug!(child_id, attendance_id = id, "child checked in");
        Ok(record)
    }

    /// Closes an open attendance record.
    ///
    /// Fails with [`DbError::AttendanceNotFound`] if no such record exists
    /// and [`DbError::AlreadyCheckedOut`] if it is already closed. An absent
    /// `notes` argument preserves the stored notes; a provided value,
    /// including the empty string, overwrites them.
    pub fn check_out(
        &mut self,
        attendance_id: i64,
        notes: Option<&str>,
    ) -> Result<AttendanceRecord, DbError> {
        self.check_out_at(attendance_id, notes, Utc::now())
    }

    fn check_out_at(
        &mut self,
        attendance_id: i64,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, DbError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(existing) = fetch_record(&tx, attendance_id)? else {
            return Err(DbError::AttendanceNotFound { id: attendance_id });
        };
        if existing.check_out_time.is_some() {
            return Err(DbError::AlreadyCheckedOut { id: attendance_id });
        }

        let notes = notes.map_or(existing.notes, |value| Some(value.to_string()));
        tx.execute(
            "UPDATE attendance SET check_out_time = ?, notes = ? WHERE id = ?",
            params![format_timestamp(now), notes, attendance_id],
        )?;

        let record = fetch_record(&tx, attendance_id)?
            .ok_or(DbError::AttendanceNotFound { id: attendance_id })?;
        tx.commit()?;
        tracing::debug!(attendance_id, "child checked out");
        Ok(record)
    }

    /// All attendance for a child, newest check-in first; records with the
    /// same check-in instant keep insertion order. A window restricts the
    /// result to check-ins inside it.
    pub fn child_attendance(
        &self,
        child_id: i64,
        window: Option<DayWindow>,
    ) -> Result<Vec<AttendanceRecord>, DbError> {
        let mut records = Vec::new();
        match window {
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "{SELECT_ATTENDANCE} WHERE child_id = ? ORDER BY check_in_time DESC, id ASC"
                ))?;
                let rows = stmt.query_map([child_id], map_row)?;
                for row in rows {
                    records.push(into_record(row?)?);
                }
            }
            Some(window) => {
                let mut stmt = self.conn.prepare(&format!(
                    "
                    {SELECT_ATTENDANCE}
                    WHERE child_id = ? AND check_in_time >= ? AND check_in_time < ?
                    ORDER BY check_in_time DESC, id ASC
                    "
                ))?;
                let rows = stmt.query_map(
                    params![
                        child_id,
                        format_timestamp(window.start),
                        format_timestamp(window.end)
                    ],
                    map_row,
                )?;
                for row in rows {
                    records.push(into_record(row?)?);
                }
            }
        }
        Ok(records)
    }

    /// Every open attendance record across all children, oldest check-in
    /// first.
    pub fn current_attendance(&self) -> Result<Vec<AttendanceRecord>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_ATTENDANCE} WHERE check_out_time IS NULL ORDER BY check_in_time ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], map_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(into_record(row?)?);
        }
        Ok(records)
    }
}
