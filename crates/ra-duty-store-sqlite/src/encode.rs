//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and duty dates as `YYYY-MM-DD`.
//! Shifts are stored under their canonical names (`Shift::as_str`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ra_duty_core::{
  duty::{DATE_FORMAT, Duty, Shift},
  ra::Ra,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

/// Accepts RFC 3339 as well as SQLite's `CURRENT_TIMESTAMP` form
/// (`YYYY-MM-DD HH:MM:SS`, UTC), which older databases used as the column
/// default.
pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .or_else(|e| {
      NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::DateParse(format!("{s:?}: {e}")))
    })
}

const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Shift ───────────────────────────────────────────────────────────────────

/// Only the exact canonical spelling is accepted; other spellings are left
/// for [`crate::reconcile::sync_orphans`] to rewrite.
pub fn decode_shift(s: &str) -> Result<Shift> {
  s.parse::<Shift>()
    .ok()
    .filter(|shift| shift.as_str() == s)
    .ok_or_else(|| Error::CorruptRow(format!("unknown shift: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`ra_from_row`].
pub const RA_COLUMNS: &str = "id, name, email, phone, hall";

pub fn ra_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ra> {
  Ok(Ra {
    id:    row.get(0)?,
    name:  row.get(1)?,
    email: row.get(2)?,
    phone: row.get(3)?,
    hall:  row.get(4)?,
  })
}

/// Column list matching [`RawDuty::from_row`].
pub const DUTY_COLUMNS: &str =
  "id, ra_id, ra_name, date, shift, notes, created_at";

/// Raw values read directly from a `duties` row.
pub struct RawDuty {
  pub id:         i64,
  pub ra_id:      i64,
  pub ra_name:    String,
  pub date:       String,
  pub shift:      String,
  pub notes:      Option<String>,
  pub created_at: String,
}

impl RawDuty {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      ra_id:      row.get(1)?,
      ra_name:    row.get(2)?,
      date:       row.get(3)?,
      shift:      row.get(4)?,
      notes:      row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_duty(self) -> Result<Duty> {
    Ok(Duty {
      id:         self.id,
      ra_id:      self.ra_id,
      ra_name:    self.ra_name,
      date:       decode_date(&self.date)?,
      shift:      decode_shift(&self.shift)?,
      notes:      self.notes,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
