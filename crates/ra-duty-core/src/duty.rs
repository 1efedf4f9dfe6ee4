//! Duty shifts: the log side of the tracker.
//!
//! A duty references exactly one RA by id and carries a denormalised copy of
//! that RA's name. The store keeps the copy in step with the roster; callers
//! never write `ra_name` directly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result, ra::normalize_name};

/// Storage and wire format for duty dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Shift ───────────────────────────────────────────────────────────────────

/// The tier of a duty shift.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
  EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Shift {
  Primary,
  Secondary,
  Tertiary,
}

impl Shift {
  /// Canonical name, as stored and serialised.
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    s.trim().parse().map_err(|_| {
      Error::validation(format!(
        "invalid shift {s:?}; expected Primary, Secondary or Tertiary"
      ))
    })
  }
}

// ─── Duty ────────────────────────────────────────────────────────────────────

/// A single shift assignment for one RA on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duty {
  pub id:         i64,
  pub ra_id:      i64,
  /// Copy of the referenced RA's name as of the last write.
  pub ra_name:    String,
  pub date:       NaiveDate,
  pub shift:      Shift,
  pub notes:      Option<String>,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
}

// ─── NewDuty ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::DutyStore::create_duty`] and
/// [`crate::store::DutyStore::update_duty`].
///
/// `ra_name` is resolved against the roster by the store (creating the RA if
/// no case-insensitive match exists); the persisted duty carries the RA's
/// canonical name, not this raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDuty {
  pub ra_name: String,
  pub date:    NaiveDate,
  pub shift:   Shift,
  pub notes:   Option<String>,
}

impl NewDuty {
  /// Build an input from already-typed fields. Fails if `ra_name` trims to
  /// empty.
  pub fn new(ra_name: &str, date: NaiveDate, shift: Shift) -> Result<Self> {
    Ok(Self {
      ra_name: normalize_name(ra_name)?,
      date,
      shift,
      notes: None,
    })
  }

  /// Build an input from loosely-typed request fields.
  ///
  /// All of `ra_name`, `date` and `shift` must be present and non-blank;
  /// `date` must be `YYYY-MM-DD`.
  pub fn parse(
    ra_name: Option<&str>,
    date: Option<&str>,
    shift: Option<&str>,
    notes: Option<String>,
  ) -> Result<Self> {
    let (Some(ra_name), Some(date), Some(shift)) =
      (present(ra_name), present(date), present(shift))
    else {
      return Err(Error::validation("RA name, date and shift are required"));
    };

    Ok(
      Self::new(ra_name, parse_date(date)?, Shift::parse(shift)?)?
        .with_notes(notes),
    )
  }

  pub fn with_notes(mut self, notes: Option<String>) -> Self {
    self.notes = crate::ra::normalize_optional(notes);
    self
  }
}

fn present(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
    Error::validation(format!("invalid date {s:?}; expected YYYY-MM-DD"))
  })
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn shift_parses_case_insensitively() {
    assert_eq!(Shift::parse("primary").unwrap(), Shift::Primary);
    assert_eq!(Shift::parse(" SECONDARY ").unwrap(), Shift::Secondary);
    assert_eq!(Shift::parse("Tertiary").unwrap(), Shift::Tertiary);
    assert!(matches!(Shift::parse("Quaternary"), Err(Error::Validation(_))));
  }

  #[test]
  fn shift_display_is_canonical() {
    let names: Vec<String> = Shift::iter().map(|s| s.to_string()).collect();
    assert_eq!(names, ["Primary", "Secondary", "Tertiary"]);
    assert!(Shift::iter().all(|s| s.as_str() == s.to_string()));
    assert_eq!(
      serde_json::to_string(&Shift::Secondary).unwrap(),
      "\"Secondary\""
    );
  }

  #[test]
  fn parse_requires_all_fields() {
    let err = NewDuty::parse(Some("Alex"), None, Some("Primary"), None)
      .unwrap_err();
    assert_eq!(err.to_string(), "RA name, date and shift are required");

    let err = NewDuty::parse(Some("  "), Some("2025-03-01"), Some("Primary"), None)
      .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn parse_rejects_malformed_date() {
    let err =
      NewDuty::parse(Some("Alex"), Some("03/01/2025"), Some("Primary"), None)
        .unwrap_err();
    assert!(err.to_string().contains("YYYY-MM-DD"));
  }

  #[test]
  fn parse_normalises_fields() {
    let duty = NewDuty::parse(
      Some(" Alex Smith "),
      Some("2025-03-28"),
      Some("secondary"),
      Some("  ".into()),
    )
    .unwrap();
    assert_eq!(duty.ra_name, "Alex Smith");
    assert_eq!(duty.date, NaiveDate::from_ymd_opt(2025, 3, 28).unwrap());
    assert_eq!(duty.shift, Shift::Secondary);
    assert_eq!(duty.notes, None);
  }
}
