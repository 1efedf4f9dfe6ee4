//! Resident assistants: the roster side of the tracker.
//!
//! An RA's `name` is its identity as far as duty submissions are concerned:
//! it is trimmed on the way in and unique under case-insensitive comparison.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Ra ──────────────────────────────────────────────────────────────────────

/// A resident assistant as stored on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ra {
  pub id:    i64,
  /// Canonical display name; every duty referencing this RA carries a copy.
  /// Unique ignoring ASCII case only: `"Émile"` and `"émile"` are distinct.
  pub name:  String,
  pub email: Option<String>,
  pub phone: Option<String>,
  /// Residence hall the RA is attached to.
  pub hall:  Option<String>,
}

// ─── NewRa ───────────────────────────────────────────────────────────────────

/// Input to [`crate::store::DutyStore::create_ra`] and
/// [`crate::store::DutyStore::update_ra`]. The id is always assigned by the
/// store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRa {
  pub name:  String,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub hall:  Option<String>,
}

impl NewRa {
  /// Validate `name` and build an input with no contact details.
  pub fn new(name: &str) -> Result<Self> {
    Ok(Self {
      name:  normalize_name(name)?,
      email: None,
      phone: None,
      hall:  None,
    })
  }

  pub fn with_email(mut self, email: Option<String>) -> Self {
    self.email = normalize_optional(email);
    self
  }

  pub fn with_phone(mut self, phone: Option<String>) -> Self {
    self.phone = normalize_optional(phone);
    self
  }

  pub fn with_hall(mut self, hall: Option<String>) -> Self {
    self.hall = normalize_optional(hall);
    self
  }
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Trim an RA name, rejecting names that are empty once trimmed.
pub fn normalize_name(name: &str) -> Result<String> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(Error::validation("RA name is required"));
  }
  Ok(trimmed.to_owned())
}

/// Trim an optional free-text field; blank values become `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_is_trimmed() {
    let ra = NewRa::new("  Alex Smith \t").unwrap();
    assert_eq!(ra.name, "Alex Smith");
  }

  #[test]
  fn blank_name_is_rejected() {
    assert!(matches!(NewRa::new("   "), Err(Error::Validation(_))));
    assert!(matches!(NewRa::new(""), Err(Error::Validation(_))));
  }

  #[test]
  fn blank_contact_fields_become_none() {
    let ra = NewRa::new("Jordan Lee")
      .unwrap()
      .with_email(Some("  ".into()))
      .with_phone(Some(" 555-234-5678 ".into()))
      .with_hall(None);
    assert_eq!(ra.email, None);
    assert_eq!(ra.phone.as_deref(), Some("555-234-5678"));
    assert_eq!(ra.hall, None);
  }
}
