//! Aggregate report rows and the orphan-repair summary.

use serde::{Deserialize, Serialize};

/// Per-shift duty tallies shared by both reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCounts {
  pub total_duties:    u32,
  pub primary_count:   u32,
  pub secondary_count: u32,
  pub tertiary_count:  u32,
}

/// One row of the per-RA duty report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaDutyCount {
  pub ra_id:   i64,
  pub ra_name: String,
  #[serde(flatten)]
  pub counts:  ShiftCounts,
}

/// One row of the monthly summary for a single calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
  /// Two-digit month, `"01"` through `"12"`.
  pub month:  String,
  #[serde(flatten)]
  pub counts: ShiftCounts,
}

/// What a [`crate::store::DutyStore::sync_orphans`] pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
  /// RAs materialised for duties whose `ra_id` resolved to nothing.
  pub ras_created:       u32,
  /// Duties whose `ra_id` was rewritten to point at an existing RA.
  pub duties_relinked:   u32,
  /// Duties whose `ra_name` was overwritten from the RA record.
  pub names_reconciled:  u32,
  /// Duties whose shift text was rewritten to its canonical spelling.
  pub shifts_normalised: u32,
}

impl SyncReport {
  pub fn is_clean(&self) -> bool { *self == Self::default() }
}
