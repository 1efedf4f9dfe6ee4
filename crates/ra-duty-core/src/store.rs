//! The `DutyStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `ra-duty-store-sqlite`).
//! Higher layers (`ra-duty-api`, `ra-duty-server`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  StoreError,
  duty::{Duty, NewDuty},
  ra::{NewRa, Ra},
  report::{MonthlySummary, RaDutyCount, SyncReport},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// An inclusive date window; either bound may be open.
///
/// Bounds are compared as text against the stored `YYYY-MM-DD` dates, so a
/// prefix such as `2025-03` is a usable lower bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
  pub start: Option<String>,
  pub end:   Option<String>,
}

impl DateRange {
  /// Build a range from raw query values. Blank bounds count as open.
  pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
    let bound = |v: Option<&str>| {
      v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
    };
    Self { start: bound(start), end: bound(end) }
  }
}

/// Parameters for [`DutyStore::list_duties`].
#[derive(Debug, Clone, Default)]
pub struct DutyFilter {
  /// Substring match on the duty's `ra_name`, ignoring ASCII case.
  pub ra_name_contains: Option<String>,
  pub dates:            DateRange,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an RA duty store backend.
///
/// Implementations own the name-consistency invariant: for every duty,
/// `ra_name` equals the current `name` of the RA its `ra_id` refers to after
/// any successful write. Every write is atomic; a failed call leaves no
/// partial state behind.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DutyStore: Send + Sync {
  type Error: StoreError;

  // ── Roster ────────────────────────────────────────────────────────────

  /// All RAs ordered by name. Every stored RA is active, so
  /// `include_inactive` does not change the result.
  fn list_ras(
    &self,
    include_inactive: bool,
  ) -> impl Future<Output = Result<Vec<Ra>, Self::Error>> + Send + '_;

  /// Retrieve an RA by id. Returns `None` if not found.
  fn get_ra(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Ra>, Self::Error>> + Send + '_;

  /// Persist a new RA. Fails with `DuplicateRaName` if the name collides
  /// case-insensitively with an existing RA.
  fn create_ra(
    &self,
    input: NewRa,
  ) -> impl Future<Output = Result<Ra, Self::Error>> + Send + '_;

  /// Replace an RA's fields. A name change is propagated to every duty
  /// referencing the RA within the same transaction.
  fn update_ra(
    &self,
    id: i64,
    input: NewRa,
  ) -> impl Future<Output = Result<Ra, Self::Error>> + Send + '_;

  /// Delete an RA. Fails with `RaHasDuties` while any duty references it.
  fn delete_ra(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Return the RA whose name matches `input.name` case-insensitively,
  /// creating it from `input` if none exists. Contact fields on `input` are
  /// ignored when a match is found.
  fn get_or_create_ra(
    &self,
    input: NewRa,
  ) -> impl Future<Output = Result<Ra, Self::Error>> + Send + '_;

  // ── Duty log ──────────────────────────────────────────────────────────

  /// Duties matching `filter`, ordered by date ascending.
  fn list_duties<'a>(
    &'a self,
    filter: &'a DutyFilter,
  ) -> impl Future<Output = Result<Vec<Duty>, Self::Error>> + Send + 'a;

  /// Retrieve a duty by id. Returns `None` if not found.
  fn get_duty(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Duty>, Self::Error>> + Send + '_;

  /// Record a new duty, resolving `input.ra_name` through
  /// [`DutyStore::get_or_create_ra`]. `created_at` is set by the store.
  fn create_duty(
    &self,
    input: NewDuty,
  ) -> impl Future<Output = Result<Duty, Self::Error>> + Send + '_;

  /// Replace a duty's fields, re-resolving the RA by name. `created_at` is
  /// preserved.
  fn update_duty(
    &self,
    id: i64,
    input: NewDuty,
  ) -> impl Future<Output = Result<Duty, Self::Error>> + Send + '_;

  fn delete_duty(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Per-RA shift tallies over `dates`, busiest RA first.
  fn ra_duty_report(
    &self,
    dates: DateRange,
  ) -> impl Future<Output = Result<Vec<RaDutyCount>, Self::Error>> + Send + '_;

  /// Per-month shift tallies for `year`; months without duties are omitted.
  fn monthly_summary(
    &self,
    year: i32,
  ) -> impl Future<Output = Result<Vec<MonthlySummary>, Self::Error>> + Send + '_;

  // ── Maintenance ───────────────────────────────────────────────────────

  /// Repair duties written before the name-consistency invariant was
  /// enforced: materialise RAs for dangling `ra_id`s, overwrite any
  /// `ra_name` that disagrees with its RA, and rewrite shift text to its
  /// canonical spelling. Fails if a shift cannot be recognised at all.
  fn sync_orphans(
    &self,
  ) -> impl Future<Output = Result<SyncReport, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_range_drops_blank_bounds() {
    let range = DateRange::new(Some(" 2025-03-01 "), Some("  "));
    assert_eq!(range.start.as_deref(), Some("2025-03-01"));
    assert_eq!(range.end, None);
    assert_eq!(DateRange::new(None, Some("")), DateRange::default());
  }
}
