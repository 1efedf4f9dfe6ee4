//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use ra_duty_core::{
  Error as CoreError,
  duty::{NewDuty, Shift, parse_date},
  ra::NewRa,
  report::SyncReport,
  store::{DateRange, DutyFilter, DutyStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(s: &str) -> NaiveDate { parse_date(s).unwrap() }

fn ra(name: &str) -> NewRa { NewRa::new(name).unwrap() }

fn duty(ra_name: &str, on: &str, shift: Shift) -> NewDuty {
  NewDuty::new(ra_name, date(on), shift).unwrap()
}

fn core_err(e: Error) -> CoreError {
  match e {
    Error::Core(e) => e,
    other => panic!("expected a domain error, got {other:?}"),
  }
}

/// Every duty's `ra_name` must equal its RA's current name.
async fn assert_names_consistent(s: &SqliteStore) {
  for d in s.list_duties(&DutyFilter::default()).await.unwrap() {
    let owner = s
      .get_ra(d.ra_id)
      .await
      .unwrap()
      .unwrap_or_else(|| panic!("duty {} points at missing RA {}", d.id, d.ra_id));
    assert_eq!(d.ra_name, owner.name, "duty {} out of sync", d.id);
  }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_ra() {
  let s = store().await;

  let created = s
    .create_ra(ra("Alex Smith").with_email(Some("alex.smith@example.edu".into())))
    .await
    .unwrap();
  assert_eq!(created.name, "Alex Smith");

  let fetched = s.get_ra(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.email.as_deref(), Some("alex.smith@example.edu"));
}

#[tokio::test]
async fn get_ra_missing_returns_none() {
  let s = store().await;
  assert!(s.get_ra(42).await.unwrap().is_none());
}

#[tokio::test]
async fn create_ra_trims_name() {
  let s = store().await;
  let mut input = ra("placeholder");
  input.name = "   Jordan Lee  ".into();

  let created = s.create_ra(input).await.unwrap();
  assert_eq!(created.name, "Jordan Lee");
}

#[tokio::test]
async fn create_ra_rejects_blank_name() {
  let s = store().await;
  let mut input = ra("placeholder");
  input.name = "  ".into();

  let err = s.create_ra(input).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::Validation(_)));
}

#[tokio::test]
async fn create_ra_rejects_case_insensitive_duplicate() {
  let s = store().await;
  s.create_ra(ra("Taylor Wong")).await.unwrap();

  let err = s.create_ra(ra("taylor WONG")).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::DuplicateRaName(_)));
  assert_eq!(s.list_ras(false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn name_uniqueness_folds_ascii_case_only() {
  let s = store().await;
  s.create_ra(ra("Émile Roy")).await.unwrap();
  s.create_ra(ra("émile Roy")).await.unwrap();
  assert_eq!(s.list_ras(false).await.unwrap().len(), 2);
}

#[tokio::test]
async fn list_ras_sorted_by_name() {
  let s = store().await;
  s.create_ra(ra("Taylor Wong")).await.unwrap();
  s.create_ra(ra("alex smith")).await.unwrap();
  s.create_ra(ra("Casey Johnson")).await.unwrap();

  let names: Vec<String> = s
    .list_ras(false)
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.name)
    .collect();
  assert_eq!(names, ["alex smith", "Casey Johnson", "Taylor Wong"]);

  assert_eq!(s.list_ras(true).await.unwrap().len(), 3);
}

#[tokio::test]
async fn update_ra_replaces_contact_fields() {
  let s = store().await;
  let created = s
    .create_ra(ra("Casey Johnson").with_hall(Some("South Hall".into())))
    .await
    .unwrap();

  let updated = s
    .update_ra(
      created.id,
      ra("Casey Johnson")
        .with_email(Some("casey@example.edu".into()))
        .with_phone(Some("555-456-7890".into())),
    )
    .await
    .unwrap();

  assert_eq!(updated.email.as_deref(), Some("casey@example.edu"));
  assert_eq!(updated.phone.as_deref(), Some("555-456-7890"));
  assert_eq!(updated.hall, None);
  assert_eq!(s.get_ra(created.id).await.unwrap().unwrap(), updated);
}

#[tokio::test]
async fn update_ra_missing_is_not_found() {
  let s = store().await;
  let err = s.update_ra(7, ra("Nobody")).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::RaNotFound(7)));
}

#[tokio::test]
async fn update_ra_rejects_name_of_another_ra() {
  let s = store().await;
  s.create_ra(ra("Alex Smith")).await.unwrap();
  let jordan = s.create_ra(ra("Jordan Lee")).await.unwrap();

  let err = s.update_ra(jordan.id, ra("ALEX SMITH")).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::DuplicateRaName(_)));
  assert_eq!(s.get_ra(jordan.id).await.unwrap().unwrap().name, "Jordan Lee");
}

#[tokio::test]
async fn update_ra_may_keep_own_name() {
  let s = store().await;
  let alex = s.create_ra(ra("Alex Smith")).await.unwrap();
  let updated = s.update_ra(alex.id, ra("Alex Smith")).await.unwrap();
  assert_eq!(updated.name, "Alex Smith");
}

#[tokio::test]
async fn delete_ra_without_duties() {
  let s = store().await;
  let alex = s.create_ra(ra("Alex Smith")).await.unwrap();

  s.delete_ra(alex.id).await.unwrap();
  assert!(s.get_ra(alex.id).await.unwrap().is_none());

  let err = s.delete_ra(alex.id).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::RaNotFound(_)));
}

#[tokio::test]
async fn delete_ra_with_duties_is_rejected() {
  let s = store().await;
  let d = s
    .create_duty(duty("Alex Smith", "2025-03-28", Shift::Secondary))
    .await
    .unwrap();

  let err = s.delete_ra(d.ra_id).await.unwrap_err();
  assert!(matches!(
    core_err(err),
    CoreError::RaHasDuties { duties: 1, .. }
  ));

  assert!(s.get_ra(d.ra_id).await.unwrap().is_some());
  assert_eq!(s.get_duty(d.id).await.unwrap().unwrap(), d);
}

#[tokio::test]
async fn delete_ra_allowed_once_duties_are_gone() {
  let s = store().await;
  let d = s
    .create_duty(duty("Alex Smith", "2025-03-28", Shift::Primary))
    .await
    .unwrap();

  s.delete_duty(d.id).await.unwrap();
  s.delete_ra(d.ra_id).await.unwrap();
  assert!(s.list_ras(false).await.unwrap().is_empty());
}

// ─── Reconciliation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn get_or_create_ra_is_idempotent_by_name() {
  let s = store().await;

  let first = s
    .get_or_create_ra(ra("New Person").with_email(Some("new@example.edu".into())))
    .await
    .unwrap();
  let second = s
    .get_or_create_ra(ra("  new person ").with_email(Some("other@example.edu".into())))
    .await
    .unwrap();

  assert_eq!(first.id, second.id);
  assert_eq!(second.name, "New Person");
  // The email on a matching call is ignored.
  assert_eq!(second.email.as_deref(), Some("new@example.edu"));
  assert_eq!(s.list_ras(false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_get_or_create_makes_one_ra() {
  let s = store().await;

  let handles: Vec<_> = (0..8)
    .map(|i| {
      let s = s.clone();
      let name = if i % 2 == 0 { "Racy Name" } else { "racy name" };
      tokio::spawn(async move { s.get_or_create_ra(ra(name)).await.unwrap() })
    })
    .collect();

  let mut ids = Vec::new();
  for h in handles {
    ids.push(h.await.unwrap().id);
  }
  ids.dedup();
  assert_eq!(ids.len(), 1);
  assert_eq!(s.list_ras(false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_duty_creates_ra_once() {
  let s = store().await;

  let first = s
    .create_duty(duty("New Person", "2025-03-01", Shift::Primary))
    .await
    .unwrap();
  let second = s
    .create_duty(duty("new person", "2025-03-02", Shift::Tertiary))
    .await
    .unwrap();

  assert_eq!(first.ra_id, second.ra_id);
  assert_eq!(second.ra_name, "New Person");

  let ras = s.list_ras(false).await.unwrap();
  assert_eq!(ras.len(), 1);
  assert_eq!(ras[0].name, "New Person");
}

#[tokio::test]
async fn create_duty_uses_canonical_name_of_existing_ra() {
  let s = store().await;
  let jordan = s.create_ra(ra("Jordan Lee")).await.unwrap();

  let d = s
    .create_duty(duty("JORDAN lee", "2025-03-29", Shift::Tertiary))
    .await
    .unwrap();
  assert_eq!(d.ra_id, jordan.id);
  assert_eq!(d.ra_name, "Jordan Lee");
}

#[tokio::test]
async fn rename_propagates_to_own_duties_only() {
  let s = store().await;
  let a1 = s
    .create_duty(duty("Alex Smith", "2025-03-01", Shift::Primary))
    .await
    .unwrap();
  let a2 = s
    .create_duty(duty("Alex Smith", "2025-03-08", Shift::Secondary))
    .await
    .unwrap();
  let other = s
    .create_duty(duty("Jordan Lee", "2025-03-02", Shift::Primary))
    .await
    .unwrap();

  s.update_ra(a1.ra_id, ra("Alex Smith-Jones")).await.unwrap();

  for id in [a1.id, a2.id] {
    let d = s.get_duty(id).await.unwrap().unwrap();
    assert_eq!(d.ra_name, "Alex Smith-Jones");
  }
  assert_eq!(s.get_duty(other.id).await.unwrap().unwrap(), other);
  assert_names_consistent(&s).await;
}

#[tokio::test]
async fn case_only_rename_propagates() {
  let s = store().await;
  let d = s
    .create_duty(duty("casey johnson", "2025-04-01", Shift::Secondary))
    .await
    .unwrap();

  s.update_ra(d.ra_id, ra("Casey Johnson")).await.unwrap();

  let d = s.get_duty(d.id).await.unwrap().unwrap();
  assert_eq!(d.ra_name, "Casey Johnson");
}

#[tokio::test]
async fn failed_rename_leaves_duties_untouched() {
  let s = store().await;
  let alex = s
    .create_duty(duty("Alex Smith", "2025-03-01", Shift::Primary))
    .await
    .unwrap();
  s.create_ra(ra("Jordan Lee")).await.unwrap();

  s.update_ra(alex.ra_id, ra("Jordan Lee")).await.unwrap_err();

  assert_eq!(s.get_duty(alex.id).await.unwrap().unwrap(), alex);
  assert_names_consistent(&s).await;
}

// ─── Duty log ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_duty() {
  let s = store().await;
  let created = s
    .create_duty(
      duty("Taylor Wong", "2025-03-30", Shift::Primary)
        .with_notes(Some("Mail room coverage".into())),
    )
    .await
    .unwrap();

  let fetched = s.get_duty(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.notes.as_deref(), Some("Mail room coverage"));
  assert_eq!(fetched.date, date("2025-03-30"));
}

#[tokio::test]
async fn get_duty_missing_returns_none() {
  let s = store().await;
  assert!(s.get_duty(1).await.unwrap().is_none());
}

#[tokio::test]
async fn update_duty_reassigns_ra_and_keeps_created_at() {
  let s = store().await;
  let original = s
    .create_duty(duty("Alex Smith", "2025-03-01", Shift::Primary))
    .await
    .unwrap();

  let updated = s
    .update_duty(
      original.id,
      duty("Jordan Lee", "2025-03-05", Shift::Tertiary)
        .with_notes(Some("swapped".into())),
    )
    .await
    .unwrap();

  assert_ne!(updated.ra_id, original.ra_id);
  assert_eq!(updated.ra_name, "Jordan Lee");
  assert_eq!(updated.date, date("2025-03-05"));
  assert_eq!(updated.shift, Shift::Tertiary);
  assert_eq!(updated.created_at, original.created_at);
  assert_eq!(s.get_duty(original.id).await.unwrap().unwrap(), updated);
}

#[tokio::test]
async fn update_duty_missing_is_not_found_and_creates_no_ra() {
  let s = store().await;
  let err = s
    .update_duty(99, duty("Ghost", "2025-03-01", Shift::Primary))
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::DutyNotFound(99)));
  assert!(s.list_ras(false).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_duty_then_missing() {
  let s = store().await;
  let d = s
    .create_duty(duty("Alex Smith", "2025-03-01", Shift::Primary))
    .await
    .unwrap();

  s.delete_duty(d.id).await.unwrap();
  assert!(s.get_duty(d.id).await.unwrap().is_none());

  let err = s.delete_duty(d.id).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::DutyNotFound(_)));
}

async fn seeded_log(s: &SqliteStore) {
  for (name, on, shift) in [
    ("Casey Johnson", "2025-04-01", Shift::Secondary),
    ("Alex Smith", "2025-03-28", Shift::Secondary),
    ("Jordan Lee", "2025-03-29", Shift::Tertiary),
    ("Taylor Wong", "2025-03-01", Shift::Primary),
    ("Alex Smith", "2025-02-28", Shift::Primary),
    ("Alex Smith", "2025-03-31", Shift::Primary),
    ("Jordan Lee", "2024-12-31", Shift::Primary),
  ] {
    s.create_duty(duty(name, on, shift)).await.unwrap();
  }
}

#[tokio::test]
async fn list_duties_ordered_by_date() {
  let s = store().await;
  seeded_log(&s).await;

  let dates: Vec<NaiveDate> = s
    .list_duties(&DutyFilter::default())
    .await
    .unwrap()
    .into_iter()
    .map(|d| d.date)
    .collect();
  assert_eq!(dates.len(), 7);
  assert!(dates.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn list_duties_date_range_is_inclusive() {
  let s = store().await;
  seeded_log(&s).await;

  let range = DateRange::new(Some("2025-03-01"), Some("2025-03-31"));
  let duties = s
    .list_duties(&DutyFilter { dates: range, ..Default::default() })
    .await
    .unwrap();

  let dates: Vec<String> = duties.iter().map(|d| d.date.to_string()).collect();
  assert_eq!(
    dates,
    ["2025-03-01", "2025-03-28", "2025-03-29", "2025-03-31"]
  );
}

#[tokio::test]
async fn list_duties_accepts_partial_date_bounds() {
  let s = store().await;
  seeded_log(&s).await;

  let from_march = DutyFilter {
    dates: DateRange::new(Some("2025-03"), None),
    ..Default::default()
  };
  let duties = s.list_duties(&from_march).await.unwrap();
  assert!(!duties.is_empty());
  assert!(duties.iter().all(|d| d.date >= date("2025-03-01")));

  let nonsense = DutyFilter {
    dates: DateRange::new(Some("March"), None),
    ..Default::default()
  };
  assert!(s.list_duties(&nonsense).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_duties_name_filter_is_case_insensitive_substring() {
  let s = store().await;
  seeded_log(&s).await;

  let filter = DutyFilter {
    ra_name_contains: Some("SMITH".into()),
    ..Default::default()
  };
  let duties = s.list_duties(&filter).await.unwrap();
  assert_eq!(duties.len(), 3);
  assert!(duties.iter().all(|d| d.ra_name == "Alex Smith"));
}

#[tokio::test]
async fn list_duties_name_filter_treats_wildcards_literally() {
  let s = store().await;
  seeded_log(&s).await;
  s.create_duty(duty("Pat 100%", "2025-05-01", Shift::Primary))
    .await
    .unwrap();

  let filter = DutyFilter {
    ra_name_contains: Some("%".into()),
    ..Default::default()
  };
  let duties = s.list_duties(&filter).await.unwrap();
  assert_eq!(duties.len(), 1);
  assert_eq!(duties[0].ra_name, "Pat 100%");

  let blank = DutyFilter {
    ra_name_contains: Some("  ".into()),
    ..Default::default()
  };
  assert_eq!(s.list_duties(&blank).await.unwrap().len(), 8);
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ra_duty_report_counts_per_shift() {
  let s = store().await;
  seeded_log(&s).await;

  let rows = s.ra_duty_report(DateRange::default()).await.unwrap();
  assert_eq!(rows.len(), 4);

  let alex = &rows[0];
  assert_eq!(alex.ra_name, "Alex Smith");
  assert_eq!(alex.counts.total_duties, 3);
  assert_eq!(alex.counts.primary_count, 2);
  assert_eq!(alex.counts.secondary_count, 1);
  assert_eq!(alex.counts.tertiary_count, 0);

  assert_eq!(rows[1].ra_name, "Jordan Lee");
  assert_eq!(rows[1].counts.total_duties, 2);
  assert!(rows.windows(2).all(|w| w[0].counts.total_duties >= w[1].counts.total_duties));
}

#[tokio::test]
async fn ra_duty_report_respects_date_range() {
  let s = store().await;
  seeded_log(&s).await;

  let rows = s
    .ra_duty_report(DateRange::new(Some("2025-03-29"), None))
    .await
    .unwrap();
  let total: u32 = rows.iter().map(|r| r.counts.total_duties).sum();
  assert_eq!(total, 3);
}

#[tokio::test]
async fn monthly_summary_groups_by_month_of_year() {
  let s = store().await;
  seeded_log(&s).await;

  let rows = s.monthly_summary(2025).await.unwrap();
  let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
  assert_eq!(months, ["02", "03", "04"]);

  let march = &rows[1];
  assert_eq!(march.counts.total_duties, 4);
  assert_eq!(march.counts.primary_count, 2);
  assert_eq!(march.counts.secondary_count, 1);
  assert_eq!(march.counts.tertiary_count, 1);

  let earlier = s.monthly_summary(2024).await.unwrap();
  assert_eq!(earlier.len(), 1);
  assert_eq!(earlier[0].month, "12");

  assert!(s.monthly_summary(2030).await.unwrap().is_empty());
}

// ─── Orphan repair ───────────────────────────────────────────────────────────

#[tokio::test]
async fn sync_orphans_on_clean_store_is_noop() {
  let s = store().await;
  seeded_log(&s).await;

  let report = s.sync_orphans().await.unwrap();
  assert!(report.is_clean());
}

#[tokio::test]
async fn sync_orphans_repairs_legacy_rows() {
  let s = store().await;
  let jordan = s.create_ra(ra("Jordan Lee")).await.unwrap();

  // Rows as an older writer left them: unresolvable ids and stale names.
  s.execute_raw(
    "PRAGMA foreign_keys = OFF;
     INSERT INTO duties (ra_id, ra_name, date, shift, notes, created_at) VALUES
       (0,  'Legacy Person', '2025-03-01', 'Primary',   NULL, '2025-03-01 09:00:00'),
       (0,  'Legacy Person', '2025-03-02', 'Secondary', NULL, '2025-03-02 09:00:00'),
       (0,  'jordan lee',    '2025-03-03', 'Tertiary',  NULL, '2025-03-03 09:00:00'),
       (42, 'Dana Cruz',     '2025-03-04', 'Primary',   NULL, '2025-03-04 09:00:00');
     PRAGMA foreign_keys = ON;",
  )
  .await
  .unwrap();

  let report = s.sync_orphans().await.unwrap();
  assert_eq!(
    report,
    SyncReport {
      ras_created:       2,
      duties_relinked:   3,
      names_reconciled:  1,
      shifts_normalised: 0,
    }
  );

  let dana = s.get_ra(42).await.unwrap().unwrap();
  assert_eq!(dana.name, "Dana Cruz");

  let duties = s.list_duties(&DutyFilter::default()).await.unwrap();
  let on_jordan: Vec<_> = duties.iter().filter(|d| d.ra_id == jordan.id).collect();
  assert_eq!(on_jordan.len(), 1);
  assert_eq!(on_jordan[0].ra_name, "Jordan Lee");

  assert_names_consistent(&s).await;
  assert!(s.sync_orphans().await.unwrap().is_clean());
}

#[tokio::test]
async fn sync_orphans_normalises_shift_spelling() {
  let s = store().await;
  s.create_duty(duty("Alex Smith", "2025-03-01", Shift::Primary))
    .await
    .unwrap();
  s.execute_raw("UPDATE duties SET shift = ' primary'")
    .await
    .unwrap();

  let err = s.list_duties(&DutyFilter::default()).await.unwrap_err();
  assert!(matches!(err, Error::CorruptRow(_)));

  let report = s.sync_orphans().await.unwrap();
  assert_eq!(report.shifts_normalised, 1);
  let duties = s.list_duties(&DutyFilter::default()).await.unwrap();
  assert_eq!(duties[0].shift, Shift::Primary);
}

#[tokio::test]
async fn sync_orphans_rejects_unknown_shift_without_partial_repair() {
  let s = store().await;
  s.create_duty(duty("Alex Smith", "2025-03-01", Shift::Primary))
    .await
    .unwrap();
  s.execute_raw(
    "PRAGMA foreign_keys = OFF;
     INSERT INTO duties (ra_id, ra_name, date, shift, notes, created_at)
       VALUES (77, 'Night Owl', '2025-03-02', 'Overnight', NULL, '2025-03-02 09:00:00');
     PRAGMA foreign_keys = ON;",
  )
  .await
  .unwrap();

  let err = s.sync_orphans().await.unwrap_err();
  assert!(err.to_string().contains("Overnight"));
  assert!(s.get_ra(77).await.unwrap().is_none());
}

// ─── Legacy databases ────────────────────────────────────────────────────────

/// Table layout written by earlier versions of the tracker: no unique name
/// index, an `active` flag, and cascading deletes.
const LEGACY_SCHEMA: &str = "
CREATE TABLE ras (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    hall TEXT,
    active INTEGER DEFAULT 1
);
CREATE TABLE duties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ra_id INTEGER NOT NULL,
    ra_name TEXT NOT NULL,
    date TEXT NOT NULL,
    shift TEXT NOT NULL,
    notes TEXT,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (ra_id) REFERENCES ras (id) ON DELETE CASCADE
);
INSERT INTO ras (id, name, email, phone, hall, active) VALUES
  (1, 'Alex Smith', NULL,                   NULL,           'East Hall', 1),
  (2, 'alex smith', 'alex.smith@example.edu', '555-123-4567', NULL,        1),
  (3, 'Jordan Lee', NULL,                   NULL,           NULL,        0);
INSERT INTO duties (ra_id, ra_name, date, shift, notes) VALUES
  (2, 'alex smith',  '2025-03-28', 'Secondary', ''),
  (3, 'Jordan Lee',  '2025-03-29', 'tertiary',  'Weekend patrol'),
  (0, 'Taylor Wong', '2025-03-30', 'Primary',   NULL);
";

fn legacy_db_path() -> std::path::PathBuf {
  std::env::temp_dir().join(format!(
    "ra-duty-legacy-{}-{:?}.db",
    std::process::id(),
    std::thread::current().id()
  ))
}

fn remove_db(path: &std::path::Path) {
  for suffix in ["", "-wal", "-shm"] {
    let mut file = path.as_os_str().to_owned();
    file.push(suffix);
    std::fs::remove_file(file).ok();
  }
}

#[tokio::test]
async fn open_repairs_legacy_database() {
  let path = legacy_db_path();
  remove_db(&path);
  rusqlite::Connection::open(&path)
    .unwrap()
    .execute_batch(LEGACY_SCHEMA)
    .unwrap();

  let s = SqliteStore::open(&path).await.unwrap();

  let ras = s.list_ras(false).await.unwrap();
  let names: Vec<&str> = ras.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, ["Alex Smith", "Jordan Lee"]);
  let alex = &ras[0];
  assert_eq!(alex.id, 1);
  assert_eq!(alex.email.as_deref(), Some("alex.smith@example.edu"));
  assert_eq!(alex.hall.as_deref(), Some("East Hall"));

  let err = s.create_ra(ra("ALEX SMITH")).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::DuplicateRaName(_)));

  let report = s.sync_orphans().await.unwrap();
  assert_eq!(report.ras_created, 1);
  assert_eq!(report.duties_relinked, 1);
  assert_eq!(report.shifts_normalised, 1);

  let duties = s.list_duties(&DutyFilter::default()).await.unwrap();
  assert_eq!(duties.len(), 3);
  assert_eq!(duties[0].ra_id, alex.id);
  assert_eq!(duties[0].ra_name, "Alex Smith");
  assert_eq!(duties[1].shift, Shift::Tertiary);
  let taylor = s.get_ra(duties[2].ra_id).await.unwrap().unwrap();
  assert_eq!(taylor.name, "Taylor Wong");
  assert_names_consistent(&s).await;

  drop(s);
  remove_db(&path);
}
