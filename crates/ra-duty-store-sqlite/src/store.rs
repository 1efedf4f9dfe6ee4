//! [`SqliteStore`]: the SQLite implementation of [`DutyStore`].

use std::path::Path;

use chrono::Utc;
use ra_duty_core::{
  Error as CoreError,
  duty::{Duty, NewDuty},
  ra::{NewRa, Ra},
  report::{MonthlySummary, RaDutyCount, ShiftCounts, SyncReport},
  store::{DateRange, DutyFilter, DutyStore},
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};

use crate::{
  Result,
  encode::{
    DUTY_COLUMNS, RA_COLUMNS, RawDuty, encode_date, encode_dt, ra_from_row,
  },
  reconcile,
  schema,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An RA duty store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. All clones
/// share one connection thread, so calls are serialised in submission order.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let merged = self.conn.call(|conn| Ok(schema::init(conn))).await??;
    if merged > 0 {
      tracing::info!(merged, "merged RAs whose names differ only in case");
    }
    Ok(())
  }

  /// Run a read-only closure on the connection thread.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(&*conn))).await?
  }

  /// Run `f` inside a `BEGIN IMMEDIATE` transaction. The transaction commits
  /// only if `f` succeeds; any error rolls back every statement `f` issued.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = f(&*tx);
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?
  }
}

#[cfg(test)]
impl SqliteStore {
  /// Execute raw SQL outside any transaction; lets tests stage legacy data.
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Re-run input normalisation; `NewRa` fields are public, so callers may
/// have built one by hand.
fn revalidate_ra(input: NewRa) -> Result<NewRa> {
  Ok(
    NewRa::new(&input.name)?
      .with_email(input.email)
      .with_phone(input.phone)
      .with_hall(input.hall),
  )
}

fn revalidate_duty(input: NewDuty) -> Result<NewDuty> {
  Ok(NewDuty::new(&input.ra_name, input.date, input.shift)?.with_notes(input.notes))
}

fn find_duty(conn: &Connection, id: i64) -> Result<Option<Duty>> {
  conn
    .query_row(
      &format!("SELECT {DUTY_COLUMNS} FROM duties WHERE id = ?1"),
      params![id],
      RawDuty::from_row,
    )
    .optional()?
    .map(RawDuty::into_duty)
    .transpose()
}

/// Escape `%`, `_` and `\` so user input matches literally under
/// `LIKE .. ESCAPE '\'`.
fn like_pattern(needle: &str) -> String {
  let mut escaped = String::with_capacity(needle.len() + 2);
  escaped.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

/// Tally columns shared by both reports, appended after the grouping columns.
const SHIFT_TALLIES: &str = "
  COUNT(*) AS total_duties,
  SUM(CASE WHEN shift = 'Primary'   THEN 1 ELSE 0 END) AS primary_count,
  SUM(CASE WHEN shift = 'Secondary' THEN 1 ELSE 0 END) AS secondary_count,
  SUM(CASE WHEN shift = 'Tertiary'  THEN 1 ELSE 0 END) AS tertiary_count";

fn counts_from_row(
  row: &rusqlite::Row<'_>,
  first: usize,
) -> rusqlite::Result<ShiftCounts> {
  Ok(ShiftCounts {
    total_duties:    row.get(first)?,
    primary_count:   row.get(first + 1)?,
    secondary_count: row.get(first + 2)?,
    tertiary_count:  row.get(first + 3)?,
  })
}

// ─── DutyStore impl ──────────────────────────────────────────────────────────

impl DutyStore for SqliteStore {
  type Error = crate::Error;

  // ── Roster ────────────────────────────────────────────────────────────────

  async fn list_ras(&self, _include_inactive: bool) -> Result<Vec<Ra>> {
    self
      .read(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RA_COLUMNS} FROM ras ORDER BY name COLLATE NOCASE, id"
        ))?;
        let ras = stmt
          .query_map([], ra_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ras)
      })
      .await
  }

  async fn get_ra(&self, id: i64) -> Result<Option<Ra>> {
    self.read(move |conn| reconcile::find_ra(conn, id)).await
  }

  async fn create_ra(&self, input: NewRa) -> Result<Ra> {
    let input = revalidate_ra(input)?;

    let ra = self
      .write(move |conn| {
        reconcile::insert_ra(conn, &input)?
          .ok_or_else(|| CoreError::DuplicateRaName(input.name.clone()).into())
      })
      .await?;

    tracing::debug!(ra_id = ra.id, name = %ra.name, "created RA");
    Ok(ra)
  }

  async fn update_ra(&self, id: i64, input: NewRa) -> Result<Ra> {
    let input = revalidate_ra(input)?;

    self
      .write(move |conn| {
        let current =
          reconcile::find_ra(conn, id)?.ok_or(CoreError::RaNotFound(id))?;

        if let Some(other) = reconcile::find_ra_by_name(conn, &input.name)?
          && other.id != id
        {
          return Err(CoreError::DuplicateRaName(input.name).into());
        }

        conn.execute(
          "UPDATE ras SET name = ?1, email = ?2, phone = ?3, hall = ?4
           WHERE id = ?5",
          params![input.name, input.email, input.phone, input.hall, id],
        )?;
        reconcile::propagate_rename(conn, id, &current.name, &input.name)?;

        Ok(Ra {
          id,
          name: input.name,
          email: input.email,
          phone: input.phone,
          hall: input.hall,
        })
      })
      .await
  }

  async fn delete_ra(&self, id: i64) -> Result<()> {
    self
      .write(move |conn| {
        if reconcile::find_ra(conn, id)?.is_none() {
          return Err(CoreError::RaNotFound(id).into());
        }

        let duties: u32 = conn.query_row(
          "SELECT COUNT(*) FROM duties WHERE ra_id = ?1",
          params![id],
          |r| r.get(0),
        )?;
        if duties > 0 {
          return Err(CoreError::RaHasDuties { id, duties }.into());
        }

        conn.execute("DELETE FROM ras WHERE id = ?1", params![id])?;
        Ok(())
      })
      .await?;

    tracing::debug!(ra_id = id, "deleted RA");
    Ok(())
  }

  async fn get_or_create_ra(&self, input: NewRa) -> Result<Ra> {
    let input = revalidate_ra(input)?;
    self
      .write(move |conn| reconcile::get_or_create_ra(conn, &input))
      .await
  }

  // ── Duty log ──────────────────────────────────────────────────────────────

  async fn list_duties(&self, filter: &DutyFilter) -> Result<Vec<Duty>> {
    let pattern = filter
      .ra_name_contains
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(like_pattern);
    let start = filter.dates.start.clone();
    let end = filter.dates.end.clone();

    let raws: Vec<RawDuty> = self
      .read(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DUTY_COLUMNS} FROM duties
           WHERE (?1 IS NULL OR ra_name LIKE ?1 ESCAPE '\\')
             AND (?2 IS NULL OR date >= ?2)
             AND (?3 IS NULL OR date <= ?3)
           ORDER BY date, id"
        ))?;
        let rows = stmt
          .query_map(params![pattern, start, end], RawDuty::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDuty::into_duty).collect()
  }

  async fn get_duty(&self, id: i64) -> Result<Option<Duty>> {
    self.read(move |conn| find_duty(conn, id)).await
  }

  async fn create_duty(&self, input: NewDuty) -> Result<Duty> {
    let input = revalidate_duty(input)?;

    let duty = self
      .write(move |conn| {
        let ra = reconcile::get_or_create_ra(conn, &NewRa::new(&input.ra_name)?)?;
        let created_at = Utc::now();

        conn.execute(
          "INSERT INTO duties (ra_id, ra_name, date, shift, notes, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![
            ra.id,
            ra.name,
            encode_date(input.date),
            input.shift.as_str(),
            input.notes,
            encode_dt(created_at),
          ],
        )?;

        Ok(Duty {
          id: conn.last_insert_rowid(),
          ra_id: ra.id,
          ra_name: ra.name,
          date: input.date,
          shift: input.shift,
          notes: input.notes,
          created_at,
        })
      })
      .await?;

    tracing::debug!(
      duty_id = duty.id,
      ra_id = duty.ra_id,
      date = %duty.date,
      "created duty"
    );
    Ok(duty)
  }

  async fn update_duty(&self, id: i64, input: NewDuty) -> Result<Duty> {
    let input = revalidate_duty(input)?;

    self
      .write(move |conn| {
        let existing =
          find_duty(conn, id)?.ok_or(CoreError::DutyNotFound(id))?;
        let ra = reconcile::get_or_create_ra(conn, &NewRa::new(&input.ra_name)?)?;

        conn.execute(
          "UPDATE duties
           SET ra_id = ?1, ra_name = ?2, date = ?3, shift = ?4, notes = ?5
           WHERE id = ?6",
          params![
            ra.id,
            ra.name,
            encode_date(input.date),
            input.shift.as_str(),
            input.notes,
            id,
          ],
        )?;

        Ok(Duty {
          id,
          ra_id: ra.id,
          ra_name: ra.name,
          date: input.date,
          shift: input.shift,
          notes: input.notes,
          created_at: existing.created_at,
        })
      })
      .await
  }

  async fn delete_duty(&self, id: i64) -> Result<()> {
    self
      .write(move |conn| {
        let deleted =
          conn.execute("DELETE FROM duties WHERE id = ?1", params![id])?;
        if deleted == 0 {
          return Err(CoreError::DutyNotFound(id).into());
        }
        Ok(())
      })
      .await
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn ra_duty_report(&self, dates: DateRange) -> Result<Vec<RaDutyCount>> {
    let DateRange { start, end } = dates;

    self
      .read(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT ra_id, ra_name, {SHIFT_TALLIES}
           FROM duties
           WHERE (?1 IS NULL OR date >= ?1)
             AND (?2 IS NULL OR date <= ?2)
           GROUP BY ra_id, ra_name
           ORDER BY total_duties DESC, ra_name"
        ))?;
        let rows = stmt
          .query_map(params![start, end], |row| {
            Ok(RaDutyCount {
              ra_id:   row.get(0)?,
              ra_name: row.get(1)?,
              counts:  counts_from_row(row, 2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
  }

  async fn monthly_summary(&self, year: i32) -> Result<Vec<MonthlySummary>> {
    let first = format!("{year:04}-01-01");
    let last = format!("{year:04}-12-31");

    self
      .read(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT substr(date, 6, 2) AS month, {SHIFT_TALLIES}
           FROM duties
           WHERE date >= ?1 AND date <= ?2
           GROUP BY month
           ORDER BY month"
        ))?;
        let rows = stmt
          .query_map(params![first, last], |row| {
            Ok(MonthlySummary {
              month:  row.get(0)?,
              counts: counts_from_row(row, 1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
  }

  // ── Maintenance ───────────────────────────────────────────────────────────

  async fn sync_orphans(&self) -> Result<SyncReport> {
    let report = self.write(reconcile::sync_orphans).await?;
    if !report.is_clean() {
      tracing::info!(
        ras_created = report.ras_created,
        duties_relinked = report.duties_relinked,
        names_reconciled = report.names_reconciled,
        "repaired duty/RA references"
      );
    }
    Ok(report)
  }
}
