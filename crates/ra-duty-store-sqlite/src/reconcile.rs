//! Keeping `duties.ra_name` consistent with `ras.name`.
//!
//! Everything here is synchronous and takes a plain connection; callers run it
//! inside the store's write transaction so that the RA lookup, any insert, and
//! the dependent duty writes commit or roll back together.

use ra_duty_core::{
  Error as CoreError,
  duty::Shift,
  ra::{NewRa, Ra, normalize_name},
  report::SyncReport,
};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::{
  Error, Result,
  encode::{RA_COLUMNS, decode_shift, ra_from_row},
};

// ─── Lookups ─────────────────────────────────────────────────────────────────

pub fn find_ra(conn: &Connection, id: i64) -> Result<Option<Ra>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {RA_COLUMNS} FROM ras WHERE id = ?1"),
        params![id],
        ra_from_row,
      )
      .optional()?,
  )
}

/// Exact match ignoring ASCII case; served by `ras_name_nocase_idx`.
pub fn find_ra_by_name(conn: &Connection, name: &str) -> Result<Option<Ra>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {RA_COLUMNS} FROM ras WHERE name = ?1 COLLATE NOCASE"),
        params![name],
        ra_from_row,
      )
      .optional()?,
  )
}

// ─── Inserts ─────────────────────────────────────────────────────────────────

/// Insert `input` unless its name is already taken. Returns `None` on a name
/// collision; the unique index decides, so there is no check-then-insert gap.
pub fn insert_ra(conn: &Connection, input: &NewRa) -> Result<Option<Ra>> {
  let inserted = conn.execute(
    "INSERT INTO ras (name, email, phone, hall) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT DO NOTHING",
    params![input.name, input.email, input.phone, input.hall],
  )?;
  if inserted == 0 {
    return Ok(None);
  }

  Ok(Some(Ra {
    id:    conn.last_insert_rowid(),
    name:  input.name.clone(),
    email: input.email.clone(),
    phone: input.phone.clone(),
    hall:  input.hall.clone(),
  }))
}

/// Return the RA named `input.name` (ignoring case), creating it if absent.
/// Contact fields on `input` only apply when a new RA is created.
pub fn get_or_create_ra(conn: &Connection, input: &NewRa) -> Result<Ra> {
  if let Some(ra) = find_ra_by_name(conn, &input.name)? {
    return Ok(ra);
  }

  if let Some(ra) = insert_ra(conn, input)? {
    tracing::info!(ra_id = ra.id, name = %ra.name, "created RA from duty");
    return Ok(ra);
  }

  // Lost the insert to a concurrent writer on another connection.
  find_ra_by_name(conn, &input.name)?.ok_or_else(|| {
    Error::CorruptRow(format!(
      "RA {:?} neither inserted nor found",
      input.name
    ))
  })
}

// ─── Propagation ─────────────────────────────────────────────────────────────

/// Rewrite `ra_name` on every duty of `ra_id` after a rename. Case-only
/// renames propagate too, otherwise duties would keep the old casing.
///
/// Returns the number of duties updated.
pub fn propagate_rename(
  conn: &Connection,
  ra_id: i64,
  old_name: &str,
  new_name: &str,
) -> Result<usize> {
  if old_name == new_name {
    return Ok(0);
  }

  let updated = conn.execute(
    "UPDATE duties SET ra_name = ?1 WHERE ra_id = ?2",
    params![new_name, ra_id],
  )?;

  if updated > 0 {
    tracing::info!(
      ra_id,
      old = old_name,
      new = new_name,
      duties = updated,
      "propagated RA rename"
    );
  }
  Ok(updated)
}

// ─── Duplicate merge ─────────────────────────────────────────────────────────

/// Fold RAs whose names differ only in ASCII case into the lowest id among
/// them. Duties move to the kept RA and take its name; contact fields the
/// kept RA lacks are filled from the merged one.
///
/// Returns the number of RAs removed.
pub fn merge_duplicate_ras(conn: &Connection) -> Result<usize> {
  let pairs: Vec<(i64, i64)> = {
    let mut stmt = conn.prepare(
      "SELECT id, keep_id FROM (
         SELECT r.id,
                (SELECT MIN(k.id) FROM ras k
                 WHERE k.name = r.name COLLATE NOCASE) AS keep_id
         FROM ras r
       )
       WHERE keep_id <> id
       ORDER BY id",
    )?;
    let rows = stmt
      .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
      .collect::<rusqlite::Result<_>>()?;
    rows
  };

  for &(dup_id, keep_id) in &pairs {
    conn.execute(
      "UPDATE ras SET
         email = COALESCE(email, (SELECT email FROM ras WHERE id = ?2)),
         phone = COALESCE(phone, (SELECT phone FROM ras WHERE id = ?2)),
         hall  = COALESCE(hall,  (SELECT hall  FROM ras WHERE id = ?2))
       WHERE id = ?1",
      params![keep_id, dup_id],
    )?;
    let moved = conn.execute(
      "UPDATE duties
       SET ra_id = ?1, ra_name = (SELECT name FROM ras WHERE id = ?1)
       WHERE ra_id = ?2",
      params![keep_id, dup_id],
    )?;
    conn.execute("DELETE FROM ras WHERE id = ?1", params![dup_id])?;
    tracing::debug!(dup_id, keep_id, duties = moved, "merged duplicate RA");
  }

  Ok(pairs.len())
}

// ─── Orphan repair ───────────────────────────────────────────────────────────

/// One-time repair for duties written before RA references were enforced.
///
/// 1. For each distinct `(ra_id, ra_name)` whose `ra_id` has no RA: reuse an
///    RA with that name if one exists, otherwise materialise one (keeping the
///    orphaned id when it is positive and still free), and point the duties
///    at it.
/// 2. Overwrite every `ra_name` that disagrees with its RA's name.
/// 3. Rewrite shift text such as `"primary "` to its canonical spelling.
///    Text that names no shift at all fails the whole pass.
pub fn sync_orphans(conn: &Connection) -> Result<SyncReport> {
  let mut report = SyncReport::default();

  let orphans: Vec<(i64, String)> = {
    let mut stmt = conn.prepare(
      "SELECT DISTINCT d.ra_id, d.ra_name
       FROM duties d
       LEFT JOIN ras r ON r.id = d.ra_id
       WHERE r.id IS NULL
       ORDER BY d.ra_id, d.ra_name",
    )?;
    let rows = stmt
      .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
      .collect::<rusqlite::Result<_>>()?;
    rows
  };

  for (orphan_id, raw_name) in orphans {
    let name = normalize_name(&raw_name)
      .unwrap_or_else(|_| format!("Unknown RA {orphan_id}"));

    let ra = match find_ra_by_name(conn, &name)? {
      Some(ra) => ra,
      None => {
        let ra = if orphan_id > 0 && find_ra(conn, orphan_id)?.is_none() {
          insert_ra_with_id(conn, orphan_id, &name)?
        } else {
          insert_ra(conn, &NewRa::new(&name)?)?.ok_or_else(|| {
            CoreError::DuplicateRaName(name.clone())
          })?
        };
        tracing::debug!(
          ra_id = ra.id,
          name = %ra.name,
          orphan_id,
          "materialised orphaned RA"
        );
        report.ras_created += 1;
        ra
      }
    };

    if ra.id != orphan_id {
      let relinked = conn.execute(
        "UPDATE duties SET ra_id = ?1 WHERE ra_id = ?2 AND ra_name = ?3",
        params![ra.id, orphan_id, raw_name],
      )?;
      report.duties_relinked += relinked as u32;
    }
  }

  let reconciled = conn.execute(
    "UPDATE duties
     SET ra_name = (SELECT r.name FROM ras r WHERE r.id = duties.ra_id)
     WHERE EXISTS (
       SELECT 1 FROM ras r
       WHERE r.id = duties.ra_id AND r.name <> duties.ra_name
     )",
    [],
  )?;
  report.names_reconciled = reconciled as u32;
  report.shifts_normalised = normalise_shifts(conn)? as u32;

  Ok(report)
}

fn normalise_shifts(conn: &Connection) -> Result<usize> {
  let spellings: Vec<String> = {
    let mut stmt = conn.prepare("SELECT DISTINCT shift FROM duties")?;
    let rows = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<_>>()?;
    rows
  };

  let mut rewritten = 0;
  let mut unknown = Vec::new();
  for text in spellings {
    if decode_shift(&text).is_ok() {
      continue;
    }
    match Shift::parse(&text) {
      Ok(shift) => {
        rewritten += conn.execute(
          "UPDATE duties SET shift = ?1 WHERE shift = ?2",
          params![shift.as_str(), text],
        )?;
      }
      Err(_) => unknown.push(text),
    }
  }

  if !unknown.is_empty() {
    return Err(Error::CorruptRow(format!(
      "duties with unrecognised shift values: {unknown:?}"
    )));
  }
  Ok(rewritten)
}

fn insert_ra_with_id(conn: &Connection, id: i64, name: &str) -> Result<Ra> {
  conn.execute(
    "INSERT INTO ras (id, name) VALUES (?1, ?2)",
    params![id, name],
  )?;
  Ok(Ra {
    id,
    name: name.to_owned(),
    email: None,
    phone: None,
    hall: None,
  })
}
