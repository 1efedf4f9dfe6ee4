//! SQL schema for the RA duty tracker SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.
//!
//! Databases written by earlier versions of the tracker may lack the unique
//! name index and hold RAs whose names differ only in case. [`init`] merges
//! those before the index is created.

use rusqlite::{Connection, TransactionBehavior};

use crate::{Result, reconcile};

/// Tables and plain indexes; idempotent thanks to `IF NOT EXISTS`.
const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS ras (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    name   TEXT NOT NULL,   -- trimmed; unique ignoring ASCII case
    email  TEXT,
    phone  TEXT,
    hall   TEXT
);

CREATE TABLE IF NOT EXISTS duties (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    ra_id      INTEGER NOT NULL REFERENCES ras(id) ON DELETE RESTRICT,
    ra_name    TEXT NOT NULL,   -- copy of ras.name, maintained by the store
    date       TEXT NOT NULL,   -- YYYY-MM-DD; sorts chronologically as text
    shift      TEXT NOT NULL,   -- 'Primary' | 'Secondary' | 'Tertiary'
    notes      TEXT,
    created_at TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS duties_ra_idx   ON duties(ra_id);
CREATE INDEX IF NOT EXISTS duties_date_idx ON duties(date);

PRAGMA user_version = 1;
";

/// Backs the atomic get-or-create: `INSERT .. ON CONFLICT DO NOTHING`.
const NAME_INDEX: &str = "
CREATE UNIQUE INDEX IF NOT EXISTS ras_name_nocase_idx
    ON ras(name COLLATE NOCASE);
";

/// Apply [`SCHEMA`], fold case-insensitive duplicate RAs together, then
/// create the unique name index. Returns the number of RAs merged away.
pub fn init(conn: &mut Connection) -> Result<usize> {
  conn.execute_batch(SCHEMA)?;

  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let merged = reconcile::merge_duplicate_ras(&tx)?;
  tx.execute(
    "UPDATE duties SET created_at = CURRENT_TIMESTAMP WHERE created_at IS NULL",
    [],
  )?;
  tx.execute_batch(NAME_INDEX)?;
  tx.commit()?;

  Ok(merged)
}
