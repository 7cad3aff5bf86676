//! SQL schema and migrations for the Rolodex SQLite store.
//!
//! The applied version is mirrored to `PRAGMA user_version`. Pending
//! migrations run in a single transaction before the store hands out any
//! data, so reopening an up-to-date database is a no-op.

use rusqlite::Connection;

use crate::{Error, Result};

/// Connection-level settings; cannot run inside a transaction.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// UTC "now" with millisecond precision, RFC 3339 formatted.
///
/// SQLite evaluates `'now'` once per statement, so both defaults of a single
/// INSERT carry the same instant.
macro_rules! db_now {
  () => {
    "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')"
  };
}

struct Migration {
  version: u32,
  sql:     &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
  version: 1,
  sql:     concat!(
    "
CREATE TABLE IF NOT EXISTS contacts (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    salutation            TEXT NOT NULL CHECK (length(salutation) >= 2),
    first_name            TEXT NOT NULL CHECK (length(first_name) >= 2),
    last_name             TEXT NOT NULL CHECK (length(last_name) >= 2),
    display_name          TEXT,            -- explicit override; NULL = computed
    birth_date            TEXT,            -- RFC 3339 UTC
    email                 TEXT NOT NULL,
    phone_number          TEXT,
    creation_timestamp    TEXT NOT NULL DEFAULT (",
    db_now!(),
    "),
    last_change_timestamp TEXT NOT NULL DEFAULT (",
    db_now!(),
    ")
);

-- Re-stamp the modification time from the database clock on every update,
-- whatever the UPDATE statement itself wrote to the column.
CREATE TRIGGER IF NOT EXISTS contacts_touch_last_change
AFTER UPDATE ON contacts
FOR EACH ROW
BEGIN
    UPDATE contacts SET last_change_timestamp = ",
    db_now!(),
    " WHERE id = NEW.id;
END;

CREATE TRIGGER IF NOT EXISTS contacts_generated_immutable
BEFORE UPDATE OF id, creation_timestamp ON contacts
FOR EACH ROW
WHEN NEW.id IS NOT OLD.id
  OR NEW.creation_timestamp IS NOT OLD.creation_timestamp
BEGIN
    SELECT RAISE(ABORT, 'id and creation_timestamp are immutable');
END;
"
  ),
}, Migration {
  version: 2,
  // SQLite reports NEW.id as -1 in a BEFORE INSERT trigger when the rowid is
  // left for it to assign. 'now' is fixed for the whole statement, so the
  // column defaults compare equal to the clock read here.
  sql:     concat!(
    "
CREATE TRIGGER IF NOT EXISTS contacts_generated_on_insert
BEFORE INSERT ON contacts
FOR EACH ROW
WHEN NEW.id <> -1
  OR NEW.creation_timestamp IS NOT ",
    db_now!(),
    "
  OR NEW.last_change_timestamp IS NOT ",
    db_now!(),
    "
BEGIN
    SELECT RAISE(ABORT, 'id and timestamps are assigned by the database');
END;
"
  ),
}];

/// The newest schema version this build knows how to create.
pub fn latest_version() -> u32 {
  MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Bring `conn` up to [`latest_version`].
pub fn migrate(conn: &mut Connection) -> Result<()> {
  conn.execute_batch(PRAGMAS)?;

  let current: u32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
  let latest = latest_version();

  if current > latest {
    return Err(Error::UnsupportedSchemaVersion { found: current, supported: latest });
  }
  if current == latest {
    return Ok(());
  }

  let tx = conn.transaction()?;
  for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
    tx.execute_batch(migration.sql)?;
    tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
  }
  tx.commit()?;
  Ok(())
}
