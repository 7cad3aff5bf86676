//! [`SqliteStore`] — the SQLite implementation of [`ContactRepository`].

use std::path::Path;

use rolodex_core::{Contact, ContactId, ContactInput, ContactRepository, Failure, Outcome};
use rusqlite::OptionalExtension as _;
use tracing::Span;

use crate::{
  encode::{encode_dt, RawContact, CONTACT_COLUMNS},
  schema::{latest_version, migrate},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every event
/// the store logs is emitted under the span it was built with.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  span: Span,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and apply pending migrations.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let span = tracing::info_span!("contact_store", db = %path.display());
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, span).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let span = tracing::info_span!("contact_store", db = ":memory:");
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, span).await
  }

  /// Replace the span that store diagnostics are reported under.
  pub fn with_span(mut self, span: Span) -> Self {
    self.span = span;
    self
  }

  async fn init(conn: tokio_rusqlite::Connection, span: Span) -> Result<Self> {
    conn.call(|conn| Ok(migrate(conn))).await??;
    tracing::info!(parent: &span, schema_version = latest_version(), "contact store ready");
    Ok(Self { conn, span })
  }

  /// Turn the result of a unit of work into an [`Outcome`], logging failures.
  fn settle<T>(&self, operation: &'static str, result: Result<Option<T>>) -> Outcome<T> {
    match result {
      Ok(Some(value)) => {
        tracing::debug!(parent: &self.span, operation, "committed");
        Outcome::Success(value)
      }
      Ok(None) => {
        tracing::debug!(parent: &self.span, operation, "no matching contact");
        Outcome::NotFound
      }
      Err(e) => {
        tracing::error!(parent: &self.span, operation, error = %e, "storage operation failed");
        Outcome::Failure(Failure { operation, reason: e.to_string() })
      }
    }
  }
}

/// Single-row lookup on the primary key.
fn fetch(conn: &rusqlite::Connection, id: ContactId) -> rusqlite::Result<RawContact> {
  conn.query_row(
    &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
    rusqlite::params![id],
    RawContact::from_row,
  )
}

fn decode(raw: Option<RawContact>) -> Result<Option<Contact>> {
  raw.map(RawContact::into_contact).transpose()
}

/// Column values for the editable fields of `input`.
struct EditableColumns {
  salutation:   String,
  first_name:   String,
  last_name:    String,
  display_name: Option<String>,
  birth_date:   Option<String>,
  email:        String,
  phone_number: Option<String>,
}

impl From<ContactInput> for EditableColumns {
  fn from(input: ContactInput) -> Self {
    EditableColumns {
      salutation:   input.salutation,
      first_name:   input.first_name,
      last_name:    input.last_name,
      display_name: input.display_name.filter(|n| !n.is_empty()),
      birth_date:   input.birth_date.map(encode_dt),
      email:        input.email,
      phone_number: input.phone_number,
    }
  }
}

// ─── ContactRepository impl ──────────────────────────────────────────────────

impl ContactRepository for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_all(&self) -> Result<Vec<Contact>> {
    let raws: Vec<RawContact> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn get_by_id(&self, id: ContactId) -> Result<Option<Contact>> {
    let raw = self
      .conn
      .call(move |conn| Ok(fetch(conn, id).optional()?))
      .await?;
    decode(raw)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert(&self, input: ContactInput) -> Outcome<Contact> {
    let cols = EditableColumns::from(input);

    // `id` and both timestamps are left to the database.
    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO contacts (
             salutation, first_name, last_name, display_name,
             birth_date, email, phone_number
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            cols.salutation,
            cols.first_name,
            cols.last_name,
            cols.display_name,
            cols.birth_date,
            cols.email,
            cols.phone_number,
          ],
        )?;
        let stored = fetch(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(Some(stored))
      })
      .await
      .map_err(Error::from)
      .and_then(decode);

    self.settle("insert", result)
  }

  async fn update(&self, id: ContactId, input: ContactInput) -> Outcome<Contact> {
    let cols = EditableColumns::from(input);

    // Salutation, id and the timestamps are never written here; the trigger
    // re-stamps last_change_timestamp.
    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE contacts SET
             first_name   = ?1,
             last_name    = ?2,
             display_name = ?3,
             birth_date   = ?4,
             email        = ?5,
             phone_number = ?6
           WHERE id = ?7",
          rusqlite::params![
            cols.first_name,
            cols.last_name,
            cols.display_name,
            cols.birth_date,
            cols.email,
            cols.phone_number,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let stored = fetch(&tx, id)?;
        tx.commit()?;
        Ok(Some(stored))
      })
      .await
      .map_err(Error::from)
      .and_then(decode);

    self.settle("update", result)
  }

  async fn delete(&self, id: ContactId) -> Outcome<()> {
    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id])?;
        if removed == 0 {
          return Ok(None);
        }
        tx.commit()?;
        Ok(Some(()))
      })
      .await
      .map_err(Error::from);

    self.settle("delete", result)
  }
}
