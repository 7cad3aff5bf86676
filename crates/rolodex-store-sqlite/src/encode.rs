//! Encoding and decoding helpers between [`Contact`] and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 UTC strings.

use chrono::{DateTime, SecondsFormat, Utc};
use rolodex_core::{Contact, ContactId};

use crate::{Error, Result};

/// Column list shared by every SELECT; order matches [`RawContact::from_row`].
pub const CONTACT_COLUMNS: &str = "id, salutation, first_name, last_name, display_name, \
   birth_date, email, phone_number, creation_timestamp, last_change_timestamp";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `contacts` row.
#[derive(Debug)]
pub struct RawContact {
  pub id:                    ContactId,
  pub salutation:            String,
  pub first_name:            String,
  pub last_name:             String,
  pub display_name:          Option<String>,
  pub birth_date:            Option<String>,
  pub email:                 String,
  pub phone_number:          Option<String>,
  pub creation_timestamp:    String,
  pub last_change_timestamp: String,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawContact {
      id:                    row.get(0)?,
      salutation:            row.get(1)?,
      first_name:            row.get(2)?,
      last_name:             row.get(3)?,
      display_name:          row.get(4)?,
      birth_date:            row.get(5)?,
      email:                 row.get(6)?,
      phone_number:          row.get(7)?,
      creation_timestamp:    row.get(8)?,
      last_change_timestamp: row.get(9)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:                    self.id,
      salutation:            self.salutation,
      first_name:            self.first_name,
      last_name:             self.last_name,
      display_name_override: self.display_name,
      birth_date:            self.birth_date.as_deref().map(decode_dt).transpose()?,
      email:                 self.email,
      phone_number:          self.phone_number,
      creation_timestamp:    decode_dt(&self.creation_timestamp)?,
      last_change_timestamp: decode_dt(&self.last_change_timestamp)?,
    })
  }
}
