//! The contact record and its client-editable input.
//!
//! A [`Contact`] is only ever produced by a storage backend: its id and both
//! timestamps come from the database. Clients send a [`ContactInput`], which
//! has no room for those fields at all.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::birthday::birthday_soon;

/// Server-assigned primary key.
pub type ContactId = i64;

// ─── Stored record ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
  pub id:                    ContactId,
  pub salutation:            String,
  pub first_name:            String,
  pub last_name:             String,
  /// Explicit display name. `None` (or empty) means "compute on read".
  pub display_name_override: Option<String>,
  pub birth_date:            Option<DateTime<Utc>>,
  pub email:                 String,
  pub phone_number:          Option<String>,
  /// Stamped by the database at insert; never changes.
  pub creation_timestamp:    DateTime<Utc>,
  /// Stamped by the database at insert and by trigger on every update.
  pub last_change_timestamp: DateTime<Utc>,
}

impl Contact {
  /// The override if one is set, otherwise `"{salutation} {first} {last}"`.
  pub fn display_name(&self) -> String {
    resolve_display_name(
      self.display_name_override.as_deref(),
      &self.salutation,
      &self.first_name,
      &self.last_name,
    )
  }

  pub fn set_display_name(&mut self, name: Option<String>) {
    self.display_name_override = name;
  }

  /// Assign a birth date in any timezone; it is stored as UTC.
  pub fn set_birth_date<Tz: TimeZone>(&mut self, birth_date: Option<DateTime<Tz>>) {
    self.birth_date = birth_date.map(|d| d.with_timezone(&Utc));
  }

  /// `None` when no birth date is known, otherwise whether the next birthday
  /// falls within the coming two weeks (local calendar).
  pub fn notify_has_birthday_soon(&self) -> Option<bool> {
    self.notify_has_birthday_soon_on(Local::now().date_naive())
  }

  pub fn notify_has_birthday_soon_on(&self, today: chrono::NaiveDate) -> Option<bool> {
    self.birth_date.map(|birth_date| birthday_soon(birth_date, today))
  }
}

fn resolve_display_name(
  display_override: Option<&str>,
  salutation: &str,
  first_name: &str,
  last_name: &str,
) -> String {
  match display_override {
    Some(name) if !name.is_empty() => name.to_owned(),
    _ => format!("{salutation} {first_name} {last_name}"),
  }
}

/// Wire shape of a [`Contact`], including the derived fields.
#[derive(Serialize)]
struct ContactWire<'a> {
  id:                       ContactId,
  salutation:               &'a str,
  first_name:               &'a str,
  last_name:                &'a str,
  display_name:             String,
  birth_date:               Option<DateTime<Utc>>,
  email:                    &'a str,
  phone_number:             Option<&'a str>,
  creation_timestamp:       DateTime<Utc>,
  last_change_timestamp:    DateTime<Utc>,
  notify_has_birthday_soon: Option<bool>,
}

impl Serialize for Contact {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    ContactWire {
      id:                       self.id,
      salutation:               &self.salutation,
      first_name:               &self.first_name,
      last_name:                &self.last_name,
      display_name:             self.display_name(),
      birth_date:               self.birth_date,
      email:                    &self.email,
      phone_number:             self.phone_number.as_deref(),
      creation_timestamp:       self.creation_timestamp,
      last_change_timestamp:    self.last_change_timestamp,
      notify_has_birthday_soon: self.notify_has_birthday_soon(),
    }
    .serialize(serializer)
  }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// The fields a client may set on create or update.
///
/// Unknown JSON keys (`id`, `creation_timestamp`, ...) are ignored, so a
/// client can never choose an id or forge a timestamp. `birth_date` accepts
/// any RFC 3339 offset and is normalised to UTC on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactInput {
  pub salutation:   String,
  pub first_name:   String,
  pub last_name:    String,
  #[serde(default)]
  pub display_name: Option<String>,
  #[serde(default)]
  pub birth_date:   Option<DateTime<Utc>>,
  pub email:        String,
  #[serde(default)]
  pub phone_number: Option<String>,
}

impl ContactInput {
  pub fn new(
    salutation: impl Into<String>,
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      salutation:   salutation.into(),
      first_name:   first_name.into(),
      last_name:    last_name.into(),
      display_name: None,
      birth_date:   None,
      email:        email.into(),
      phone_number: None,
    }
  }

  pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
    self.display_name = Some(name.into());
    self
  }

  /// Set the birth date from any timezone; stored as UTC.
  pub fn with_birth_date<Tz: TimeZone>(mut self, birth_date: DateTime<Tz>) -> Self {
    self.birth_date = Some(birth_date.with_timezone(&Utc));
    self
  }

  pub fn with_phone_number(mut self, phone: impl Into<String>) -> Self {
    self.phone_number = Some(phone.into());
    self
  }

  /// What [`Contact::display_name`] would return for a record built from
  /// this input.
  pub fn display_name(&self) -> String {
    resolve_display_name(
      self.display_name.as_deref(),
      &self.salutation,
      &self.first_name,
      &self.last_name,
    )
  }
}
