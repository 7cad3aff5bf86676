//! The `ContactRepository` trait and its result type.
//!
//! The trait is implemented by storage backends (e.g. `rolodex-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::contact::{Contact, ContactId, ContactInput};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of a mutating repository call.
///
/// Mutations never return an error: storage faults are logged by the backend
/// and reported as [`Outcome::Failure`], so callers can tell "done" apart
/// from "silently failed" without handling backend error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
  /// The unit of work committed.
  Success(T),
  /// No row with the requested id exists; nothing was changed.
  NotFound,
  /// The storage layer rejected or failed the unit of work.
  Failure(Failure),
}

/// Why a unit of work did not commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
  /// Repository operation that failed, e.g. `"insert"`.
  pub operation: &'static str,
  pub reason:    String,
}

impl std::fmt::Display for Failure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} failed: {}", self.operation, self.reason)
  }
}

impl<T> Outcome<T> {
  pub fn is_success(&self) -> bool { matches!(self, Self::Success(_)) }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound) }

  pub fn success(self) -> Option<T> {
    match self {
      Self::Success(v) => Some(v),
      _ => None,
    }
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
    match self {
      Self::Success(v) => Outcome::Success(f(v)),
      Self::NotFound => Outcome::NotFound,
      Self::Failure(e) => Outcome::Failure(e),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The only boundary through which the rest of the system touches contact
/// storage.
///
/// Each call is its own unit of work. There is no optimistic concurrency
/// control: two concurrent updates of the same row both commit and the last
/// one wins.
pub trait ContactRepository: Send + Sync {
  /// Error type for read failures (connectivity, corrupt rows).
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every stored contact. Empty when the table is empty.
  fn get_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// The contact with `id`, or `None`.
  fn get_by_id(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Persist a new contact and return it as stored, with the id and both
  /// timestamps assigned by storage.
  fn insert(
    &self,
    input: ContactInput,
  ) -> impl Future<Output = Outcome<Contact>> + Send + '_;

  /// Copy the editable fields of `input` onto the contact with `id` and
  /// return the refreshed record.
  ///
  /// Salutation, id and both timestamps are never written by an update; the
  /// last-change timestamp is re-stamped by storage itself.
  fn update(
    &self,
    id: ContactId,
    input: ContactInput,
  ) -> impl Future<Output = Outcome<Contact>> + Send + '_;

  /// Hard-delete the contact with `id`.
  fn delete(&self, id: ContactId) -> impl Future<Output = Outcome<()>> + Send + '_;
}
