//! Error types for `rolodex-core`.

use serde::Serialize;
use thiserror::Error;

/// A single offending input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

/// Returned by [`ContactInput::validate`](crate::ContactInput::validate) when
/// one or more fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid contact: {}", summary(.fields))]
pub struct ValidationError {
  pub fields: Vec<FieldError>,
}

impl ValidationError {
  pub fn has_field(&self, field: &str) -> bool {
    self.fields.iter().any(|f| f.field == field)
  }
}

fn summary(fields: &[FieldError]) -> String {
  fields
    .iter()
    .map(|f| format!("{}: {}", f.field, f.message))
    .collect::<Vec<_>>()
    .join("; ")
}
