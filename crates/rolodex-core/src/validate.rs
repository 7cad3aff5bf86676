//! Field validation for [`ContactInput`].
//!
//! Storage assumes it only ever receives input that passed these checks; the
//! HTTP layer runs them before calling the repository.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
  contact::ContactInput,
  error::{FieldError, ValidationError},
};

/// Minimum length (in characters) of salutation and both name parts.
pub const MIN_NAME_LEN: usize = 2;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Whether `email` has the shape `local@domain.tld`.
pub fn is_email(email: &str) -> bool { EMAIL_RE.is_match(email) }

impl ContactInput {
  /// Check every field and report all failures at once.
  pub fn validate(&self) -> Result<(), ValidationError> {
    let mut fields = Vec::new();

    for (field, value) in [
      ("salutation", &self.salutation),
      ("first_name", &self.first_name),
      ("last_name", &self.last_name),
    ] {
      if value.chars().count() < MIN_NAME_LEN {
        fields.push(FieldError {
          field,
          message: format!("must be at least {MIN_NAME_LEN} characters"),
        });
      }
    }

    if !is_email(&self.email) {
      fields.push(FieldError {
        field:   "email",
        message: "must be a valid email address".into(),
      });
    }

    if fields.is_empty() {
      Ok(())
    } else {
      Err(ValidationError { fields })
    }
  }
}
