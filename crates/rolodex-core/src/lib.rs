//! Core types and trait definitions for the Rolodex contact service.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`repository::ContactRepository`]; the HTTP layer consumes it.

pub mod birthday;
pub mod contact;
pub mod error;
pub mod repository;
pub mod validate;

pub use contact::{Contact, ContactId, ContactInput};
pub use error::{FieldError, ValidationError};
pub use repository::{ContactRepository, Failure, Outcome};
