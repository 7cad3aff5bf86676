//! JSON REST API for Rolodex.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rolodex_core::ContactRepository`]. TLS, CORS and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = rolodex_api::api_router(Arc::new(store));
//! ```

pub mod contacts;
pub mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use rolodex_core::ContactRepository;

pub use error::ApiError;

/// Build the contacts router for `repo`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R>(repo: Arc<R>) -> Router<()>
where
  R: ContactRepository + 'static,
{
  Router::new()
    .route("/contacts", get(contacts::list::<R>).post(contacts::create::<R>))
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<R>)
        .put(contacts::update::<R>)
        .delete(contacts::delete::<R>),
    )
    .with_state(repo)
}
