//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | All contacts |
//! | `POST`   | `/contacts` | Body: [`ContactInput`]; returns 201 + stored contact |
//! | `GET`    | `/contacts/:id` | 404 if not found |
//! | `PUT`    | `/contacts/:id` | Body: [`ContactInput`]; returns the refreshed contact |
//! | `DELETE` | `/contacts/:id` | Returns `true`; 404 if not found |
//!
//! `id` and timestamps in request bodies are ignored.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rolodex_core::{Contact, ContactId, ContactInput, ContactRepository, Outcome};

use crate::error::ApiError;

fn not_found(id: ContactId) -> ApiError { ApiError::NotFound(format!("contact {id}")) }

fn settle<T>(id: Option<ContactId>, outcome: Outcome<T>) -> Result<T, ApiError> {
  match outcome {
    Outcome::Success(v) => Ok(v),
    Outcome::NotFound => Err(id.map_or_else(|| ApiError::NotFound("contact".into()), not_found)),
    Outcome::Failure(f) => Err(ApiError::Storage(f)),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /contacts`
pub async fn list<R>(State(repo): State<Arc<R>>) -> Result<Json<Vec<Contact>>, ApiError>
where
  R: ContactRepository,
{
  let contacts = repo
    .get_all()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(contacts))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/:id`
pub async fn get_one<R>(
  State(repo): State<Arc<R>>,
  Path(id): Path<ContactId>,
) -> Result<Json<Contact>, ApiError>
where
  R: ContactRepository,
{
  let contact = repo
    .get_by_id(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(contact))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contacts` — returns 201 + the stored [`Contact`].
pub async fn create<R>(
  State(repo): State<Arc<R>>,
  Json(body): Json<ContactInput>,
) -> Result<impl IntoResponse, ApiError>
where
  R: ContactRepository,
{
  body.validate()?;
  let contact = settle(None, repo.insert(body).await)?;
  tracing::info!(id = contact.id, "contact created");
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /contacts/:id`
pub async fn update<R>(
  State(repo): State<Arc<R>>,
  Path(id): Path<ContactId>,
  Json(body): Json<ContactInput>,
) -> Result<Json<Contact>, ApiError>
where
  R: ContactRepository,
{
  body.validate()?;
  let contact = settle(Some(id), repo.update(id, body).await)?;
  Ok(Json(contact))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/:id`
pub async fn delete<R>(
  State(repo): State<Arc<R>>,
  Path(id): Path<ContactId>,
) -> Result<Json<bool>, ApiError>
where
  R: ContactRepository,
{
  let deleted = settle(Some(id), repo.delete(id).await.map(|()| true))?;
  tracing::info!(id, "contact deleted");
  Ok(Json(deleted))
}
