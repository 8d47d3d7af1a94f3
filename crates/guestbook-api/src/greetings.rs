//! Handlers for `/api/greetings`.
//!
//! | Method | Notes |
//! |--------|-------|
//! | `GET`  | Latest greetings, newest first |
//! | `POST` | Body: `{"name":"...","message":"..."}`; returns 201 + stored greeting |
//!
//! A submission passes through a fixed gate before anything is written:
//! rate limit, field presence, length, content denylist, duplicate check.
//! The first failing step produces the response.

use axum::{
  Json,
  body::Body,
  extract::{
    FromRequest as _, Request,
    rejection::{BytesRejection, FailedToBufferBody},
  },
  http::StatusCode,
};
use bytes::Bytes;
use chrono::Utc;
use guestbook_core::{
  greeting::{Greeting, NewGreeting},
  store::GreetingStore,
  validate::{is_duplicate, validate},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, GuardConfig, client_ip::client_address, error::ApiError};

/// Upper bound on a POST body; a valid submission is far smaller. Enforced by
/// the router's `DefaultBodyLimit`.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// ─── Response envelopes ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub success:   bool,
  pub greetings: Vec<Greeting>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
  pub success:  bool,
  pub greeting: Greeting,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/greetings`
pub async fn list<S>(state: &AppState<S>) -> Result<Json<ListResponse>, ApiError>
where
  S: GreetingStore,
{
  let greetings = state
    .store
    .list_recent(state.config.guard.list_limit)
    .await
    .map_err(|e| {
      tracing::error!(error = %e, "failed to list greetings");
      ApiError::store(e)
    })?;

  Ok(Json(ListResponse { success: true, greetings }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default)]
  pub name:    Option<String>,
  #[serde(default)]
  pub message: Option<String>,
}

/// `POST /api/greetings` — body: `{"name":"Sam","message":"Congrats!"}`
pub async fn create<S>(
  state: &AppState<S>,
  req: Request<Body>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError>
where
  S: GreetingStore,
{
  let (parts, body) = req.into_parts();
  let ip = client_address(&parts, state.config.client_ip_header.as_deref());
  let guard = &state.config.guard;
  let now = now_millis();

  check_rate_limit(&*state.store, &ip, now, guard).await?;

  let body: CreateBody =
    parse_body(collect_body(Request::from_parts(parts, body)).await?)?;
  let submission = validate(
    body.name.as_deref().unwrap_or_default(),
    body.message.as_deref().unwrap_or_default(),
  )
  .inspect_err(|e| tracing::warn!(%ip, error = %e, "rejected greeting"))?;

  check_duplicate(&*state.store, &ip, &submission.message, now, guard).await?;

  let greeting = state
    .store
    .insert(NewGreeting {
      name:       submission.name,
      message:    submission.message,
      timestamp:  now_millis(),
      ip_address: ip,
    })
    .await
    .map_err(|e| {
      tracing::error!(error = %e, "failed to store greeting");
      ApiError::store(e)
    })?;

  tracing::info!(id = greeting.id, name = %greeting.name, "greeting accepted");

  Ok((
    StatusCode::CREATED,
    Json(CreatedResponse { success: true, greeting }),
  ))
}

// ─── Gate steps ───────────────────────────────────────────────────────────────

fn now_millis() -> i64 { Utc::now().timestamp_millis() }

/// Reject once `ip` has `rate_limit_max` submissions inside the window.
///
/// A failing count query lets the request through.
async fn check_rate_limit<S>(
  store: &S,
  ip: &str,
  now: i64,
  guard: &GuardConfig,
) -> Result<(), ApiError>
where
  S: GreetingStore,
{
  let since = now - guard.rate_limit_window_millis();
  match store.count_since(ip, since).await {
    Ok(count) if count >= guard.rate_limit_max => {
      tracing::warn!(%ip, count, "rate limit exceeded");
      Err(ApiError::RateLimited {
        retry_after_secs: guard.rate_limit_window_secs,
      })
    }
    Ok(_) => Ok(()),
    Err(e) => {
      tracing::warn!(%ip, error = %e, "rate limit check failed, allowing request");
      Ok(())
    }
  }
}

/// Reject when `message` repeats the caller's latest greeting inside the
/// duplicate window.
///
/// A failing lookup lets the request through.
async fn check_duplicate<S>(
  store: &S,
  ip: &str,
  message: &str,
  now: i64,
  guard: &GuardConfig,
) -> Result<(), ApiError>
where
  S: GreetingStore,
{
  let since = now - guard.duplicate_window_millis();
  match store.most_recent_from(ip, since).await {
    Ok(Some(previous)) if is_duplicate(&previous.message, message) => {
      tracing::warn!(%ip, previous_id = previous.id, "duplicate submission");
      Err(ApiError::Duplicate)
    }
    Ok(_) => Ok(()),
    Err(e) => {
      tracing::warn!(%ip, error = %e, "duplicate check failed, allowing request");
      Ok(())
    }
  }
}

async fn collect_body(req: Request<Body>) -> Result<Bytes, ApiError> {
  Bytes::from_request(req, &()).await.map_err(|rejection| match rejection {
    BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
      ApiError::PayloadTooLarge
    }
    other => {
      tracing::warn!(error = %other, "failed to read request body");
      ApiError::BadRequest(format!("Failed to read request body: {other}"))
    }
  })
}

fn parse_body(bytes: Bytes) -> Result<CreateBody, ApiError> {
  serde_json::from_slice(&bytes)
    .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))
}
