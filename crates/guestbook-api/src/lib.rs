//! HTTP service for the guestbook.
//!
//! Exposes an axum [`Router`] serving `/api/greetings`, backed by any
//! [`GreetingStore`]. The service holds no mutable state of its own: rate
//! limits and duplicate checks are store queries, so several instances can
//! share one database. The check and the insert are separate store calls,
//! so requests racing in parallel from one address can each pass the check;
//! the limits are exact for sequential traffic only.

pub mod client_ip;
pub mod error;
pub mod greetings;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  body::Body,
  extract::{DefaultBodyLimit, Request, State},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
  routing::any,
};
use guestbook_core::store::GreetingStore;
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// The one route this service answers.
pub const GREETINGS_PATH: &str = "/api/greetings";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Abuse-guard and listing parameters.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GuardConfig {
  /// Submissions allowed per address inside the rate-limit window.
  pub rate_limit_max:         u64,
  pub rate_limit_window_secs: u64,
  /// How far back a repeated message counts as a duplicate.
  pub duplicate_window_secs:  u64,
  /// Maximum number of greetings returned by `GET`.
  pub list_limit:             usize,
}

impl GuardConfig {
  pub fn rate_limit_window_millis(&self) -> i64 {
    secs_to_millis(self.rate_limit_window_secs)
  }

  pub fn duplicate_window_millis(&self) -> i64 {
    secs_to_millis(self.duplicate_window_secs)
  }
}

fn secs_to_millis(secs: u64) -> i64 {
  i64::try_from(secs).unwrap_or(i64::MAX).saturating_mul(1000)
}

impl Default for GuardConfig {
  fn default() -> Self {
    Self {
      rate_limit_max:         5,
      rate_limit_window_secs: 60,
      duplicate_window_secs:  300,
      list_limit:             100,
    }
  }
}

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Header holding the real client address behind a trusted proxy. Off by
  /// default: clients can set any header, so only enable this when a proxy
  /// in front of the server overwrites it. Empty or absent means the TCP
  /// peer address is used.
  pub client_ip_header: Option<String>,
  pub guard:            GuardConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8787,
      store_path:       PathBuf::from("greetings.sqlite"),
      client_ip_header: None,
      guard:            GuardConfig::default(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: GreetingStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the greeting service.
///
/// Every response, including 404/405 and preflight, carries permissive
/// cross-origin headers.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: GreetingStore + Clone + 'static,
{
  Router::new()
    .route(GREETINGS_PATH, any(greetings_handler::<S>))
    // Preflight is only answered on the greetings route; elsewhere it is a 404.
    .fallback(not_found)
    .layer(
      ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(greetings::MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
          header::ACCESS_CONTROL_ALLOW_ORIGIN,
          HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
          header::ACCESS_CONTROL_ALLOW_METHODS,
          HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
          header::ACCESS_CONTROL_ALLOW_HEADERS,
          HeaderValue::from_static("Content-Type"),
        )),
    )
    .with_state(state)
}

// ─── Route handlers ──────────────────────────────────────────────────────────

async fn greetings_handler<S>(
  State(state): State<AppState<S>>,
  req: Request<Body>,
) -> Response
where
  S: GreetingStore + Clone + 'static,
{
  let method = req.method().clone();
  match method.as_str() {
    // Preflight: empty body, no store access.
    "OPTIONS" => StatusCode::OK.into_response(),
    "GET" => greetings::list(&state).await.into_response_or_err(),
    "POST" => greetings::create(&state, req).await.into_response_or_err(),
    _ => ApiError::MethodNotAllowed.into_response(),
  }
}

async fn not_found() -> Response { ApiError::NotFound.into_response() }

trait IntoResponseOrErr {
  fn into_response_or_err(self) -> Response;
}

impl<T: IntoResponse> IntoResponseOrErr for Result<T, ApiError> {
  fn into_response_or_err(self) -> Response {
    match self {
      Ok(r)  => r.into_response(),
      Err(e) => e.into_response(),
    }
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
