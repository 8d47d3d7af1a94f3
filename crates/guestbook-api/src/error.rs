//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by a greetings handler.
///
/// Every variant is terminal for the request and renders as
/// `{"success": false, "error": <display string>}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Invalid(#[from] guestbook_core::Error),

  #[error("{0}")]
  BadRequest(String),

  #[error("Request body too large")]
  PayloadTooLarge,

  #[error("Too many requests")]
  RateLimited { retry_after_secs: u64 },

  #[error("Duplicate submission detected")]
  Duplicate,

  #[error("Not found")]
  NotFound,

  #[error("Method not allowed")]
  MethodNotAllowed,

  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Store(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Invalid(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::RateLimited { .. } | ApiError::Duplicate => {
        StatusCode::TOO_MANY_REQUESTS
      }
      ApiError::NotFound => StatusCode::NOT_FOUND,
      ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = Json(json!({ "success": false, "error": self.to_string() }));
    let mut res = (status, body).into_response();

    if let ApiError::RateLimited { retry_after_secs } = self {
      res
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
    }
    res
  }
}
