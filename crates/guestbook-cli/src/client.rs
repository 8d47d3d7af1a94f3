//! Async HTTP client wrapping the guestbook JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use guestbook_core::greeting::Greeting;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

/// Async HTTP client for `/api/greetings`.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

#[derive(Deserialize)]
struct ListEnvelope {
  greetings: Vec<Greeting>,
}

#[derive(Deserialize)]
struct CreatedEnvelope {
  greeting: Greeting,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
  error: String,
}

#[derive(Serialize)]
struct CreateBody<'a> {
  name:    &'a str,
  message: &'a str,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self) -> String {
    format!("{}/api/greetings", self.base_url.trim_end_matches('/'))
  }

  /// `GET /api/greetings`
  pub async fn list_greetings(&self) -> Result<Vec<Greeting>> {
    let resp = self
      .client
      .get(self.url())
      .send()
      .await
      .context("GET /api/greetings failed")?;

    let resp = error_for_status(resp, "GET /api/greetings").await?;
    let envelope: ListEnvelope = resp.json().await.context("deserialising greetings")?;
    Ok(envelope.greetings)
  }

  /// `POST /api/greetings`
  pub async fn post_greeting(&self, name: &str, message: &str) -> Result<Greeting> {
    let resp = self
      .client
      .post(self.url())
      .json(&CreateBody { name, message })
      .send()
      .await
      .context("POST /api/greetings failed")?;

    let resp = error_for_status(resp, "POST /api/greetings").await?;
    let envelope: CreatedEnvelope =
      resp.json().await.context("deserialising created greeting")?;
    Ok(envelope.greeting)
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn error_for_status(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }

  let text = resp.text().await.unwrap_or_default();
  let detail = serde_json::from_str::<ErrorEnvelope>(&text)
    .map(|e| e.error)
    .unwrap_or(text);
  Err(anyhow!("{what} → {status}: {detail}"))
}
