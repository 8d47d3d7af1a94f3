//! Resolution of the submitting client's network address.

use std::net::SocketAddr;

use axum::{extract::ConnectInfo, http::request::Parts};

/// Address recorded when neither a trusted header nor the peer is known.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the caller's address.
///
/// Preference order: the first entry of `trusted_header` (if configured and
/// present), then the TCP peer from [`ConnectInfo`], then
/// [`UNKNOWN_CLIENT`].
pub fn client_address(parts: &Parts, trusted_header: Option<&str>) -> String {
  if let Some(name) = trusted_header.filter(|n| !n.is_empty())
    && let Some(value) = parts.headers.get(name).and_then(|v| v.to_str().ok())
    && let Some(first) = value.split(',').map(str::trim).find(|s| !s.is_empty())
  {
    return first.to_owned();
  }

  parts
    .extensions
    .get::<ConnectInfo<SocketAddr>>()
    .map(|ConnectInfo(addr)| addr.ip().to_string())
    .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned())
}
