//! Runtime support types referenced by generated client code.

mod paging;
mod polling;

use std::fmt::Display;

use http::HeaderMap;

pub use paging::{NextPageFetcher, Page, PageFetcher, PageFuture, PageIterator, Pager, SyncNextPageFetcher, SyncPageFetcher};
pub use polling::{Activation, Poller, PollingStrategy, SyncActivation, SyncPoller};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by generated client methods.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("required argument `{0}` was not provided")]
  InvalidArgument(String),
  #[error("unexpected HTTP status {0}")]
  HttpStatus(u16),
  #[error("transport failure: {0}")]
  Transport(String),
  #[error("failed to deserialize response body: {0}")]
  Deserialize(String),
  #[error("long-running operation failed: {0}")]
  Polling(String),
}

impl Error {
  #[must_use]
  pub fn invalid_argument(name: &str) -> Self {
    Error::InvalidArgument(name.to_string())
  }

  #[must_use]
  pub fn http_status(status: u16) -> Self {
    Error::HttpStatus(status)
  }

  pub fn transport(source: impl Display) -> Self {
    Error::Transport(source.to_string())
  }

  pub fn deserialize(source: impl Display) -> Self {
    Error::Deserialize(source.to_string())
  }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for Error {
  fn from(error: reqwest::Error) -> Self {
    Error::Transport(error.to_string())
  }
}

/// Per-call context: cancellation/tracing metadata threaded through every
/// generated overload that accepts one.
#[derive(Debug, Clone, Default)]
pub struct Context {
  values: Vec<(String, String)>,
}

impl Context {
  /// The no-context sentinel used when the caller omitted the parameter.
  #[must_use]
  pub fn none() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.values.push((key.into(), value.into()));
    self
  }

  #[must_use]
  pub fn value(&self, key: &str) -> Option<&str> {
    self
      .values
      .iter()
      .rev()
      .find(|(existing, _)| existing == key)
      .map(|(_, value)| value.as_str())
  }
}

/// Response envelope carrying status, headers, and the typed body.
#[derive(Debug, Clone)]
pub struct Response<T> {
  status: u16,
  headers: HeaderMap,
  body: T,
}

impl<T> Response<T> {
  pub fn new(status: u16, headers: HeaderMap, body: T) -> Self {
    Self { status, headers, body }
  }

  #[must_use]
  pub fn status(&self) -> u16 {
    self.status
  }

  #[must_use]
  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  #[must_use]
  pub fn body(&self) -> &T {
    &self.body
  }

  pub fn into_body(self) -> T {
    self.body
  }

  /// Reshapes the body, keeping status and headers.
  pub fn map_body<U>(self, transform: impl FnOnce(T) -> U) -> Response<U> {
    Response {
      status: self.status,
      headers: self.headers,
      body: transform(self.body),
    }
  }
}

/// Response envelope with a deserialized-headers model attached.
#[derive(Debug, Clone)]
pub struct HeadersResponse<H, T> {
  response: Response<T>,
  deserialized_headers: H,
}

impl<H, T> HeadersResponse<H, T> {
  pub fn new(response: Response<T>, deserialized_headers: H) -> Self {
    Self {
      response,
      deserialized_headers,
    }
  }

  #[must_use]
  pub fn deserialized_headers(&self) -> &H {
    &self.deserialized_headers
  }

  #[must_use]
  pub fn response(&self) -> &Response<T> {
    &self.response
  }

  pub fn into_body(self) -> T {
    self.response.into_body()
  }
}

/// Bearer-token credential handed to generated service clients.
#[derive(Debug, Clone)]
pub struct TokenCredential {
  token: String,
}

impl TokenCredential {
  #[must_use]
  pub fn new(token: impl Into<String>) -> Self {
    Self { token: token.into() }
  }

  #[must_use]
  pub fn token(&self) -> &str {
    &self.token
  }
}

/// Shared-key credential; converted to a bearer shape at the transport seam.
#[derive(Debug, Clone)]
pub struct KeyCredential {
  key: String,
}

impl KeyCredential {
  #[must_use]
  pub fn new(key: impl Into<String>) -> Self {
    Self { key: key.into() }
  }

  #[must_use]
  pub fn into_token(self) -> TokenCredential {
    TokenCredential::new(self.key)
  }
}

const BASE64_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Standard (padded) Base64, for byte-array parameters carried in string
/// locations.
#[must_use]
pub fn base64_encode(bytes: &[u8]) -> String {
  let mut encoded = String::with_capacity(bytes.len().div_ceil(3) * 4);
  for chunk in bytes.chunks(3) {
    let b0 = chunk[0] as u32;
    let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
    let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
    let triple = (b0 << 16) | (b1 << 8) | b2;

    encoded.push(BASE64_ALPHABET[(triple >> 18) as usize & 0x3f] as char);
    encoded.push(BASE64_ALPHABET[(triple >> 12) as usize & 0x3f] as char);
    encoded.push(if chunk.len() > 1 {
      BASE64_ALPHABET[(triple >> 6) as usize & 0x3f] as char
    } else {
      '='
    });
    encoded.push(if chunk.len() > 2 {
      BASE64_ALPHABET[triple as usize & 0x3f] as char
    } else {
      '='
    });
  }
  encoded
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_base64_known_vectors() {
    assert_eq!(base64_encode(b""), "");
    assert_eq!(base64_encode(b"f"), "Zg==");
    assert_eq!(base64_encode(b"fo"), "Zm8=");
    assert_eq!(base64_encode(b"foo"), "Zm9v");
    assert_eq!(base64_encode(b"foobar"), "Zm9vYmFy");
  }

  #[test]
  fn test_context_last_value_wins() {
    let context = Context::none().with_value("tenant", "a").with_value("tenant", "b");
    assert_eq!(context.value("tenant"), Some("b"));
    assert_eq!(context.value("missing"), None);
  }

  #[test]
  fn test_response_map_body_keeps_envelope() {
    let response = Response::new(200, HeaderMap::new(), 41);
    let mapped = response.map_body(|value| value + 1);
    assert_eq!(mapped.status(), 200);
    assert_eq!(*mapped.body(), 42);
  }
}
