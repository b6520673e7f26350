use thiserror::Error;

/// Failure of a single page request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
  /// The request was superseded or its view torn down. Never surfaced.
  #[error("request cancelled")]
  Cancelled,

  #[error("network error: {0}")]
  Transport(String),

  #[error("server returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("unexpected response: {0}")]
  Decode(String),
}

impl FetchError {
  pub fn is_cancellation(&self) -> bool {
    matches!(self, FetchError::Cancelled)
  }
}
