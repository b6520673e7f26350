//! Tracks the one request whose response may still be committed.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::query::QueryKey;

/// Handle for one issued request.
///
/// Cloning shares the underlying token, so the spawned task and the registry
/// observe the same cancellation.
#[derive(Debug, Clone)]
pub struct RequestHandle {
  id: u64,
  key: QueryKey,
  token: CancellationToken,
}

impl RequestHandle {
  pub fn id(&self) -> u64 {
    self.id
  }

  pub fn key(&self) -> &QueryKey {
    &self.key
  }

  /// Token the transport races against
  pub fn token(&self) -> CancellationToken {
    self.token.clone()
  }

  pub fn cancel(&self) {
    self.token.cancel();
  }

  pub fn is_cancelled(&self) -> bool {
    self.token.is_cancelled()
  }
}

/// Registry holding at most one live request.
///
/// Registering a new request cancels the previous one. Dropping the registry
/// cancels whatever is still live, so a torn-down view never receives a late
/// update.
#[derive(Debug, Default)]
pub struct CancellationRegistry {
  live: Option<RequestHandle>,
  next_id: u64,
}

impl CancellationRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a request for `key`, superseding the current live one.
  pub fn register(&mut self, key: QueryKey) -> RequestHandle {
    if let Some(previous) = self.live.take() {
      debug!(
        id = previous.id,
        key = %previous.key().digest(),
        "superseding in-flight request"
      );
      previous.cancel();
    }

    self.next_id += 1;
    let handle = RequestHandle {
      id: self.next_id,
      key,
      token: CancellationToken::new(),
    };
    self.live = Some(handle.clone());
    handle
  }

  /// Whether the request with this id may still commit its result
  pub fn is_live(&self, id: u64) -> bool {
    self
      .live
      .as_ref()
      .is_some_and(|live| live.id == id && !live.is_cancelled())
  }

  /// Mark a request as resolved. Returns `true` only if it was the live one,
  /// in which case the registry is left empty.
  pub fn resolve(&mut self, id: u64) -> bool {
    if self.is_live(id) {
      self.live = None;
      true
    } else {
      false
    }
  }

  /// Cancel the live request, returning its key.
  pub fn cancel_live(&mut self) -> Option<QueryKey> {
    self.live.take().map(|handle| {
      handle.cancel();
      handle.key
    })
  }

  pub fn live_key(&self) -> Option<&QueryKey> {
    self.live.as_ref().map(RequestHandle::key)
  }
}

impl Drop for CancellationRegistry {
  fn drop(&mut self) {
    if let Some(key) = self.cancel_live() {
      debug!(key = %key.digest(), "cancelled in-flight request on teardown");
    }
  }
}
