//! Debounced input funnel.
//!
//! Holds back a rapidly changing value (typically the search box) until it
//! has been quiet for a fixed delay. The caller polls it from its event loop
//! tick, the same way views poll their queries.

use std::time::Duration;
use tokio::time::Instant;

/// Default quiet period for search input
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
struct Pending<T> {
  value: T,
  deadline: Instant,
}

/// Collapses bursts of updates into a single settled value.
///
/// Every [`push`](Debouncer::push) restarts the quiet window. Once the
/// window elapses, [`poll`](Debouncer::poll) yields the last pushed value
/// exactly once.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
  delay: Duration,
  pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
    }
  }

  /// Record a new raw value and restart the quiet window.
  pub fn push(&mut self, value: T) {
    self.push_at(value, Instant::now());
  }

  fn push_at(&mut self, value: T, now: Instant) {
    self.pending = Some(Pending {
      value,
      deadline: now + self.delay,
    });
  }

  pub fn is_pending(&self) -> bool {
    self.pending.is_some()
  }

  /// Take the settled value if the quiet window has elapsed.
  pub fn poll(&mut self) -> Option<T> {
    self.poll_at(Instant::now())
  }

  fn poll_at(&mut self, now: Instant) -> Option<T> {
    match &self.pending {
      Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.value),
      _ => None,
    }
  }

  /// Settle the pending value immediately (e.g. the user pressed Enter).
  pub fn flush(&mut self) -> Option<T> {
    self.pending.take().map(|p| p.value)
  }
}

impl<T> Default for Debouncer<T> {
  fn default() -> Self {
    Self::new(DEFAULT_DELAY)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const D: Duration = Duration::from_millis(500);

  #[test]
  fn test_nothing_before_delay() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(D);
    debouncer.push_at("m", start);

    assert_eq!(debouncer.poll_at(start + Duration::from_millis(499)), None);
    assert!(debouncer.is_pending());
  }

  #[test]
  fn test_emits_once_after_quiet_period() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(D);
    debouncer.push_at("milk", start);

    assert_eq!(debouncer.poll_at(start + D), Some("milk"));
    assert_eq!(debouncer.poll_at(start + D * 2), None);
    assert!(!debouncer.is_pending());
  }

  #[test]
  fn test_burst_collapses_to_last_value() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(D);
    let step = Duration::from_millis(100);

    debouncer.push_at("m".to_string(), start);
    debouncer.push_at("mi".to_string(), start + step);
    debouncer.push_at("mil".to_string(), start + step * 2);
    debouncer.push_at("milk".to_string(), start + step * 3);

    // 500ms after the first key, but only 200ms after the last one
    assert_eq!(debouncer.poll_at(start + D), None);
    assert_eq!(
      debouncer.poll_at(start + step * 3 + D),
      Some("milk".to_string())
    );
  }

  #[test]
  fn test_flush_settles_immediately() {
    let mut debouncer = Debouncer::new(D);
    debouncer.push("bread");
    assert_eq!(debouncer.flush(), Some("bread"));
    assert_eq!(debouncer.flush(), None);
    assert_eq!(debouncer.poll(), None);
    assert!(!debouncer.is_pending());
  }
}
