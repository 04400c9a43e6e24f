use std::time::{
  Duration,
  Instant,
};

use crate::TimerQueue;

/// Trailing-edge debounce over a fixed quiet window.
///
/// Each trigger resets its slot's deadline, so a burst of triggers for the
/// same kind collapses into a single fire once the window has been quiet.
/// Distinct kinds debounce independently.
pub struct Debounce<K> {
  window: Duration,
  slots:  TimerQueue<K, ()>,
}

impl<K: PartialEq> Debounce<K> {
  pub fn new(window: Duration) -> Self {
    Self {
      window,
      slots: TimerQueue::new(),
    }
  }

  pub fn window(&self) -> Duration {
    self.window
  }

  /// Arm (or re-arm) the slot for `key`.
  pub fn trigger(&mut self, key: K, now: Instant) {
    self.slots.schedule(key, now + self.window, ());
  }

  pub fn cancel(&mut self, key: &K) {
    self.slots.cancel(key);
  }

  pub fn is_idle(&self) -> bool {
    self.slots.is_empty()
  }

  pub fn next_deadline(&self) -> Option<Instant> {
    self.slots.next_deadline()
  }

  /// Return every kind whose quiet window has elapsed at `now`.
  pub fn fire(&mut self, now: Instant) -> Vec<K> {
    self
      .slots
      .poll(now)
      .into_iter()
      .map(|(key, ())| key)
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const WINDOW: Duration = Duration::from_millis(100);

  #[test]
  fn a_burst_coalesces_into_one_trailing_fire() {
    let start = Instant::now();
    let mut debounce = Debounce::new(WINDOW);
    debounce.trigger("size", start);
    debounce.trigger("size", start + Duration::from_millis(40));
    debounce.trigger("size", start + Duration::from_millis(80));

    // The first two deadlines have passed but were superseded.
    assert!(debounce.fire(start + Duration::from_millis(150)).is_empty());
    assert_eq!(
      debounce.fire(start + Duration::from_millis(180)),
      vec!["size"]
    );
    assert!(debounce.is_idle());
  }

  #[test]
  fn kinds_debounce_independently() {
    let start = Instant::now();
    let mut debounce = Debounce::new(WINDOW);
    debounce.trigger("size", start);
    debounce.trigger("styles", start + Duration::from_millis(50));

    assert_eq!(debounce.fire(start + Duration::from_millis(110)), vec![
      "size"
    ]);
    assert_eq!(debounce.fire(start + Duration::from_millis(160)), vec![
      "styles"
    ]);
  }

  #[test]
  fn cancel_disarms_a_pending_slot() {
    let start = Instant::now();
    let mut debounce = Debounce::new(WINDOW);
    debounce.trigger("pos", start);
    debounce.cancel(&"pos");
    assert!(debounce.fire(start + Duration::from_millis(200)).is_empty());
  }
}
