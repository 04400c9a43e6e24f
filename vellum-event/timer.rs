use std::time::Instant;

/// A keyed timer queue with cancel-and-replace semantics.
///
/// Scheduling under an existing key drops the previous entry, so each key
/// holds at most one pending deadline. The owner drives the queue by
/// calling [`TimerQueue::poll`] with the current time; nothing fires on its
/// own.
pub struct TimerQueue<K, V> {
  entries: Vec<Entry<K, V>>,
}

struct Entry<K, V> {
  key:      K,
  deadline: Instant,
  value:    V,
}

impl<K: PartialEq, V> TimerQueue<K, V> {
  pub fn new() -> Self {
    Self {
      entries: Vec::new(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Schedule `value` to come due at `deadline`, replacing any pending
  /// entry under the same key.
  pub fn schedule(&mut self, key: K, deadline: Instant, value: V) {
    self.cancel(&key);
    self.entries.push(Entry {
      key,
      deadline,
      value,
    });
  }

  /// Remove the pending entry for `key`, returning its value.
  pub fn cancel(&mut self, key: &K) -> Option<V> {
    let index = self.entries.iter().position(|entry| &entry.key == key)?;
    Some(self.entries.remove(index).value)
  }

  pub fn deadline(&self, key: &K) -> Option<Instant> {
    self
      .entries
      .iter()
      .find(|entry| &entry.key == key)
      .map(|entry| entry.deadline)
  }

  /// The earliest pending deadline, for owners that want to sleep rather
  /// than spin.
  pub fn next_deadline(&self) -> Option<Instant> {
    self.entries.iter().map(|entry| entry.deadline).min()
  }

  /// Remove and return every entry due at `now`, in deadline order.
  pub fn poll(&mut self, now: Instant) -> Vec<(K, V)> {
    let mut due = Vec::new();
    let mut index = 0;
    while index < self.entries.len() {
      if self.entries[index].deadline <= now {
        due.push(self.entries.remove(index));
      } else {
        index += 1;
      }
    }
    due.sort_by(|a, b| a.deadline.cmp(&b.deadline));
    due.into_iter().map(|entry| (entry.key, entry.value)).collect()
  }
}

impl<K: PartialEq, V> Default for TimerQueue<K, V> {
  fn default() -> Self {
    Self::new()
  }
}
