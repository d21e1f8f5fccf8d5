//! Bounded, in-memory history of recently received events.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use super::event::BufferedEventRecord;

/// Number of events retained by default.
pub const DEFAULT_CAPACITY: usize = 100;

/// Point-in-time copy of the buffer, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventsSnapshot {
    pub total: usize,
    pub events: Vec<BufferedEventRecord>,
}

/// Fixed-capacity FIFO of the most recent events.
///
/// Repeated deliveries of the same event id are kept as separate entries.
#[derive(Debug)]
pub struct RecentEvents {
    capacity: usize,
    events: Mutex<VecDeque<BufferedEventRecord>>,
}

impl RecentEvents {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "recent events capacity must be positive");
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `record`, evicting from the head until within capacity.
    pub fn push(&self, record: BufferedEventRecord) {
        // A panic while holding the lock cannot leave the deque half-updated.
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.push_back(record);
        while events.len() > self.capacity {
            events.pop_front();
        }
    }

    pub fn snapshot(&self) -> EventsSnapshot {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        EventsSnapshot {
            total: events.len(),
            events: events.iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecentEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn record(id: &str) -> BufferedEventRecord {
        BufferedEventRecord {
            id: Some(id.to_string()),
            event_type: Some("payment_intent.succeeded".to_string()),
            received_at: Utc::now(),
            data: None,
        }
    }

    fn ids(snapshot: &EventsSnapshot) -> Vec<String> {
        snapshot
            .events
            .iter()
            .map(|e| e.id.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn starts_empty() {
        let buffer = RecentEvents::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), DEFAULT_CAPACITY);
        assert_eq!(buffer.snapshot().total, 0);
    }

    #[test]
    fn keeps_arrival_order() {
        let buffer = RecentEvents::new();
        buffer.push(record("evt_a"));
        buffer.push(record("evt_b"));
        buffer.push(record("evt_c"));

        assert_eq!(ids(&buffer.snapshot()), vec!["evt_a", "evt_b", "evt_c"]);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let buffer = RecentEvents::with_capacity(3);
        for i in 0..5 {
            buffer.push(record(&format!("evt_{i}")));
        }

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.total, 3);
        assert_eq!(ids(&snapshot), vec!["evt_2", "evt_3", "evt_4"]);
    }

    #[test]
    fn duplicate_ids_are_counted_separately() {
        let buffer = RecentEvents::new();
        buffer.push(record("evt_same"));
        buffer.push(record("evt_same"));
        assert_eq!(buffer.snapshot().total, 2);
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let buffer = RecentEvents::new();
        buffer.push(record("evt_a"));
        let first = buffer.snapshot();
        let second = buffer.snapshot();
        assert_eq!(first, second);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn snapshot_serializes_total_and_events() {
        let buffer = RecentEvents::new();
        buffer.push(record("evt_a"));
        let value = serde_json::to_value(buffer.snapshot()).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["events"][0]["id"], "evt_a");
        assert!(value["events"][0].get("receivedAt").is_some());
    }

    #[test]
    fn concurrent_pushes_stay_bounded() {
        let buffer = Arc::new(RecentEvents::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let buffer = buffer.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        buffer.push(record(&format!("evt_{t}_{i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(buffer.len(), DEFAULT_CAPACITY);
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn zero_capacity_panics() {
        let _ = RecentEvents::with_capacity(0);
    }

    proptest! {
        #[test]
        fn retains_exactly_the_last_hundred(n in 0usize..400) {
            let buffer = RecentEvents::new();
            for i in 0..n {
                buffer.push(record(&format!("evt_{i}")));
            }

            let snapshot = buffer.snapshot();
            let expected: Vec<String> = (n.saturating_sub(DEFAULT_CAPACITY)..n)
                .map(|i| format!("evt_{i}"))
                .collect();
            prop_assert_eq!(snapshot.total, n.min(DEFAULT_CAPACITY));
            prop_assert_eq!(ids(&snapshot), expected);
        }
    }
}
