//! GetRecentEventsHandler - Query handler for the recent-events buffer.

use std::sync::Arc;

use crate::domain::webhook::{EventsSnapshot, RecentEvents};

/// Handler returning the buffered events, oldest first.
pub struct GetRecentEventsHandler {
    recent_events: Arc<RecentEvents>,
}

impl GetRecentEventsHandler {
    pub fn new(recent_events: Arc<RecentEvents>) -> Self {
        Self { recent_events }
    }

    pub fn handle(&self) -> EventsSnapshot {
        self.recent_events.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::BufferedEventRecord;
    use chrono::Utc;

    #[test]
    fn returns_current_snapshot() {
        let recent = Arc::new(RecentEvents::new());
        recent.push(BufferedEventRecord {
            id: Some("evt_1".to_string()),
            event_type: None,
            received_at: Utc::now(),
            data: None,
        });

        let snapshot = GetRecentEventsHandler::new(recent).handle();

        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.events[0].id.as_deref(), Some("evt_1"));
    }
}
