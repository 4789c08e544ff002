//! In-process progress bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans migration progress out to any number of subscribers
//! (log writers, UIs, tests). Publishing is fire-and-forget: a delivery
//! problem can never reach the traversal that produced the event.

use chrono::Utc;
use mediashift_core::stats::MigrationStats;
use mediashift_core::types::{RunId, Timestamp};
use mediashift_core::world::Collection;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What happened inside a migration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// The run finished listing the world and is about to traverse
    /// `total` top-level entities.
    RunStarted { total: u64 },
    /// One top-level entity, including its embedded documents, has fully
    /// settled. `current` increases strictly from 1 to `total`.
    EntityProcessed {
        collection: Collection,
        current: u64,
        total: u64,
    },
    /// The run finished; `stats` is the final tally.
    RunCompleted {
        stats: MigrationStats,
        cancelled: bool,
    },
}

/// A progress event from one migration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationEvent {
    /// Run the event belongs to.
    pub run_id: RunId,
    /// When the event was created (UTC).
    pub timestamp: Timestamp,
    /// Event payload.
    pub kind: EventKind,
}

impl MigrationEvent {
    /// Create an event stamped with the current time.
    pub fn new(run_id: RunId, kind: EventKind) -> Self {
        Self {
            run_id,
            timestamp: Utc::now(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity of the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus for migration progress.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers can
/// independently receive every published [`MigrationEvent`].
pub struct EventBus {
    sender: broadcast::Sender<MigrationEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is dropped; the send error is
    /// deliberately ignored so publishing can never fail the caller.
    pub fn publish(&self, event: MigrationEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<MigrationEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn started(total: u64) -> MigrationEvent {
        MigrationEvent::new(RunId::new_v4(), EventKind::RunStarted { total })
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = started(7);
        bus.publish(event.clone());

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn all_subscribers_receive_every_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(started(1));
        bus.publish(started(2));

        for rx in [&mut rx1, &mut rx2] {
            assert_eq!(rx.recv().await.unwrap().kind, EventKind::RunStarted { total: 1 });
            assert_eq!(rx.recv().await.unwrap().kind, EventKind::RunStarted { total: 2 });
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(started(0));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn subscription_starts_at_the_present() {
        let bus = EventBus::default();
        bus.publish(started(1));

        let mut rx = bus.subscribe();
        bus.publish(started(2));

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::RunStarted { total: 2 });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn entity_processed_serializes_with_tagged_kind() {
        let event = MigrationEvent::new(
            RunId::new_v4(),
            EventKind::EntityProcessed {
                collection: Collection::Actors,
                current: 3,
                total: 12,
            },
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["kind"]["type"], "entity_processed");
        assert_eq!(value["kind"]["collection"], "actors");
        assert_eq!(value["kind"]["current"], 3);
        assert_eq!(value["kind"]["total"], 12);
    }
}
