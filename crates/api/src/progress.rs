//! Progress log writer.
//!
//! Subscribes to the migration event bus and writes every event through
//! `tracing`, so a headless deployment still gets a progress trail in its
//! logs. Runs until the bus closes.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use mediashift_events::{EventBus, EventKind, MigrationEvent};

/// Spawn the progress logger task.
pub fn spawn_progress_logger(bus: &EventBus) -> JoinHandle<()> {
    let receiver = bus.subscribe();
    tokio::spawn(run(receiver))
}

/// Consume bus events until the channel closes.
async fn run(mut receiver: broadcast::Receiver<MigrationEvent>) {
    loop {
        match receiver.recv().await {
            Ok(event) => log_event(&event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Progress logger lagged behind the event bus");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::info!("Event bus closed, progress logger shutting down");
                break;
            }
        }
    }
}

/// Write one event to the log.
fn log_event(event: &MigrationEvent) {
    match &event.kind {
        EventKind::RunStarted { total } => {
            tracing::info!(run_id = %event.run_id, total, "Migration started");
        }
        EventKind::EntityProcessed {
            collection,
            current,
            total,
        } => {
            tracing::info!(
                run_id = %event.run_id,
                collection = %collection,
                current,
                total,
                "Processed entity"
            );
        }
        EventKind::RunCompleted { stats, cancelled } => {
            tracing::info!(
                run_id = %event.run_id,
                cancelled,
                summary = %stats.summary(),
                "Migration finished"
            );
        }
    }
}
