//! src/eventbus/mod.rs
//!
//! Provides an in-process event bus that supports guaranteed delivery
//! to multiple subscribers via bounded MPSC queues. This is the
//! observability sink for everything the application wants measured:
//! report flow, gamification, sync degradation.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};

use sentinelle_common::models::report::{WasteNature, WasteStatus};

use crate::app::Screen;

/// Global event type that parts of the application publish or subscribe to.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A new report was confirmed into the collection.
    ReportCreated {
        commune: String,
        nature: WasteNature,
    },

    /// A follow-up observation was appended to an existing report.
    EvolutionRecorded {
        report_id: String,
        status: WasteStatus,
    },

    /// A gamification badge crossed its threshold.
    BadgeUnlocked { badge_title: String },

    /// A screen became visible.
    ScreenView { screen: Screen },

    /// The remote load failed or timed out and the collection degraded to
    /// the local cache.
    SyncDegraded { reason: String },

    /// A fire-and-forget remote mirror did not make it.
    RemoteMirrorFailed { report_id: String },

    SessionStarted { uid: String },
    SessionEnded,

    /// System-wide event for debugging or administration.
    SystemMessage(String),
}

impl AppEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            AppEvent::ReportCreated { .. } => "report_created",
            AppEvent::EvolutionRecorded { .. } => "evolution_recorded",
            AppEvent::BadgeUnlocked { .. } => "badge_unlocked",
            AppEvent::ScreenView { .. } => "screen_view",
            AppEvent::SyncDegraded { .. } => "sync_degraded",
            AppEvent::RemoteMirrorFailed { .. } => "remote_mirror_failed",
            AppEvent::SessionStarted { .. } => "session_started",
            AppEvent::SessionEnded => "session_ended",
            AppEvent::SystemMessage(_) => "system_message",
        }
    }
}

/// Each subscriber gets its own `mpsc::Sender<AppEvent>` for guaranteed
/// delivery.
///
/// - If the subscriber's channel buffer fills, `publish` will await
///   until there's space (backpressure).
/// - If the subscriber has dropped the `Receiver`, the channel is closed
///   and sending returns an error.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<AppEvent>>>>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Default size for each subscriber's buffer.
const DEFAULT_BUFFER_SIZE: usize = 256;

impl EventBus {
    /// Create a new, empty event bus.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            subscribers: Arc::new(Mutex::new(vec![])),
            shutdown_tx: Arc::new(tx),
            shutdown_rx: rx,
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Returns a receiver on which events will be delivered.
    pub async fn subscribe(&self, buffer_size: Option<usize>) -> mpsc::Receiver<AppEvent> {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(size);
        let mut subs = self.subscribers.lock().await;
        subs.push(tx);
        rx
    }

    /// Publish an event to all subscribers.
    pub async fn publish(&self, event: AppEvent) {
        let senders = {
            let subs = self.subscribers.lock().await;
            subs.clone()
        };
        for s in senders {
            let _ = s.send(event.clone()).await;
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new();

        let mut rx1 = bus.subscribe(Some(5)).await;
        let mut rx2 = bus.subscribe(Some(5)).await;

        bus.publish(AppEvent::SessionEnded).await;

        let evt1 = rx1.recv().await.expect("rx1 should get event");
        let evt2 = rx2.recv().await.expect("rx2 should get event");

        assert_eq!(evt1.event_type(), "session_ended");
        assert_eq!(evt2.event_type(), "session_ended");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(AppEvent::SystemMessage("nobody listening".into()))
            .await;
        assert!(!bus.is_shutdown());
        bus.shutdown();
        assert!(bus.is_shutdown());
    }
}
