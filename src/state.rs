//! Latest known-good snapshot per resource.
//!
//! Each resource lives in a [`Slot`] backed by a `tokio::sync::watch`
//! channel. Publishing swaps the whole `Arc` in one step, so a render tick
//! sees either the previous collection or the new one, never a mix.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::source::{Alert, Connection, LogEntry, StatusMetrics, Threat};

/// An immutable published value.
pub struct Snapshot<T> {
    data: Arc<T>,
    seq: u64,
    published_at: Instant,
}

impl<T> Snapshot<T> {
    /// Sequence number, starting at 1 for the first publish.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// When this snapshot was published.
    pub fn published_at(&self) -> Instant {
        self.published_at
    }

    /// Shared handle to the data.
    pub fn data(&self) -> &Arc<T> {
        &self.data
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            seq: self.seq,
            published_at: self.published_at,
        }
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("seq", &self.seq)
            .field("data", &self.data)
            .finish()
    }
}

/// Holder for one resource's latest snapshot.
pub struct Slot<T> {
    tx: watch::Sender<Option<Snapshot<T>>>,
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Replace the current snapshot and return the new sequence number.
    pub fn publish(&self, value: T) -> u64 {
        let data = Arc::new(value);
        let mut seq = 0;
        self.tx.send_modify(|current| {
            seq = current.as_ref().map_or(0, |s| s.seq) + 1;
            *current = Some(Snapshot {
                data,
                seq,
                published_at: Instant::now(),
            });
        });
        seq
    }

    /// The latest snapshot, if anything has been published yet.
    pub fn latest(&self) -> Option<Snapshot<T>> {
        self.tx.borrow().clone()
    }

    /// Sequence number of the latest snapshot (0 when empty).
    pub fn seq(&self) -> u64 {
        self.tx.borrow().as_ref().map_or(0, |s| s.seq)
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot<T>>> {
        self.tx.subscribe()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot").field("seq", &self.seq()).finish()
    }
}

#[derive(Debug, Default)]
struct Inner {
    threats: Slot<Vec<Threat>>,
    connections: Slot<Vec<Connection>>,
    alerts: Slot<Vec<Alert>>,
    logs: Slot<Vec<LogEntry>>,
    status: Slot<StatusMetrics>,
}

/// Snapshots of every backend resource, shared between pollers and the UI.
///
/// Cloning is cheap; all clones see the same slots.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<Inner>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threats(&self) -> &Slot<Vec<Threat>> {
        &self.inner.threats
    }

    pub fn connections(&self) -> &Slot<Vec<Connection>> {
        &self.inner.connections
    }

    pub fn alerts(&self) -> &Slot<Vec<Alert>> {
        &self.inner.alerts
    }

    pub fn logs(&self) -> &Slot<Vec<LogEntry>> {
        &self.inner.logs
    }

    pub fn status(&self) -> &Slot<StatusMetrics> {
        &self.inner.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(threats: u64) -> StatusMetrics {
        StatusMetrics {
            threats_detected: threats,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_slot() {
        let state = SharedState::new();
        assert!(state.status().latest().is_none());
        assert_eq!(state.threats().seq(), 0);
    }

    #[test]
    fn test_publish_increments_seq() {
        let state = SharedState::new();
        assert_eq!(state.status().publish(metrics(1)), 1);
        assert_eq!(state.status().publish(metrics(2)), 2);

        let latest = state.status().latest().unwrap();
        assert_eq!(latest.seq(), 2);
        assert_eq!(latest.threats_detected, 2);
    }

    #[test]
    fn test_reader_keeps_old_snapshot_after_swap() {
        let state = SharedState::new();
        state.threats().publish(Vec::new());
        let held = state.threats().latest().unwrap();

        state.status().publish(metrics(5));
        state.threats().publish(Vec::new());

        // The held snapshot is untouched by later publishes.
        assert_eq!(held.seq(), 1);
        assert_eq!(state.threats().seq(), 2);
    }

    #[test]
    fn test_clones_share_slots() {
        let state = SharedState::new();
        let other = state.clone();
        other.status().publish(metrics(42));
        assert_eq!(state.status().latest().unwrap().threats_detected, 42);
    }

    #[tokio::test]
    async fn test_subscribe_sees_publish() {
        let state = SharedState::new();
        let mut rx = state.alerts().subscribe();
        state.alerts().publish(Vec::new());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().map(|s| s.seq()), Some(1));
    }
}
