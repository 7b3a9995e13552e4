//! Periodic fetch-and-publish tasks.
//!
//! A [`DataPoller`] owns one tokio task per resource. The task runs a cycle
//! immediately, then on every interval tick or explicit refresh. At most one
//! fetch is in flight per poller: a tick that arrives while a fetch is still
//! running is skipped and counted, never queued.
//!
//! Failures are logged and recorded on the poller's [`PollStats`]; the last
//! published snapshot stays in place and the schedule continues.
//!
//! Stopping (or dropping) the [`PollerHandle`] aborts the task together with
//! any in-flight fetch, so no callback fires after stop.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::source::{decode_collection, decode_status, DataProvider, Resource, StatusMetrics};
use crate::state::{SharedState, Slot};

/// A boxed fetch for one cycle.
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send>>;

/// Produces one fetch per cycle.
pub trait Fetcher<T>: Send + Sync + 'static {
    fn fetch(&self) -> FetchFuture<T>;
}

impl<T, F> Fetcher<T> for F
where
    F: Fn() -> FetchFuture<T> + Send + Sync + 'static,
{
    fn fetch(&self) -> FetchFuture<T> {
        (self)()
    }
}

/// Counters for one poller.
#[derive(Debug, Default)]
pub struct PollStats {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
    last_error: Mutex<Option<FetchError>>,
    last_success: Mutex<Option<Instant>>,
}

impl PollStats {
    /// Fetches started.
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Cycles dropped because a fetch was still in flight.
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Error from the most recent cycle; cleared by the next success.
    pub fn last_error(&self) -> Option<FetchError> {
        self.last_error.lock().clone()
    }

    pub fn last_success(&self) -> Option<Instant> {
        *self.last_success.lock()
    }
}

/// Owner of a running poller task.
#[derive(Debug)]
pub struct PollerHandle {
    resource: Resource,
    task: JoinHandle<()>,
    refresh: Arc<Notify>,
    stats: Arc<PollStats>,
}

impl PollerHandle {
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Abort the task and any in-flight fetch.
    pub fn stop(&self) {
        if !self.task.is_finished() {
            debug!(resource = %self.resource, "poller stopped");
        }
        self.task.abort();
    }

    /// Request an extra cycle now. Skipped if a fetch is in flight.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Entry point for starting pollers.
#[derive(Debug)]
pub struct DataPoller;

impl DataPoller {
    /// Spawn a poller on the current tokio runtime.
    ///
    /// `on_success` receives every successfully fetched value, in order, on
    /// the poller task.
    pub fn start<T, F, S>(
        resource: Resource,
        interval: Duration,
        fetcher: F,
        on_success: S,
    ) -> PollerHandle
    where
        T: Send + 'static,
        F: Fetcher<T>,
        S: FnMut(T) + Send + 'static,
    {
        let refresh = Arc::new(Notify::new());
        let stats = Arc::new(PollStats::default());

        debug!(%resource, interval_ms = interval.as_millis() as u64, "poller started");
        let task = tokio::spawn(run(
            resource,
            interval,
            fetcher,
            on_success,
            Arc::clone(&refresh),
            Arc::clone(&stats),
        ));

        PollerHandle {
            resource,
            task,
            refresh,
            stats,
        }
    }
}

enum Event<T> {
    Cycle,
    Done(Result<T, FetchError>),
}

/// Resolve the in-flight fetch, or never if there is none.
async fn in_flight_result<T>(in_flight: &mut Option<FetchFuture<T>>) -> Result<T, FetchError> {
    match in_flight {
        Some(fetch) => fetch.await,
        None => std::future::pending().await,
    }
}

async fn run<T, F, S>(
    resource: Resource,
    interval: Duration,
    fetcher: F,
    mut on_success: S,
    refresh: Arc<Notify>,
    stats: Arc<PollStats>,
) where
    F: Fetcher<T>,
    S: FnMut(T),
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: Option<FetchFuture<T>> = None;

    loop {
        // Completion wins over a simultaneous tick so the tick can start the
        // next fetch instead of being skipped.
        let event = tokio::select! {
            biased;
            result = in_flight_result(&mut in_flight) => Event::Done(result),
            _ = ticker.tick() => Event::Cycle,
            _ = refresh.notified() => Event::Cycle,
        };

        match event {
            Event::Done(result) => {
                in_flight = None;
                match result {
                    Ok(value) => {
                        stats.succeeded.fetch_add(1, Ordering::Relaxed);
                        *stats.last_error.lock() = None;
                        *stats.last_success.lock() = Some(Instant::now());
                        on_success(value);
                    }
                    Err(e) => {
                        stats.failed.fetch_add(1, Ordering::Relaxed);
                        warn!(%resource, error = %e, "fetch failed, keeping previous snapshot");
                        *stats.last_error.lock() = Some(e);
                    }
                }
            }
            Event::Cycle if in_flight.is_some() => {
                stats.skipped.fetch_add(1, Ordering::Relaxed);
                debug!(%resource, "fetch still in flight, skipping cycle");
            }
            Event::Cycle => {
                stats.started.fetch_add(1, Ordering::Relaxed);
                in_flight = Some(fetcher.fetch());
            }
        }
    }
}

fn collection_fetcher<T>(
    resource: Resource,
    provider: Arc<dyn DataProvider>,
) -> impl Fetcher<Vec<T>>
where
    T: DeserializeOwned + Send + 'static,
{
    move || -> FetchFuture<Vec<T>> {
        let provider = Arc::clone(&provider);
        Box::pin(async move {
            let payload = provider.fetch(resource).await?;
            Ok(decode_collection::<T>(resource, payload)?.records)
        })
    }
}

fn publish_into<T>(slot: impl Fn(&SharedState) -> &Slot<T>, state: SharedState) -> impl FnMut(T)
where
    T: Send + Sync + 'static,
{
    move |value| {
        slot(&state).publish(value);
    }
}

/// Start the poller that keeps `resource` in `state` current.
pub fn resource_poller(
    resource: Resource,
    provider: Arc<dyn DataProvider>,
    state: SharedState,
    interval: Duration,
) -> PollerHandle {
    match resource {
        Resource::Threats => DataPoller::start(
            resource,
            interval,
            collection_fetcher(resource, provider),
            publish_into(SharedState::threats, state),
        ),
        Resource::Connections => DataPoller::start(
            resource,
            interval,
            collection_fetcher(resource, provider),
            publish_into(SharedState::connections, state),
        ),
        Resource::Alerts => DataPoller::start(
            resource,
            interval,
            collection_fetcher(resource, provider),
            publish_into(SharedState::alerts, state),
        ),
        Resource::Logs => DataPoller::start(
            resource,
            interval,
            collection_fetcher(resource, provider),
            publish_into(SharedState::logs, state),
        ),
        Resource::Status => DataPoller::start(
            resource,
            interval,
            move || -> FetchFuture<StatusMetrics> {
                let provider = Arc::clone(&provider);
                Box::pin(async move { decode_status(provider.fetch(Resource::Status).await?) })
            },
            publish_into(SharedState::status, state),
        ),
    }
}

/// Fetch `resource` once and publish it, outside any poller.
pub async fn fetch_into(
    resource: Resource,
    provider: &dyn DataProvider,
    state: &SharedState,
) -> Result<(), FetchError> {
    let payload = provider.fetch(resource).await?;
    match resource {
        Resource::Threats => {
            state.threats().publish(decode_collection(resource, payload)?.records);
        }
        Resource::Connections => {
            state.connections().publish(decode_collection(resource, payload)?.records);
        }
        Resource::Alerts => {
            state.alerts().publish(decode_collection(resource, payload)?.records);
        }
        Resource::Logs => {
            state.logs().publish(decode_collection(resource, payload)?.records);
        }
        Resource::Status => {
            state.status().publish(decode_status(payload)?);
        }
    }
    Ok(())
}

/// One poller per resource.
#[derive(Debug, Default)]
pub struct PollerRegistry {
    pollers: BTreeMap<Resource, PollerHandle>,
}

impl PollerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a poller exists for `resource`. `factory` only runs when
    /// there is none. Returns `true` if a poller was started.
    pub fn ensure<F>(&mut self, resource: Resource, factory: F) -> bool
    where
        F: FnOnce() -> PollerHandle,
    {
        if self.pollers.contains_key(&resource) {
            return false;
        }
        self.pollers.insert(resource, factory());
        true
    }

    /// Request an out-of-band cycle. Returns `false` if no poller exists.
    pub fn refresh(&self, resource: Resource) -> bool {
        match self.pollers.get(&resource) {
            Some(poller) => {
                poller.refresh();
                true
            }
            None => false,
        }
    }

    pub fn refresh_all(&self) {
        for poller in self.pollers.values() {
            poller.refresh();
        }
    }

    pub fn stop(&mut self, resource: Resource) {
        if let Some(poller) = self.pollers.remove(&resource) {
            poller.stop();
        }
    }

    pub fn stop_all(&mut self) {
        for (_, poller) in std::mem::take(&mut self.pollers) {
            poller.stop();
        }
    }

    pub fn get(&self, resource: Resource) -> Option<&PollerHandle> {
        self.pollers.get(&resource)
    }

    pub fn last_error(&self, resource: Resource) -> Option<FetchError> {
        self.pollers.get(&resource)?.stats().last_error()
    }

    pub fn len(&self) -> usize {
        self.pollers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pollers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DirectoryProvider;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;
    use tokio::time::sleep;

    fn counter() -> Arc<AtomicU64> {
        Arc::new(AtomicU64::new(0))
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_cycle_runs_immediately() {
        let received = counter();
        let seen = Arc::clone(&received);
        let handle = DataPoller::start(
            Resource::Status,
            Duration::from_secs(5),
            || -> FetchFuture<u64> { Box::pin(async { Ok(42) }) },
            move |v| seen.store(v, Ordering::SeqCst),
        );

        sleep(Duration::from_millis(1)).await;
        assert_eq!(received.load(Ordering::SeqCst), 42);
        assert_eq!(handle.stats().started(), 1);
        assert_eq!(handle.stats().succeeded(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_snapshot_and_schedule() {
        let state = SharedState::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch_calls = Arc::clone(&calls);
        let publish_state = state.clone();
        let handle = DataPoller::start(
            Resource::Status,
            Duration::from_secs(5),
            move || -> FetchFuture<StatusMetrics> {
                let n = fetch_calls.fetch_add(1, Ordering::SeqCst);
                Box::pin(async move {
                    if n == 0 {
                        Ok(StatusMetrics {
                            threats_detected: 7,
                            ..Default::default()
                        })
                    } else {
                        Err(FetchError::Status(503))
                    }
                })
            },
            move |v| {
                publish_state.status().publish(v);
            },
        );

        sleep(Duration::from_millis(1)).await;
        let first = state.status().latest().unwrap();

        sleep(Duration::from_secs(11)).await;
        let stats = handle.stats();
        assert_eq!(stats.started(), 3);
        assert_eq!(stats.succeeded(), 1);
        assert_eq!(stats.failed(), 2);
        assert_eq!(stats.last_error(), Some(FetchError::Status(503)));

        let latest = state.status().latest().unwrap();
        assert_eq!(latest.seq(), 1);
        assert!(Arc::ptr_eq(first.data(), latest.data()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_never_overlaps() {
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        let (a, m) = (Arc::clone(&active), Arc::clone(&max_active));
        let handle = DataPoller::start(
            Resource::Threats,
            Duration::from_secs(5),
            move || -> FetchFuture<()> {
                let (a, m) = (Arc::clone(&a), Arc::clone(&m));
                Box::pin(async move {
                    let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                    m.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_secs(12)).await;
                    a.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
            },
            |_| {},
        );

        sleep(Duration::from_secs(40)).await;
        let stats = handle.stats();
        assert_eq!(max_active.load(Ordering::SeqCst), 1);
        assert!(stats.skipped() >= 2, "skipped {}", stats.skipped());
        assert!(stats.succeeded() >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_fetch_suppresses_callback() {
        let received = counter();
        let seen = Arc::clone(&received);
        let handle = DataPoller::start(
            Resource::Alerts,
            Duration::from_secs(5),
            || -> FetchFuture<u64> {
                Box::pin(async {
                    sleep(Duration::from_secs(3)).await;
                    Ok(1)
                })
            },
            move |v| {
                seen.fetch_add(v, Ordering::SeqCst);
            },
        );

        sleep(Duration::from_secs(1)).await;
        handle.stop();
        sleep(Duration::from_secs(30)).await;

        assert_eq!(received.load(Ordering::SeqCst), 0);
        assert_eq!(handle.stats().started(), 1);
        assert!(handle.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let received = counter();
        let seen = Arc::clone(&received);
        let handle = DataPoller::start(
            Resource::Logs,
            Duration::from_secs(5),
            || -> FetchFuture<u64> { Box::pin(async { Ok(1) }) },
            move |v| {
                seen.fetch_add(v, Ordering::SeqCst);
            },
        );

        sleep(Duration::from_millis(1)).await;
        drop(handle);
        sleep(Duration::from_secs(30)).await;
        assert_eq!(received.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_runs_extra_cycle() {
        let handle = DataPoller::start(
            Resource::Connections,
            Duration::from_secs(60),
            || -> FetchFuture<()> { Box::pin(async { Ok(()) }) },
            |_| {},
        );

        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.stats().started(), 1);

        handle.refresh();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.stats().started(), 2);
        assert_eq!(handle.stats().skipped(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_registry_one_poller_per_resource() {
        let mut registry = PollerRegistry::new();
        let start = || {
            DataPoller::start(
                Resource::Threats,
                Duration::from_secs(5),
                || -> FetchFuture<()> { Box::pin(async { Ok(()) }) },
                |_| {},
            )
        };

        assert!(registry.ensure(Resource::Threats, start));
        assert!(!registry.ensure(Resource::Threats, start));
        assert_eq!(registry.len(), 1);
        assert!(registry.refresh(Resource::Threats));
        assert!(!registry.refresh(Resource::Alerts));

        registry.stop_all();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_resource_poller_publishes_decoded_records() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("threats.json"),
            r#"[
                {"type": "Malware", "severity": "High", "source": "10.0.0.5",
                 "timestamp": "2024-05-01T10:00:00.000000", "status": "Active"},
                {"type": "Broken", "severity": "High"}
            ]"#,
        )
        .unwrap();

        let state = SharedState::new();
        let provider: Arc<dyn DataProvider> = Arc::new(DirectoryProvider::new(dir.path()));
        let handle = resource_poller(
            Resource::Threats,
            provider,
            state.clone(),
            Duration::from_secs(5),
        );

        // Real file IO: wait for the first cycle to land.
        let mut rx = state.threats().subscribe();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(Option::is_some))
            .await
            .unwrap()
            .unwrap();

        let threats = state.threats().latest().unwrap();
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].kind, "Malware");
        assert_eq!(handle.stats().succeeded(), 1);
    }

    #[tokio::test]
    async fn test_fetch_into_publishes_once() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("status.json"),
            r#"{"threats_detected": 3, "alerts": 1, "active_connections": 9}"#,
        )
        .unwrap();

        let state = SharedState::new();
        let provider = DirectoryProvider::new(dir.path());
        fetch_into(Resource::Status, &provider, &state).await.unwrap();
        assert_eq!(state.status().latest().unwrap().active_connections, 9);

        // No logs file: the error surfaces and nothing is published.
        assert!(fetch_into(Resource::Logs, &provider, &state).await.is_err());
        assert!(state.logs().latest().is_none());
    }
}
