//! Keyed query cache with request deduplication, staleness and retries.
//!
//! A [`QueryClient`] owns one table of entries, keyed by [`QueryKey`]. Creating
//! a [`QueryObserver`] is the equivalent of mounting a view that needs the
//! data: the client serves a fresh cached value, joins a fetch already in
//! flight for the key, or starts a new fetch cycle on a spawned task.
//!
//! ```text
//! idle ──▶ fetching ──▶ success
//!              │  ▲
//!              ▼  │ (backoff elapsed, retries left)
//!            failed ──▶ error   (retries exhausted)
//! ```
//!
//! Entries are only mutated by the cycle task and by explicit cache control
//! ([`QueryClient::invalidate`], [`QueryClient::remove`], [`QueryClient::clear`]).
//! Observers read snapshots ([`QueryState`]). Dropping an observer never
//! cancels the shared cycle; its result still lands in the cache.
//!
//! All methods that may start a fetch must be called within a Tokio runtime.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::BoxFuture;
use crate::error::Error;

pub mod key;
pub mod retry;

pub use key::QueryKey;
pub use retry::RetryPolicy;

/// How long a successful result is served without revalidation.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(15 * 60);

type Value = Arc<dyn Any + Send + Sync>;

/// Type-erased, cheaply cloneable fetch function invoked once per attempt.
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, Error>> + Send + Sync>;

/// Conversion trait for async fetch closures.
///
/// Any `Fn() -> impl Future<Output = Result<T, Error>> + Send` that is also
/// `Send + Sync + 'static` implements this automatically.
pub trait IntoFetcher<T>: Send + Sync + 'static {
    fn into_fetcher(self) -> Fetcher<T>;
}

impl<T, F, Fut> IntoFetcher<T> for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, Error>> + Send + 'static,
{
    fn into_fetcher(self) -> Fetcher<T> {
        Arc::new(move || -> BoxFuture<'static, Result<T, Error>> { Box::pin((self)()) })
    }
}

/// Per-call-site cache behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub stale_time: Duration,
    pub retry: RetryPolicy,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// Never fetched (or removed and not yet refetched).
    Idle,
    /// An attempt is running.
    Fetching,
    /// The last attempt failed; waiting out the backoff before retrying.
    Failed,
    /// The last cycle succeeded.
    Success,
    /// The last cycle exhausted its retries.
    Error,
}

/// Read-only projection of one entry, as seen by a view.
#[derive(Debug)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    /// Last successful value; kept while later cycles fail.
    pub data: Option<Arc<T>>,
    /// Final error of the last cycle; cleared by the next success.
    pub error: Option<Arc<Error>>,
    /// Fetching with nothing cached yet.
    pub is_loading: bool,
    /// A cycle is in flight (including backoff waits).
    pub is_fetching: bool,
    /// Failed attempts in the current or last cycle.
    pub failure_count: u32,
    /// When `data` was stored.
    pub data_updated_at: Option<Instant>,
    /// When `error` was stored.
    pub error_updated_at: Option<Instant>,
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
            failure_count: self.failure_count,
            data_updated_at: self.data_updated_at,
            error_updated_at: self.error_updated_at,
        }
    }
}

impl<T> QueryState<T> {
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_loading: false,
            is_fetching: false,
            failure_count: 0,
            data_updated_at: None,
            error_updated_at: None,
        }
    }
}

struct Entry {
    status: QueryStatus,
    data: Option<Value>,
    error: Option<Arc<Error>>,
    data_updated_at: Option<Instant>,
    error_updated_at: Option<Instant>,
    // Bumped by `invalidate`; data is fresh only if fetched under the current one.
    epoch: u64,
    data_epoch: u64,
    failure_count: u32,
    // Completion signal of the running cycle; `None` when idle.
    in_flight: Option<watch::Receiver<bool>>,
    // Id of the cycle allowed to write this entry.
    cycle: u64,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            data_updated_at: None,
            error_updated_at: None,
            epoch: 0,
            data_epoch: 0,
            failure_count: 0,
            in_flight: None,
            cycle: 0,
        }
    }
}

impl Entry {
    fn is_fresh(&self, now: Instant, stale_time: Duration) -> bool {
        self.data_epoch == self.epoch
            && self.data.is_some()
            && self
                .data_updated_at
                .is_some_and(|at| now.saturating_duration_since(at) < stale_time)
    }

    // A cycle whose task died without settling does not count.
    fn running_cycle(&self) -> Option<&watch::Receiver<bool>> {
        self.in_flight
            .as_ref()
            .filter(|rx| rx.has_changed().is_ok())
    }

    fn project<T>(&self, key: &QueryKey) -> QueryState<T>
    where
        T: Send + Sync + 'static,
    {
        let (data, mismatch) = match self.data.clone().map(|v| v.downcast::<T>()) {
            None => (None, None),
            Some(Ok(data)) => (Some(data), None),
            Some(Err(_)) => (
                None,
                Some(Arc::new(Error::TypeMismatch {
                    key: key.to_string(),
                })),
            ),
        };
        let is_fetching = matches!(self.status, QueryStatus::Fetching | QueryStatus::Failed);

        QueryState {
            status: self.status,
            is_loading: is_fetching && self.data.is_none(),
            is_fetching,
            data,
            error: mismatch.or_else(|| self.error.clone()),
            failure_count: self.failure_count,
            data_updated_at: self.data_updated_at,
            error_updated_at: self.error_updated_at,
        }
    }
}

/// Process-wide query cache. Clones share the same table.
///
/// # Examples
///
/// ```rust,no_run
/// use rcms::query::{QueryClient, QueryOptions};
///
/// # async fn example() {
/// let client = QueryClient::new();
/// let state = client
///     .query("greeting".into(), QueryOptions::default(), || async {
///         Ok::<_, rcms::Error>("hello".to_owned())
///     })
///     .await;
/// assert_eq!(state.data.as_deref().map(String::as_str), Some("hello"));
/// # }
/// ```
#[derive(Clone, Default)]
pub struct QueryClient {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    cycles: Arc<AtomicU64>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `key`, starting a fetch cycle unless the cached value is
    /// still fresh or a cycle is already running.
    pub fn observe<T>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: impl IntoFetcher<T>,
    ) -> QueryObserver<T>
    where
        T: Send + Sync + 'static,
    {
        let fetcher = fetcher.into_fetcher();
        let pending = self.ensure(&key, options, &fetcher, false);
        QueryObserver {
            client: self.clone(),
            key,
            options,
            fetcher,
            pending,
        }
    }

    /// Observes `key` and waits until the current cycle, if any, has settled.
    pub async fn query<T>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: impl IntoFetcher<T>,
    ) -> QueryState<T>
    where
        T: Send + Sync + 'static,
    {
        self.observe(key, options, fetcher).settled().await
    }

    /// Current projection of `key`, without triggering a fetch.
    pub fn state<T>(&self, key: &QueryKey) -> QueryState<T>
    where
        T: Send + Sync + 'static,
    {
        self.lock()
            .get(key)
            .map_or_else(QueryState::idle, |entry| entry.project(key))
    }

    /// Marks the cached value stale; the next observer refetches.
    ///
    /// A cycle already in flight still stores its result, but that result
    /// counts as stale too.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.epoch += 1;
        }
    }

    /// Drops the entry for `key`. A cycle still running for it is discarded.
    pub fn remove(&self, key: &QueryKey) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Returns the completion signal to wait on, or `None` when the cached
    // value is served as-is.
    fn ensure<T>(
        &self,
        key: &QueryKey,
        options: QueryOptions,
        fetcher: &Fetcher<T>,
        force: bool,
    ) -> Option<watch::Receiver<bool>>
    where
        T: Send + Sync + 'static,
    {
        let now = Instant::now();
        let mut entries = self.lock();
        let entry = entries.entry(key.clone()).or_default();

        if let Some(rx) = entry.running_cycle() {
            debug!(%key, "joining in-flight fetch");
            return Some(rx.clone());
        }
        if !force && entry.is_fresh(now, options.stale_time) {
            return None;
        }

        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let (done, rx) = watch::channel(false);
        entry.status = QueryStatus::Fetching;
        entry.failure_count = 0;
        entry.in_flight = Some(rx.clone());
        entry.cycle = cycle;
        let epoch = entry.epoch;
        drop(entries);

        debug!(%key, cycle, "starting fetch cycle");
        tokio::spawn(run_cycle(
            self.clone(),
            key.clone(),
            cycle,
            epoch,
            options,
            Arc::clone(fetcher),
            done,
        ));
        Some(rx)
    }

    // Applies `f` to the entry only if `cycle` still owns it.
    fn update(&self, key: &QueryKey, cycle: u64, f: impl FnOnce(&mut Entry)) {
        match self.lock().get_mut(key) {
            Some(entry) if entry.cycle == cycle => f(entry),
            _ => debug!(%key, cycle, "entry replaced, discarding fetch result"),
        }
    }
}

async fn run_cycle<T>(
    client: QueryClient,
    key: QueryKey,
    cycle: u64,
    epoch: u64,
    options: QueryOptions,
    fetcher: Fetcher<T>,
    done: watch::Sender<bool>,
) where
    T: Send + Sync + 'static,
{
    let mut failures = 0;

    loop {
        match fetcher().await {
            Ok(value) => {
                let value: Value = Arc::new(value);
                client.update(&key, cycle, |entry| {
                    entry.status = QueryStatus::Success;
                    entry.data = Some(value);
                    entry.error = None;
                    entry.data_updated_at = Some(Instant::now());
                    entry.data_epoch = epoch;
                    entry.failure_count = 0;
                    entry.in_flight = None;
                });
                break;
            }
            Err(err) => {
                failures += 1;
                if options.retry.should_retry(failures, &err) {
                    let delay = options.retry.delay(failures);
                    warn!(
                        %key,
                        attempt = failures,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "fetch failed, retrying"
                    );
                    client.update(&key, cycle, |entry| {
                        entry.status = QueryStatus::Failed;
                        entry.failure_count = failures;
                    });
                    sleep(delay).await;
                    client.update(&key, cycle, |entry| entry.status = QueryStatus::Fetching);
                } else {
                    warn!(%key, attempts = failures, error = %err, "fetch failed, giving up");
                    client.update(&key, cycle, |entry| {
                        entry.status = QueryStatus::Error;
                        entry.error = Some(Arc::new(err));
                        entry.error_updated_at = Some(Instant::now());
                        entry.failure_count = failures;
                        entry.in_flight = None;
                    });
                    break;
                }
            }
        }
    }

    done.send_replace(true);
}

/// A subscription to one key, bound to the fetcher that fills it.
///
/// Dropping the observer unsubscribes; the cycle it may have started keeps
/// running for other observers and for the cache.
pub struct QueryObserver<T> {
    client: QueryClient,
    key: QueryKey,
    options: QueryOptions,
    fetcher: Fetcher<T>,
    pending: Option<watch::Receiver<bool>>,
}

impl<T> QueryObserver<T>
where
    T: Send + Sync + 'static,
{
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Snapshot of the entry right now.
    pub fn state(&self) -> QueryState<T> {
        self.client.state(&self.key)
    }

    /// Waits for the cycle this observer joined or started, then returns
    /// the resulting state. Returns immediately when nothing is pending.
    ///
    /// Cancel-safe: dropping the future leaves the observer subscribed.
    pub async fn settled(&mut self) -> QueryState<T> {
        if let Some(rx) = self.pending.as_mut() {
            // A dropped sender means the cycle task is gone; fall through.
            let _ = rx.wait_for(|done| *done).await;
        }
        self.pending = None;
        self.state()
    }

    /// Starts a new cycle even if the cached value is fresh (manual refresh),
    /// or joins the one already running, and waits for it.
    pub async fn refetch(&mut self) -> QueryState<T> {
        self.pending = self
            .client
            .ensure(&self.key, self.options, &self.fetcher, true);
        self.settled().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use super::*;

    fn unavailable() -> Error {
        Error::Status {
            status: 503,
            reason: "Service Unavailable".into(),
            body: String::new(),
        }
    }

    /// Scripted backend: attempt `n` (1-based) fails when `fails(n)` is true.
    #[derive(Clone)]
    struct Backend {
        calls: Arc<AtomicU32>,
        attempts: Arc<Mutex<Vec<Instant>>>,
        fails: fn(u32) -> bool,
        latency: Duration,
    }

    impl Backend {
        fn new(fails: fn(u32) -> bool) -> Self {
            Self {
                calls: Arc::new(AtomicU32::new(0)),
                attempts: Arc::new(Mutex::new(Vec::new())),
                fails,
                latency: Duration::ZERO,
            }
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn gaps(&self) -> Vec<Duration> {
            let attempts = self.attempts.lock().unwrap();
            attempts.windows(2).map(|w| w[1] - w[0]).collect()
        }

        fn fetcher(&self) -> impl Fn() -> BoxFuture<'static, Result<String, Error>> + Send + Sync + 'static {
            let backend = self.clone();
            move || {
                let backend = backend.clone();
                Box::pin(async move {
                    let n = backend.calls.fetch_add(1, Ordering::SeqCst) + 1;
                    backend.attempts.lock().unwrap().push(Instant::now());
                    if !backend.latency.is_zero() {
                        sleep(backend.latency).await;
                    }
                    if (backend.fails)(n) {
                        Err(unavailable())
                    } else {
                        Ok(format!("content v{n}"))
                    }
                })
            }
        }
    }

    fn hero() -> QueryKey {
        QueryKey::from("hero")
    }

    fn data(state: &QueryState<String>) -> Option<&str> {
        state.data.as_deref().map(String::as_str)
    }

    fn within(gap: Duration, expected_ms: u64) -> bool {
        let expected = Duration::from_millis(expected_ms);
        gap >= expected && gap < expected + Duration::from_millis(50)
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_observers_share_one_fetch() {
        let client = QueryClient::new();
        let backend = Backend::new(|_| false).with_latency(Duration::from_millis(100));

        let mut first = client.observe(hero(), QueryOptions::default(), backend.fetcher());
        let mut second = client.observe(hero(), QueryOptions::default(), backend.fetcher());

        let loading = first.state();
        assert!(loading.is_loading);
        assert!(loading.data.is_none());

        let a = first.settled().await;
        let b = second.settled().await;
        assert_eq!(backend.calls(), 1);
        assert_eq!(data(&a), Some("content v1"));
        assert_eq!(data(&b), Some("content v1"));
        assert!(!a.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_value_is_served_from_cache() {
        let client = QueryClient::new();
        let backend = Backend::new(|_| false);

        client.query(hero(), QueryOptions::default(), backend.fetcher()).await;
        tokio::time::advance(Duration::from_secs(14 * 60)).await;

        let mut observer = client.observe(hero(), QueryOptions::default(), backend.fetcher());
        let state = observer.state();
        assert!(!state.is_fetching);
        assert_eq!(data(&state), Some("content v1"));
        observer.settled().await;
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_value_is_served_while_revalidating() {
        let client = QueryClient::new();
        let backend = Backend::new(|_| false);

        client.query(hero(), QueryOptions::default(), backend.fetcher()).await;
        tokio::time::advance(DEFAULT_STALE_TIME + Duration::from_secs(1)).await;

        let mut observer = client.observe(hero(), QueryOptions::default(), backend.fetcher());
        let during = observer.state();
        assert!(during.is_fetching);
        assert!(!during.is_loading);
        assert_eq!(data(&during), Some("content v1"));

        let after = observer.settled().await;
        assert_eq!(data(&after), Some("content v2"));
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_with_exponential_backoff_then_succeeds() {
        let client = QueryClient::new();
        let backend = Backend::new(|n| n <= 2);

        let state = client.query(hero(), QueryOptions::default(), backend.fetcher()).await;

        assert_eq!(backend.calls(), 3);
        assert_eq!(data(&state), Some("content v3"));
        assert!(state.error.is_none());
        assert_eq!(state.status, QueryStatus::Success);

        let gaps = backend.gaps();
        assert_eq!(gaps.len(), 2);
        assert!(within(gaps[0], 2000), "first backoff was {:?}", gaps[0]);
        assert!(within(gaps[1], 4000), "second backoff was {:?}", gaps[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_three_retries() {
        let client = QueryClient::new();
        let backend = Backend::new(|_| true);

        let state = client.query(hero(), QueryOptions::default(), backend.fetcher()).await;

        assert_eq!(backend.calls(), 4);
        assert_eq!(state.status, QueryStatus::Error);
        assert_eq!(state.failure_count, 4);
        assert!(state.data.is_none());
        assert!(!state.is_loading);
        assert_eq!(state.error.as_ref().and_then(|e| e.status()), Some(503));

        let gaps = backend.gaps();
        assert!(within(gaps[2], 8000), "third backoff was {:?}", gaps[2]);

        // Terminal for this cycle: nothing else happens on its own.
        tokio::time::advance(Duration::from_secs(3600)).await;
        assert_eq!(backend.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refetch_keeps_previous_data() {
        let client = QueryClient::new();
        let backend = Backend::new(|n| n > 1);

        client.query(hero(), QueryOptions::default(), backend.fetcher()).await;
        tokio::time::advance(DEFAULT_STALE_TIME).await;
        let state = client.query(hero(), QueryOptions::default(), backend.fetcher()).await;

        assert_eq!(backend.calls(), 5);
        assert!(state.is_error());
        assert_eq!(data(&state), Some("content v1"));
    }

    #[tokio::test(start_paused = true)]
    async fn success_clears_previous_error() {
        let client = QueryClient::new();
        let backend = Backend::new(|n| n <= 4);

        let failed = client.query(hero(), QueryOptions::default(), backend.fetcher()).await;
        assert!(failed.is_error());

        let mut observer = client.observe(hero(), QueryOptions::default(), backend.fetcher());
        let recovered = observer.refetch().await;
        assert!(recovered.error.is_none());
        assert_eq!(data(&recovered), Some("content v5"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_an_observer_mid_retry_keeps_the_cycle_alive() {
        let client = QueryClient::new();
        let backend = Backend::new(|n| n == 1);

        let first = client.observe(hero(), QueryOptions::default(), backend.fetcher());
        sleep(Duration::from_millis(500)).await;
        let waiting = first.state();
        assert_eq!(waiting.status, QueryStatus::Failed);
        assert_eq!(waiting.failure_count, 1);
        drop(first);

        let mut second = client.observe(hero(), QueryOptions::default(), backend.fetcher());
        let state = second.settled().await;
        assert_eq!(data(&state), Some("content v2"));
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent() {
        let client = QueryClient::new();
        let broken = Backend::new(|_| true);
        let healthy = Backend::new(|_| false);

        let mut gallery = client.observe("gallery".into(), QueryOptions::default(), broken.fetcher());
        let ok = client.query(hero(), QueryOptions::default(), healthy.fetcher()).await;
        assert_eq!(data(&ok), Some("content v1"));

        let failed = gallery.settled().await;
        assert!(failed.is_error());
        assert!(client.state::<String>(&hero()).error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_refetch() {
        let client = QueryClient::new();
        let backend = Backend::new(|_| false);

        client.query(hero(), QueryOptions::default(), backend.fetcher()).await;
        client.invalidate(&hero());
        let state = client.query(hero(), QueryOptions::default(), backend.fetcher()).await;
        assert_eq!(data(&state), Some("content v2"));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_during_fetch_marks_its_result_stale() {
        let client = QueryClient::new();
        let backend = Backend::new(|_| false).with_latency(Duration::from_millis(100));

        let mut observer = client.observe(hero(), QueryOptions::default(), backend.fetcher());
        tokio::time::advance(Duration::from_millis(10)).await;
        client.invalidate(&hero());

        let first = observer.settled().await;
        assert_eq!(data(&first), Some("content v1"));
        assert_eq!(backend.calls(), 1);

        let second = client.query(hero(), QueryOptions::default(), backend.fetcher()).await;
        assert_eq!(backend.calls(), 2);
        assert_eq!(data(&second), Some("content v2"));

        let third = client.query(hero(), QueryOptions::default(), backend.fetcher()).await;
        assert_eq!(backend.calls(), 2);
        assert_eq!(data(&third), Some("content v2"));
    }

    #[tokio::test(start_paused = true)]
    async fn removed_entry_discards_in_flight_result() {
        let client = QueryClient::new();
        let backend = Backend::new(|_| false).with_latency(Duration::from_millis(100));

        let mut observer = client.observe(hero(), QueryOptions::default(), backend.fetcher());
        assert!(client.remove(&hero()));
        let state = observer.settled().await;

        assert_eq!(state.status, QueryStatus::Idle);
        assert!(state.data.is_none());
        assert!(client.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn mismatched_type_is_reported() {
        let client = QueryClient::new();
        let backend = Backend::new(|_| false);

        client.query(hero(), QueryOptions::default(), backend.fetcher()).await;
        let state = client.state::<u32>(&hero());
        assert!(state.data.is_none());
        assert!(matches!(
            state.error.as_deref(),
            Some(Error::TypeMismatch { key }) if key == "hero"
        ));
    }

    #[tokio::test]
    async fn unknown_key_is_idle() {
        let client = QueryClient::new();
        let state = client.state::<String>(&hero());
        assert_eq!(state.status, QueryStatus::Idle);
        assert!(!state.is_loading);
        assert_eq!(client.len(), 0);
    }

    #[tokio::test]
    async fn no_retry_policy_fails_once() {
        let client = QueryClient::new();
        let backend = Backend::new(|_| true);
        let options = QueryOptions {
            retry: RetryPolicy::never(),
            ..QueryOptions::default()
        };

        let state = client.query(hero(), options, backend.fetcher()).await;
        assert_eq!(backend.calls(), 1);
        assert!(state.is_error());
    }
}
