//! Periodic zone refresh.
//!
//! A [`ZoneRefresher`] keeps a [`ZoneDirectory`] current by polling a
//! [`ZoneSource`] on two independent cadences: the list interval discovers
//! which zones exist, the zone interval refetches the detail of every tracked
//! zone.
//!
//! Once started, a single task owns all refresh state. Fetches run as spawned
//! tasks and report back over a channel; the owning task applies completions
//! one at a time and publishes a new directory snapshot after each change.
//!
//! Every fetch carries a sequence number. A completion whose number is not
//! greater than the last one applied for the same zone is dropped, so a slow
//! response can never overwrite a newer one.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use zonewatch_adapters::AdapterError;
use zonewatch_types::{Zone, ZoneKey};

use crate::directory::{DirectoryWatch, ZoneDirectory};
use crate::source::ZoneSource;

const DEFAULT_LIST_INTERVAL: Duration = Duration::from_secs(20);
const DEFAULT_ZONE_INTERVAL: Duration = Duration::from_secs(2);
const MIN_INTERVAL: Duration = Duration::from_millis(10);
const COMPLETION_BUFFER: usize = 64;

/// Whether the refresher is waiting on any fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshState {
    Idle,
    /// At least one fetch is in flight.
    Refreshing,
}

/// Polls a zone source and maintains a directory of zones.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use zonewatch::{SimulatedSource, ZoneRefresher};
///
/// #[tokio::main]
/// async fn main() {
///     let refresher = ZoneRefresher::builder(Arc::new(SimulatedSource::new()))
///         .zone_interval(Duration::from_secs(1))
///         .build();
///
///     let handle = refresher.start();
///     let mut watch = handle.subscribe();
///     while let Some(directory) = watch.changed().await {
///         println!("{} zones", directory.len());
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ZoneRefresher {
    source: Arc<dyn ZoneSource>,
    list_interval: Option<Duration>,
    zone_interval: Duration,
    pinned: BTreeSet<ZoneKey>,
}

impl ZoneRefresher {
    /// Create a builder for a refresher over `source`.
    pub fn builder(source: Arc<dyn ZoneSource>) -> ZoneRefresherBuilder {
        ZoneRefresherBuilder::new(source)
    }

    pub fn source(&self) -> &dyn ZoneSource {
        self.source.as_ref()
    }

    /// Discovery cadence, `None` when discovery is disabled.
    pub fn list_interval(&self) -> Option<Duration> {
        self.list_interval
    }

    pub fn zone_interval(&self) -> Duration {
        self.zone_interval
    }

    /// Start refreshing in a background task.
    ///
    /// Must be called from within a tokio runtime. The returned handle stops
    /// the task when dropped.
    pub fn start(self) -> RefreshHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (directory_tx, directory_rx) = watch::channel(ZoneDirectory::new());
        let (state_tx, state_rx) = watch::channel(RefreshState::Idle);

        info!(
            "Starting zone refresher on {} (list every {:?}, zones every {:?})",
            self.source.description(),
            self.list_interval,
            self.zone_interval
        );

        let task = tokio::spawn(self.run(stop_rx, directory_tx, state_tx));

        RefreshHandle {
            stop_tx,
            directory: directory_rx,
            state: state_rx,
            task,
        }
    }

    /// Run a single cycle: list (if discovery is enabled), then fetch every
    /// tracked zone concurrently.
    pub async fn refresh_once(&self) -> ZoneDirectory {
        let mut sync = SyncState::new(self.pinned.clone());

        if self.list_interval.is_some() {
            let seq = sync.begin();
            let source = self.source.clone();
            let result = guarded(async move { source.list_zones().await }).await;
            sync.apply_list(seq, result);
        }

        let mut fetches = JoinSet::new();
        for key in sync.tracked() {
            let seq = sync.begin();
            let source = self.source.clone();
            fetches.spawn(async move {
                let fetch_key = key.clone();
                let result = guarded(async move { source.get_zone(&fetch_key).await }).await;
                (key, seq, result)
            });
        }

        while let Some(joined) = fetches.join_next().await {
            match joined {
                Ok((key, seq, result)) => {
                    sync.apply_zone(key, seq, result);
                }
                Err(e) => warn!("Zone fetch task failed: {}", e),
            }
        }

        sync.directory
    }

    async fn run(
        self,
        mut stop_rx: watch::Receiver<bool>,
        directory_tx: watch::Sender<ZoneDirectory>,
        state_tx: watch::Sender<RefreshState>,
    ) {
        let (done_tx, mut done_rx) = mpsc::channel(COMPLETION_BUFFER);
        let mut sync = SyncState::new(self.pinned.clone());
        let mut list_timer = self.list_interval.map(timer);
        let mut zone_timer = timer(self.zone_interval);

        loop {
            tokio::select! {
                _ = tick(&mut list_timer) => {
                    let seq = sync.begin();
                    self.spawn_list(seq, &done_tx);
                }
                _ = zone_timer.tick() => {
                    let keys = sync.tracked();
                    debug!("Refreshing {} zones", keys.len());
                    for key in keys {
                        let seq = sync.begin();
                        self.spawn_zone(key, seq, &done_tx);
                    }
                }
                Some(completion) = done_rx.recv() => {
                    let changed = match completion {
                        Completion::List { seq, result } => {
                            let outcome = sync.apply_list(seq, result);
                            for key in outcome.added {
                                let seq = sync.begin();
                                self.spawn_zone(key, seq, &done_tx);
                            }
                            outcome.removed > 0
                        }
                        Completion::Zone { key, seq, result } => sync.apply_zone(key, seq, result),
                    };
                    if changed {
                        directory_tx.send_replace(sync.directory.clone());
                    }
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }

            let current = sync.state();
            state_tx.send_if_modified(|state| {
                let modified = *state != current;
                *state = current;
                modified
            });
        }

        state_tx.send_replace(RefreshState::Idle);
        info!("Zone refresher stopped");
    }

    fn spawn_list(&self, seq: u64, done_tx: &mpsc::Sender<Completion>) {
        let source = self.source.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = guarded(async move { source.list_zones().await }).await;
            // The refresher may already be gone
            let _ = done_tx.send(Completion::List { seq, result }).await;
        });
    }

    fn spawn_zone(&self, key: ZoneKey, seq: u64, done_tx: &mpsc::Sender<Completion>) {
        let source = self.source.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let fetch_key = key.clone();
            let result = guarded(async move { source.get_zone(&fetch_key).await }).await;
            let _ = done_tx.send(Completion::Zone { key, seq, result }).await;
        });
    }
}

/// Run a fetch on its own task so a panicking source still completes with
/// an error.
async fn guarded<T, F>(fetch: F) -> Result<T, AdapterError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, AdapterError>> + Send + 'static,
{
    tokio::spawn(fetch)
        .await
        .unwrap_or_else(|e| Err(AdapterError::Aborted(e.to_string())))
}

fn timer(period: Duration) -> Interval {
    let mut timer = tokio::time::interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Builder for ZoneRefresher.
#[derive(Debug)]
pub struct ZoneRefresherBuilder {
    source: Arc<dyn ZoneSource>,
    list_interval: Option<Duration>,
    zone_interval: Duration,
    pinned: BTreeSet<ZoneKey>,
}

impl ZoneRefresherBuilder {
    fn new(source: Arc<dyn ZoneSource>) -> Self {
        Self {
            source,
            list_interval: Some(DEFAULT_LIST_INTERVAL),
            zone_interval: DEFAULT_ZONE_INTERVAL,
            pinned: BTreeSet::new(),
        }
    }

    /// Set the discovery interval (default: 20 seconds).
    pub fn list_interval(mut self, interval: Duration) -> Self {
        self.list_interval = Some(interval);
        self
    }

    /// Disable discovery; only tracked zones are refreshed.
    pub fn without_discovery(mut self) -> Self {
        self.list_interval = None;
        self
    }

    /// Set the detail refresh interval (default: 2 seconds).
    pub fn zone_interval(mut self, interval: Duration) -> Self {
        self.zone_interval = interval;
        self
    }

    /// Always refresh this zone, whether or not the list reports it.
    pub fn track(mut self, key: ZoneKey) -> Self {
        self.pinned.insert(key);
        self
    }

    pub fn track_all(mut self, keys: impl IntoIterator<Item = ZoneKey>) -> Self {
        self.pinned.extend(keys);
        self
    }

    /// Build the refresher. Intervals shorter than 10ms are raised to 10ms with a warning.
    pub fn build(self) -> ZoneRefresher {
        ZoneRefresher {
            source: self.source,
            list_interval: self.list_interval.map(|i| raise_interval("list", i)),
            zone_interval: raise_interval("zone", self.zone_interval),
            pinned: self.pinned,
        }
    }
}

fn raise_interval(name: &str, interval: Duration) -> Duration {
    if interval < MIN_INTERVAL {
        warn!(
            "{} interval {:?} is below {:?}, using {:?}",
            name, interval, MIN_INTERVAL, MIN_INTERVAL
        );
        return MIN_INTERVAL;
    }
    interval
}

/// Handle to a running refresher.
///
/// Dropping the handle stops the refresher as well.
#[derive(Debug)]
pub struct RefreshHandle {
    stop_tx: watch::Sender<bool>,
    directory: watch::Receiver<ZoneDirectory>,
    state: watch::Receiver<RefreshState>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop refreshing. Calling this more than once is harmless.
    ///
    /// Fetches already in flight are not cancelled; their results are
    /// discarded.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Stop and wait for the refresh task to exit.
    pub async fn join(self) {
        self.stop();
        if let Err(e) = self.task.await {
            warn!("Zone refresher task failed: {}", e);
        }
    }

    /// Receive every published directory snapshot.
    pub fn subscribe(&self) -> DirectoryWatch {
        DirectoryWatch::new(self.directory.clone())
    }

    /// The latest published directory.
    pub fn directory(&self) -> ZoneDirectory {
        self.directory.borrow().clone()
    }

    pub fn state(&self) -> RefreshState {
        *self.state.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[derive(Debug)]
enum Completion {
    List {
        seq: u64,
        result: Result<Vec<ZoneKey>, AdapterError>,
    },
    Zone {
        key: ZoneKey,
        seq: u64,
        result: Result<Zone, AdapterError>,
    },
}

#[derive(Debug, Default, PartialEq)]
struct ListOutcome {
    /// Keys tracked for the first time, to be fetched right away.
    added: Vec<ZoneKey>,
    removed: usize,
}

/// Refresh bookkeeping, owned by one task.
#[derive(Debug)]
struct SyncState {
    pinned: BTreeSet<ZoneKey>,
    listed: BTreeSet<ZoneKey>,
    next_seq: u64,
    applied: HashMap<ZoneKey, u64>,
    list_applied: u64,
    in_flight: usize,
    directory: ZoneDirectory,
}

impl SyncState {
    fn new(pinned: BTreeSet<ZoneKey>) -> Self {
        Self {
            pinned,
            listed: BTreeSet::new(),
            next_seq: 0,
            applied: HashMap::new(),
            list_applied: 0,
            in_flight: 0,
            directory: ZoneDirectory::new(),
        }
    }

    fn tracked(&self) -> Vec<ZoneKey> {
        self.pinned.union(&self.listed).cloned().collect()
    }

    fn is_tracked(&self, key: &ZoneKey) -> bool {
        self.pinned.contains(key) || self.listed.contains(key)
    }

    fn state(&self) -> RefreshState {
        if self.in_flight > 0 {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    /// Sequence number for a fetch about to start.
    fn begin(&mut self) -> u64 {
        self.next_seq += 1;
        self.in_flight += 1;
        self.next_seq
    }

    fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Apply a detail completion. Returns whether the directory changed.
    fn apply_zone(&mut self, key: ZoneKey, seq: u64, result: Result<Zone, AdapterError>) -> bool {
        self.complete();

        if !self.is_tracked(&key) {
            debug!("Dropping result for untracked zone {}", key);
            return false;
        }
        if self.applied.get(&key).is_some_and(|&last| last >= seq) {
            debug!("Dropping stale result #{} for zone {}", seq, key);
            return false;
        }
        self.applied.insert(key.clone(), seq);

        match result {
            Ok(zone) if zone.key == key => {
                self.directory.replace(zone);
            }
            Ok(zone) => {
                warn!("Source answered {} when asked for {}", zone.key, key);
                let reason = format!("source returned zone {}", zone.key);
                self.directory.mark_unavailable(key, reason);
            }
            Err(e) => {
                warn!("Failed to refresh zone {}: {}", key, e);
                self.directory.mark_unavailable(key, e.to_string());
            }
        }
        true
    }

    /// Apply a list completion.
    fn apply_list(&mut self, seq: u64, result: Result<Vec<ZoneKey>, AdapterError>) -> ListOutcome {
        self.complete();

        if seq <= self.list_applied {
            debug!("Dropping stale zone list #{}", seq);
            return ListOutcome::default();
        }

        let listed: BTreeSet<ZoneKey> = match result {
            Ok(keys) => keys.into_iter().collect(),
            Err(e) => {
                warn!("Failed to list zones: {}", e);
                return ListOutcome::default();
            }
        };
        self.list_applied = seq;

        let added: Vec<ZoneKey> = listed
            .iter()
            .filter(|key| !self.is_tracked(key))
            .cloned()
            .collect();

        let dropped: Vec<ZoneKey> = self
            .listed
            .difference(&listed)
            .filter(|key| !self.pinned.contains(*key))
            .cloned()
            .collect();

        let mut removed = 0;
        for key in &dropped {
            self.applied.remove(key);
            if self.directory.remove(key) {
                removed += 1;
            }
        }

        if !added.is_empty() || !dropped.is_empty() {
            info!(
                "Zone list changed: {} added, {} removed",
                added.len(),
                dropped.len()
            );
        }

        self.listed = listed;
        ListOutcome { added, removed }
    }
}
