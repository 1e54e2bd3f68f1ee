//! Background-refreshed result cache.
//!
//! Writers (`register`, `refresh_once`) serialize on one async mutex held for
//! the whole network round trip. Readers never touch that mutex: they load
//! the last published `Snapshot`, which is swapped in only once fully built.

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{self, MissedTickBehavior};

use crate::cache::record::{filter_results, AudioRecord, Filtered};
use crate::observability::metrics;
use crate::search::{RegistrationError, SearchBackend, SearchError, SearchQuery};

/// The result set as of one completed refresh.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// 0 until the first refresh completes, then +1 per completed refresh.
    pub generation: u64,
    pub records: Vec<AudioRecord>,
}

/// Read access to the current snapshot.
pub trait MetaSource: Send + Sync {
    fn snapshot(&self) -> Arc<Snapshot>;
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("standing query has not been registered")]
    NotRegistered,

    #[error("unable to register standing query: {0}")]
    Registration(#[from] RegistrationError),

    #[error("unable to search audio files: {0}")]
    Search(#[from] SearchError),
}

/// Summary of one completed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    pub generation: u64,
    pub kept: usize,
    pub dropped: usize,
}

#[derive(Debug, Default)]
struct WriterState {
    registered: bool,
}

pub struct RefreshCache<B> {
    backend: B,
    query: SearchQuery,
    current: ArcSwap<Snapshot>,
    writer: Mutex<WriterState>,
}

impl<B: SearchBackend> RefreshCache<B> {
    pub fn new(backend: B, query: SearchQuery) -> Self {
        Self {
            backend,
            query,
            current: ArcSwap::from_pointee(Snapshot::default()),
            writer: Mutex::new(WriterState::default()),
        }
    }

    /// Register the standing query with the backend.
    pub async fn register(&self) -> Result<(), CacheError> {
        let mut state = self.writer.lock().await;
        self.backend.register(&self.query).await?;
        state.registered = true;
        Ok(())
    }

    /// Run the query, filter, and publish a new snapshot.
    ///
    /// On error the previous snapshot stays in place untouched.
    pub async fn refresh_once(&self) -> Result<RefreshStats, CacheError> {
        let state = self.writer.lock().await;
        if !state.registered {
            return Err(CacheError::NotRegistered);
        }

        let started = Instant::now();
        let result = match self.backend.query(&self.query).await {
            Ok(result) => result,
            Err(e) => {
                metrics::record_refresh("failure", started);
                return Err(e.into());
            }
        };

        let Filtered { records, dropped } = filter_results(&result);
        let stats = RefreshStats {
            generation: self.current.load().generation + 1,
            kept: records.len(),
            dropped,
        };
        self.current.store(Arc::new(Snapshot {
            generation: stats.generation,
            records,
        }));
        drop(state);

        metrics::record_refresh("success", started);
        metrics::record_cache_records(stats.kept, stats.dropped);
        tracing::debug!(
            generation = stats.generation,
            kept = stats.kept,
            dropped = stats.dropped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Refreshed audio metadata"
        );
        Ok(stats)
    }

    /// The mandatory first refresh. Callers treat its failure as fatal.
    pub async fn initial_refresh(&self) -> Result<RefreshStats, CacheError> {
        let stats = self.refresh_once().await?;
        tracing::info!(
            records = stats.kept,
            dropped = stats.dropped,
            "Initial audio metadata loaded"
        );
        Ok(stats)
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn is_populated(&self) -> bool {
        self.current.load().generation > 0
    }

    /// Refresh every `period` until `shutdown` fires.
    ///
    /// A failed refresh is logged and the stale snapshot keeps being served.
    pub async fn run_forever(&self, period: Duration, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(period_secs = period.as_secs(), "Refresh loop starting");

        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh_once().await {
                        tracing::warn!(
                            error = %e,
                            generation = self.current.load().generation,
                            "Unable to refresh audio metadata, serving stale results"
                        );
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Refresh loop received shutdown signal, exiting");
                    break;
                }
            }
        }
    }
}

impl<B: SearchBackend> MetaSource for RefreshCache<B> {
    fn snapshot(&self) -> Arc<Snapshot> {
        RefreshCache::snapshot(self)
    }
}
