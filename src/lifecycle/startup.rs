//! Startup orchestration.
//!
//! Config first, then registration, then the initial refresh, then the
//! background loop. The listener binds last so traffic only arrives once the
//! cache is populated. Any error before that point is fatal.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::cache::{CacheError, RefreshCache};
use crate::config::{Config, ConfigError, ConfigLoader, Settings};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::search::{AuthError, AuthMode, HttpSearchBackend, SearchError, SearchQuery};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no listen address: set --listen or CAMLI_APP_LISTEN")]
    MissingListenAddress,

    #[error("refresh interval must be at least one second")]
    InvalidRefreshInterval,

    #[error("invalid auth: {0}")]
    Auth(#[from] AuthError),

    #[error("unable to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("no app config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid search root: {0}")]
    Search(#[from] SearchError),

    #[error("unable to register standing query: {0}")]
    Registration(#[source] CacheError),

    #[error("unable to fetch initial audio metadata: {0}")]
    InitialRefresh(#[source] CacheError),

    #[error("listen on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),
}

/// A populated cache with its refresh loop running.
pub struct Service {
    pub config: Config,
    pub cache: Arc<RefreshCache<HttpSearchBackend>>,
    pub refresher: JoinHandle<()>,
}

/// One line naming this build.
pub fn version_line() -> String {
    format!(
        "audio-player version {} ({}/{})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Load config, register the standing query, populate the cache and spawn
/// the refresh loop, stopped by `shutdown`.
pub async fn start_cache(settings: &Settings, shutdown: &Shutdown) -> Result<Service, StartupError> {
    let period = Duration::from_secs(settings.refresh_interval_secs);
    if period.is_zero() {
        return Err(StartupError::InvalidRefreshInterval);
    }

    let auth: AuthMode = settings.auth.parse()?;
    let client = reqwest::Client::builder()
        .user_agent(concat!("audio-player/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(StartupError::Client)?;

    let config = ConfigLoader::new(client.clone(), auth.clone())
        .load(settings.config_url.as_deref(), settings.masterquery_url.as_deref())
        .await?;

    let backend = HttpSearchBackend::new(
        client,
        auth,
        &config.search_root,
        config.query_endpoint.clone(),
    )?;
    let cache = Arc::new(RefreshCache::new(backend, SearchQuery::audio_files()));

    cache.register().await.map_err(StartupError::Registration)?;
    cache
        .initial_refresh()
        .await
        .map_err(StartupError::InitialRefresh)?;

    let refresher = {
        let cache = cache.clone();
        let stop = shutdown.subscribe();
        tokio::spawn(async move { cache.run_forever(period, stop).await })
    };

    Ok(Service {
        config,
        cache,
        refresher,
    })
}

/// Run the whole service until Ctrl+C.
pub async fn run(settings: Settings) -> Result<(), StartupError> {
    let listen = settings
        .listen
        .clone()
        .filter(|addr| !addr.is_empty())
        .ok_or(StartupError::MissingListenAddress)?;

    let shutdown = Shutdown::new();
    let service = start_cache(&settings, &shutdown).await?;

    let listener = TcpListener::bind(&listen)
        .await
        .map_err(|source| StartupError::Bind {
            addr: listen.clone(),
            source,
        })?;

    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    let server = HttpServer::new(service.cache.clone(), settings.assets.as_deref());
    let served = server.run(listener, shutdown.subscribe()).await;

    shutdown.trigger();
    if let Err(e) = service.refresher.await {
        tracing::warn!(error = %e, "Refresh loop ended abnormally");
    }

    served.map_err(StartupError::Serve)
}
