//! Configuration schema definitions.
//!
//! `Settings` is what the process is started with (flags and environment).
//! `Config` is the validated result of the startup config fetch, immutable
//! for the life of the process.

use clap::Parser;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

pub const CONFIG_URL_ENV: &str = "CAMLI_APP_CONFIG_URL";
pub const MASTERQUERY_URL_ENV: &str = "CAMLI_APP_MASTERQUERY_URL";
pub const LISTEN_ENV: &str = "CAMLI_APP_LISTEN";

/// Process settings.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "audio-player",
    about = "Serves the audio files of a blob store to a web player",
    disable_version_flag = true
)]
pub struct Settings {
    /// URL to fetch the app config document from.
    #[arg(long, env = "CAMLI_APP_CONFIG_URL")]
    pub config_url: Option<String>,

    /// URL the standing query is registered at.
    #[arg(long, env = "CAMLI_APP_MASTERQUERY_URL")]
    pub masterquery_url: Option<String>,

    /// Address to serve HTTP on.
    #[arg(long, env = "CAMLI_APP_LISTEN")]
    pub listen: Option<String>,

    /// none, userpass:<user>:<password> or token:<token>.
    #[arg(long, env = "CAMLI_AUTH", default_value = "none", hide_env_values = true)]
    pub auth: String,

    /// Serve static files from this directory instead of the bundled player UI.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Seconds between background refreshes.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_interval_secs: u64,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    pub metrics_address: Option<SocketAddr>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print version and build info, then exit.
    #[arg(long)]
    pub version: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_url: None,
            masterquery_url: None,
            listen: None,
            auth: "none".to_string(),
            assets: None,
            refresh_interval_secs: 60,
            metrics_address: None,
            log_level: "info".to_string(),
            version: false,
        }
    }
}

/// Startup configuration, loaded once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the app config document came from.
    pub config_endpoint: Url,
    /// Where the standing query is registered.
    pub query_endpoint: Url,
    /// Base URL of the search service; always ends in `/`.
    pub search_root: Url,
}

/// The remote app config document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    pub search_root: Url,
}
