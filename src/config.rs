//! Configuration Module
//!
//! Parses command-line options (with environment fallbacks) into an explicit
//! `Config` that is handed to the store, origin and router at startup.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;

/// Default origin image service.
pub const DEFAULT_ORIGIN: &str = "https://http.cat";

/// Default cap on PUT bodies (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Default origin fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "image_cache")]
#[command(about = "Read-through file cache for a remote image service", long_about = None)]
pub struct Cli {
    /// Server host
    #[arg(short = 'H', long, env = "IMAGE_CACHE_HOST")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "IMAGE_CACHE_PORT")]
    pub port: u16,

    /// Path to cache directory
    #[arg(short, long = "cache", env = "IMAGE_CACHE_DIR")]
    pub cache: PathBuf,

    /// Base URL of the origin image service
    #[arg(long, env = "IMAGE_CACHE_ORIGIN", default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Largest accepted PUT body in bytes
    #[arg(long, env = "IMAGE_CACHE_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Origin fetch timeout in seconds
    #[arg(long, env = "IMAGE_CACHE_FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,
}

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind
    pub host: String,
    /// HTTP server port
    pub port: u16,
    /// Directory holding one `{key}.jpg` file per cached image
    pub cache_dir: PathBuf,
    /// Origin base URL, without trailing slash
    pub origin_url: String,
    /// Largest accepted PUT body in bytes
    pub max_body_bytes: usize,
    /// Origin fetch timeout
    pub fetch_timeout: Duration,
}

impl Config {
    /// Builds a Config from parsed arguments.
    ///
    /// Only presence is validated; the host is not resolved and the cache
    /// directory is not checked for reachability here.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        if cli.host.trim().is_empty() {
            return Err(ConfigError::Missing("host"));
        }
        if cli.cache.as_os_str().is_empty() {
            return Err(ConfigError::Missing("cache"));
        }
        if cli.origin.trim().is_empty() {
            return Err(ConfigError::Missing("origin"));
        }

        Ok(Self {
            host: cli.host,
            port: cli.port,
            cache_dir: cli.cache,
            origin_url: cli.origin.trim_end_matches('/').to_string(),
            max_body_bytes: cli.max_body_bytes,
            fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs),
        })
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cache_dir: PathBuf::from("./cache"),
            origin_url: DEFAULT_ORIGIN.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}
