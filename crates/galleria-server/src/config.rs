//! Server configuration from environment variables.
//!
//! | Variable                       | Default              |
//! |--------------------------------|----------------------|
//! | `GALLERIA_BIND_ADDR`           | `127.0.0.1:3000`     |
//! | `GALLERIA_STORAGE`             | `fs` (or `memory`)   |
//! | `GALLERIA_STORAGE_ROOT`        | `./galleria-data`    |
//! | `GALLERIA_PUBLIC_BASE_URL`     | `http://{bind}/files`|
//! | `GALLERIA_STORE_TIMEOUT_SECS`  | `30`                 |
//! | `GALLERIA_LOG_JSON`            | `false`              |
//!
//! Provider settings (`REPLICATE_*`) are read by the Replicate adapter
//! builder.
use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STORAGE_ROOT: &str = "./galleria-data";
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
#[error("invalid value `{value}` for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Fs,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "fs" | "filesystem" => Ok(Self::Fs),
            other => Err(format!("expected `memory` or `fs`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub storage_root: PathBuf,
    /// Base of the download URLs handed out for the filesystem store.
    pub public_base_url: String,
    pub store_timeout: Duration,
    pub log_json: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse(
            "GALLERIA_BIND_ADDR",
            get("GALLERIA_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned()),
        )?;
        let storage = match get("GALLERIA_STORAGE") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError {
                key: "GALLERIA_STORAGE",
                value: raw.clone(),
                reason,
            })?,
            None => StorageBackend::Fs,
        };
        let store_timeout = match get("GALLERIA_STORE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse("GALLERIA_STORE_TIMEOUT_SECS", raw)?),
            None => DEFAULT_STORE_TIMEOUT,
        };
        let log_json = match get("GALLERIA_LOG_JSON") {
            Some(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            None => false,
        };

        Ok(Self {
            bind_addr,
            storage,
            storage_root: get("GALLERIA_STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT)),
            public_base_url: get("GALLERIA_PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://{bind_addr}/files")),
            store_timeout,
            log_json,
        })
    }
}

fn parse<T>(key: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        reason: e.to_string(),
        value: raw,
    })
}
