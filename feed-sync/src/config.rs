use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Cursor sent by `refresh()` and `item_created()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshCursor {
    /// Ask for the latest page
    #[default]
    Absent,
    /// Ask only for items newer than the current head
    Head,
}

impl FromStr for RefreshCursor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absent" => Ok(RefreshCursor::Absent),
            "head" => Ok(RefreshCursor::Head),
            _ => Err(format!("Unknown refresh cursor: {}", s)),
        }
    }
}

/// What a resynchronization does to the items already held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResyncMode {
    /// Keep the items and merge the fresh head page into them
    #[default]
    Merge,
    /// Drop the items before the fresh head page is requested
    Replace,
}

impl FromStr for ResyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(ResyncMode::Merge),
            "replace" => Ok(ResyncMode::Replace),
            _ => Err(format!("Unknown resync mode: {}", s)),
        }
    }
}

/// Settings consumed by the sync engine and its runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub refresh_cursor: RefreshCursor,
    pub resync_mode: ResyncMode,
    /// Upper bound on a single fetch; elapsing counts as a fetch failure
    pub fetch_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_cursor: RefreshCursor::default(),
            resync_mode: ResyncMode::default(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the micropost API
    pub api_url: String,
    /// Bearer token; absent means the session is not authenticated
    pub auth_token: Option<String>,
    /// Items requested per page
    pub page_size: u32,
    pub fetch_timeout: Duration,
    pub refresh_cursor: RefreshCursor,
    pub resync_mode: ResyncMode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_size = positive(
            parse_or(&var, "FEED_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            "FEED_PAGE_SIZE",
        )?;
        let fetch_timeout_secs = positive(
            parse_or(&var, "FEED_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?,
            "FEED_FETCH_TIMEOUT_SECS",
        )?;

        Ok(Self {
            api_url: var("MICROPOST_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_token: var("MICROPOST_AUTH_TOKEN").filter(|t| !t.trim().is_empty()),
            page_size,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            refresh_cursor: parse_or(&var, "FEED_REFRESH_CURSOR", RefreshCursor::default())?,
            resync_mode: parse_or(&var, "FEED_RESYNC_MODE", ResyncMode::default())?,
        })
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            refresh_cursor: self.refresh_cursor,
            resync_mode: self.resync_mode,
            fetch_timeout: self.fetch_timeout,
        }
    }
}

fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Reject a zero page size or timeout
fn positive<T>(value: T, key: &'static str) -> Result<T, ConfigError>
where
    T: Default + PartialEq + ToString,
{
    if value == T::default() {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}
