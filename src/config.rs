use std::env::{self, VarError};
use std::time::Duration;

use crate::error::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const DEFAULT_LOG_FILTER: &str = "places=info";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub request_timeout: Option<Duration>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            request_timeout: None,
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl Config {
    /// Reads `PLACES_API_BASE`, `PLACES_REQUEST_TIMEOUT_SECS` and `RUST_LOG`,
    /// after loading a `.env` file if one is present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let api_base = optional(lookup("PLACES_API_BASE"))?
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.into());

        let request_timeout = match optional(lookup("PLACES_REQUEST_TIMEOUT_SECS"))? {
            Some(secs) => Some(Duration::from_secs(secs.trim().parse::<u64>()?)),
            None => None,
        };

        let log_filter =
            optional(lookup("RUST_LOG"))?.unwrap_or_else(|| DEFAULT_LOG_FILTER.into());

        Ok(Self {
            api_base,
            request_timeout,
            log_filter,
        })
    }
}

fn optional(value: Result<String, VarError>) -> Result<Option<String>, Error> {
    match value {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
