// Client configuration: where the Floriday media API lives and how to
// authenticate against it. Values come from the environment once at startup
// and are then handed explicitly to `FloridayClient::new`.

use crate::error::{Error, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.floriday.io";
pub const DEFAULT_MEDIA_ENDPOINT: &str = "/suppliers/v1/media";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Settings for talking to one Floriday media endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub media_endpoint: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config for `base_url` with the default endpoint and timeout.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            token: token.into(),
            media_endpoint: DEFAULT_MEDIA_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    /// Read `FLORIDAY_BASE_URL`, `FLORIDAY_TOKEN`, `FLORIDAY_MEDIA_ENDPOINT`
    /// and `FLORIDAY_TIMEOUT_SECONDS`. A missing token is not an error here;
    /// the client refuses to be built from it instead.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("FLORIDAY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let token = lookup("FLORIDAY_TOKEN").unwrap_or_default();
        let media_endpoint =
            lookup("FLORIDAY_MEDIA_ENDPOINT").unwrap_or_else(|| DEFAULT_MEDIA_ENDPOINT.into());
        let timeout_seconds = match lookup("FLORIDAY_TIMEOUT_SECONDS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Configuration(format!(
                    "FLORIDAY_TIMEOUT_SECONDS is geen geldig aantal seconden: {raw}"
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(ClientConfig {
            base_url,
            token,
            media_endpoint,
            timeout: Duration::from_secs(timeout_seconds),
        })
    }

    /// Full media URL. Trailing slashes on the base URL are dropped so the
    /// endpoint never produces a double slash.
    pub fn media_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.media_endpoint
        )
    }
}
