use std::time::Duration;

use crate::domain::ValidationError;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.sendinblue.com/v2.0";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub(crate) const DEFAULT_API_KEY_HEADER: &str = "api-key";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "SENDINBLUE_API_KEY";
/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "SENDINBLUE_BASE_URL";
/// Environment variable overriding [`ClientConfig::timeout`], in whole seconds.
pub const TIMEOUT_ENV: &str = "SENDINBLUE_TIMEOUT_SECS";

/// Settings fixed for the lifetime of a [`crate::SendinblueClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix of every resource path (`/email`, `/template/{id}`, `/sms`).
    ///
    /// Validated as an absolute `http`/`https` URL when the client is built.
    pub base_url: String,
    /// Bound on the whole round trip of one call.
    pub timeout: Duration,
    /// Header carrying the API key.
    pub api_key_header: String,
    /// `User-Agent` sent with every request; reqwest's default when `None`.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            api_key_header: DEFAULT_API_KEY_HEADER.to_owned(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Apply [`BASE_URL_ENV`] and [`TIMEOUT_ENV`] overrides read through `lookup`.
    pub(crate) fn with_overrides(
        mut self,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ValidationError> {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            let seconds = timeout
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .ok_or_else(|| ValidationError::InvalidNumber {
                    field: TIMEOUT_ENV,
                    input: timeout.clone(),
                })?;
            self.timeout = Duration::from_secs(seconds);
        }
        Ok(self)
    }
}
