//! Adapter configuration and the environment loader that produces it.
//!
//! The environment is read here and nowhere else. Values passed explicitly
//! by the caller always take precedence over environment values.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::mime::MimeStrategy;

pub const ENDPOINT_VAR: &str = "SURYA_ENDPOINT";
pub const TOKEN_VAR: &str = "SURYA_AUTH_TOKEN";
pub const TIMEOUT_VAR: &str = "SURYA_TIMEOUT_SECS";
pub const MIME_TYPE_VAR: &str = "SURYA_MIME_TYPE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Default)]
pub struct SuryaConfig {
    /// Full URL requests are POSTed to. Empty means unconfigured.
    pub endpoint: String,
    /// Bearer token; no `Authorization` header is sent when `None`.
    pub token: Option<String>,
    /// Upper bound applied to each call on top of the caller's context.
    pub timeout: Option<Duration>,
    pub mime: MimeStrategy,
}

impl SuryaConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim().to_string(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = non_empty(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime = match non_empty(mime_type.into()) {
            Some(mime) => MimeStrategy::Fixed(mime),
            None => MimeStrategy::Detect,
        };
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    /// Loads configuration from `SURYA_*` environment variables.
    ///
    /// A missing endpoint is not an error here; calls made with the
    /// resulting config fail instead.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup(ENDPOINT_VAR).unwrap_or_default());

        if let Some(token) = lookup(TOKEN_VAR) {
            config = config.with_token(token.trim());
        }

        if let Some(raw) = lookup(TIMEOUT_VAR).and_then(non_empty) {
            let secs: f64 = raw.trim().parse().map_err(|e: std::num::ParseFloatError| {
                ConfigError::InvalidValue {
                    var: TIMEOUT_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            let timeout =
                Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidValue {
                    var: TIMEOUT_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            config = config.with_timeout(timeout);
        }

        if let Some(mime) = lookup(MIME_TYPE_VAR) {
            config = config.with_mime_type(mime.trim());
        }

        Ok(config)
    }
}

impl fmt::Debug for SuryaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuryaConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("mime", &self.mime)
            .finish()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
