//! Configuration for the webhook bot

pub mod file;

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::limiter::RateLimitConfig;
use crate::message::MessageBody;
use crate::Result;

/// Default API origin
pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn";

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Callback run on every rendered body before it is sent
///
/// Returning an error aborts the send before admission is requested.
pub type AfterBuildHook = Arc<dyn Fn(&mut MessageBody) -> Result<()> + Send + Sync>;

/// Options for constructing a [`Bot`](crate::Bot)
#[must_use]
pub struct BotOptions {
    /// API origin; blank selects [`DEFAULT_BASE_URL`]
    pub base_url: String,

    /// Admission control capacities
    pub limits: RateLimitConfig,

    /// Signing secret; requests are unsigned when `None`
    pub secret: Option<SecretString>,

    /// HTTP request timeout
    pub request_timeout: Duration,

    /// Optional body rewrite hook
    pub after_build: Option<AfterBuildHook>,
}

impl Default for BotOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limits: RateLimitConfig::default(),
            secret: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            after_build: None,
        }
    }
}

impl fmt::Debug for BotOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotOptions")
            .field("base_url", &self.base_url)
            .field("limits", &self.limits)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .field("after_build", &self.after_build.is_some())
            .finish()
    }
}

impl BotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim().to_string();
        self
    }

    pub const fn limits(mut self, limits: RateLimitConfig) -> Self {
        self.limits = limits;
        self
    }

    /// Calls per second; `0` for the default, `-1` disables admission control
    pub const fn limit_per_second(mut self, n: i64) -> Self {
        self.limits.per_second = n;
        self
    }

    /// Calls per minute; `0` for the default, `-1` disables admission control
    pub const fn limit_per_minute(mut self, n: i64) -> Self {
        self.limits.per_minute = n;
        self
    }

    /// Signing secret; blank clears it
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = non_blank(secret.into()).map(SecretString::from);
        self
    }

    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn after_build<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut MessageBody) -> Result<()> + Send + Sync + 'static,
    {
        self.after_build = Some(Arc::new(hook));
        self
    }

    /// Base URL with surrounding whitespace and trailing slashes removed
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        let url = self.base_url.trim().trim_end_matches('/');
        if url.is_empty() { DEFAULT_BASE_URL } else { url }
    }
}

/// Resolved configuration: where to send and how
#[derive(Debug, Default)]
pub struct Config {
    /// Webhook URL or bare token
    pub webhook: Option<String>,

    /// Bot options
    pub options: BotOptions,
}

impl Config {
    /// Load configuration from the environment and the default config file
    ///
    /// Priority is env > toml > default.
    #[must_use]
    pub fn load() -> Self {
        Self::overlay(file::load_config_file())
    }

    /// Load configuration from the environment and a specific config file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self> {
        let fc = file::read_config_file(path)?;
        tracing::info!(path = %path.display(), "loaded config file");
        Ok(Self::overlay(fc))
    }

    fn overlay(fc: file::BotConfigFile) -> Self {
        let webhook = env("FS_BOT_WEBHOOK").or(fc.webhook).and_then(non_blank);

        let secret = env("FS_BOT_SECRET_KEY")
            .or(fc.secret_key)
            .and_then(non_blank)
            .map(SecretString::from);

        let base_url = env("FS_BOT_BASE_URL")
            .or(fc.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let limits = RateLimitConfig {
            per_second: env_parse("FS_BOT_LIMIT_PER_SECOND")
                .or(fc.limits.per_second)
                .unwrap_or(crate::limiter::DEFAULT_PER_SECOND),
            per_minute: env_parse("FS_BOT_LIMIT_PER_MINUTE")
                .or(fc.limits.per_minute)
                .unwrap_or(crate::limiter::DEFAULT_PER_MINUTE),
        };

        let request_timeout = fc
            .request_timeout_secs
            .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);

        Self {
            webhook,
            options: BotOptions {
                base_url,
                limits,
                secret,
                request_timeout,
                after_build: None,
            },
        }
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_parse(key: &str) -> Option<i64> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid integer");
            None
        }
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}
