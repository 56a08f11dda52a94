//! TOML configuration file loading
//!
//! Supports `~/.config/feishu-bot/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.
//!
//! ```toml
//! webhook = "https://open.feishu.cn/open-apis/bot/v2/hook/xxxx"
//! secret_key = "..."
//! request_timeout_secs = 5
//!
//! [limits]
//! per_second = 5
//! per_minute = 100
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct BotConfigFile {
    /// Webhook URL or bare token
    pub webhook: Option<String>,

    /// Signing secret
    pub secret_key: Option<String>,

    /// API origin, e.g. `https://open.larksuite.com`
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,

    /// Admission control capacities
    #[serde(default)]
    pub limits: LimitsFileConfig,
}

/// `[limits]` table
#[derive(Debug, Default, Deserialize)]
pub struct LimitsFileConfig {
    pub per_second: Option<i64>,
    pub per_minute: Option<i64>,
}

/// Load the TOML config file from the standard path
///
/// Returns `BotConfigFile::default()` if the file doesn't exist or can't be parsed.
#[must_use]
pub fn load_config_file() -> BotConfigFile {
    let Some(path) = config_file_path() else {
        return BotConfigFile::default();
    };

    if !path.exists() {
        return BotConfigFile::default();
    }

    match read_config_file(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "loaded config file");
            config
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            BotConfigFile::default()
        }
    }
}

/// Read and parse a specific config file
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML
pub fn read_config_file(path: &Path) -> Result<BotConfigFile> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Return the config file path: `~/.config/feishu-bot/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("feishu-bot").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let fc: BotConfigFile = toml::from_str(
            r#"
            webhook = "tok"

            [limits]
            per_minute = 20
            "#,
        )
        .unwrap();
        assert_eq!(fc.webhook.as_deref(), Some("tok"));
        assert_eq!(fc.limits.per_second, None);
        assert_eq!(fc.limits.per_minute, Some(20));
        assert!(fc.secret_key.is_none());
    }

    #[test]
    fn empty_file_is_default() {
        let fc: BotConfigFile = toml::from_str("").unwrap();
        assert!(fc.webhook.is_none());
        assert!(fc.request_timeout_secs.is_none());
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let err = read_config_file(Path::new("/nonexistent/feishu-bot.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn read_invalid_file_is_toml_error() {
        let path = std::env::temp_dir().join(format!("feishu-bot-{}.toml", std::process::id()));
        std::fs::write(&path, "webhook = [").unwrap();
        let err = read_config_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, crate::Error::Toml(_)));
    }
}
