use crate::batch::DEFAULT_MAX_BATCH;
use crate::error::{ConvertError, ConvertResult};
use crate::export::DEFAULT_ARCHIVE_NAME;
use crate::i18n::Language;
use crate::identity;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Language of user-facing messages
    pub language: Language,
    /// Largest accepted batch
    pub max_batch: usize,
    /// Delay before a transient notification is dismissed
    pub notify_secs: u64,
    /// File name of the batch archive
    pub archive_name: String,
    /// Where the device id is stored
    pub data_dir: PathBuf,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            max_batch: DEFAULT_MAX_BATCH,
            notify_secs: 5,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            data_dir: identity::default_data_dir(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source.
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();
        Self {
            language: lookup("DOCJSON_LANG")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.language),
            max_batch: lookup("DOCJSON_MAX_BATCH")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_batch),
            notify_secs: lookup("DOCJSON_NOTIFY_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.notify_secs),
            archive_name: lookup("DOCJSON_ARCHIVE_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.archive_name),
            data_dir: lookup("DOCJSON_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("DOCJSON_LOG_FORMAT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_format),
        }
    }

    pub fn validate(&self) -> ConvertResult<()> {
        if self.max_batch == 0 {
            return Err(ConvertError::InvalidConfig(
                "DOCJSON_MAX_BATCH must be at least 1".to_string(),
            ));
        }
        if !self.archive_name.to_lowercase().ends_with(".zip") {
            return Err(ConvertError::InvalidConfig(format!(
                "archive name must end with .zip: {}",
                self.archive_name
            )));
        }
        Ok(())
    }

    pub fn notify_delay(&self) -> Duration {
        Duration::from_secs(self.notify_secs)
    }
}
