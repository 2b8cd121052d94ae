// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::chat::TypingConfig;
use crate::error::{InsightError, InsightResult};
use crate::progress::ProgressConfig;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub max_upload_bytes: u64,
    pub request_timeout: Option<Duration>,
    pub progress: ProgressConfig,
    pub typing: TypingConfig,
    pub download_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            request_timeout: None,
            progress: ProgressConfig::default(),
            typing: TypingConfig::default(),
            download_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Reads `VIDEO_INSIGHT_*` variables, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> InsightResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> InsightResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("VIDEO_INSIGHT_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(mb) = parse_u64(&lookup, "VIDEO_INSIGHT_MAX_UPLOAD_MB")? {
            config.max_upload_bytes = mb.checked_mul(1024 * 1024).ok_or_else(|| {
                InsightError::Config(format!("VIDEO_INSIGHT_MAX_UPLOAD_MB is too large: {}", mb))
            })?;
        }
        config.request_timeout = parse_u64(&lookup, "VIDEO_INSIGHT_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);

        if let Some(ms) = parse_u64(&lookup, "VIDEO_INSIGHT_PROGRESS_TOTAL_MS")? {
            config.progress.total_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, "VIDEO_INSIGHT_PROGRESS_TICK_MS")? {
            config.progress.tick = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, "VIDEO_INSIGHT_PROGRESS_SETTLE_MS")? {
            config.progress.settle_delay = Duration::from_millis(ms);
        }
        config.progress.validate()?;

        if let Some(ms) = parse_u64(&lookup, "VIDEO_INSIGHT_CHAT_THINKING_MS")? {
            config.typing.thinking_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, "VIDEO_INSIGHT_CHAT_CHAR_MS")? {
            config.typing.char_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, "VIDEO_INSIGHT_CHAT_JITTER_MS")? {
            config.typing.jitter = Duration::from_millis(ms);
        }

        if let Some(dir) = lookup("VIDEO_INSIGHT_DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> InsightResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| InsightError::Config(format!("{} must be a whole number ({}): {:?}", key, e, raw))),
    }
}
