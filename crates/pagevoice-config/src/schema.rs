//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Command engine tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Transcriptions below this confidence are rejected.
    #[serde(default)]
    pub min_command_confidence: f32,

    /// How far a model must beat the keyword rules to override them.
    #[serde(default = "default_model_margin")]
    pub model_margin: f32,

    /// Optional cap on search and navigation plan length. Unset keeps
    /// every discovered control as a fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_candidates: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_command_confidence: 0.0,
            model_margin: default_model_margin(),
            max_candidates: None,
        }
    }
}

fn default_model_margin() -> f32 {
    0.1
}

/// Voice session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bound on every wait across the page or transcription boundary.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    8000
}

/// Which page implementation to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageBackend {
    /// A live Chrome tab over the DevTools protocol.
    #[default]
    Cdp,
    /// An in-memory page loaded from a JSON snapshot.
    Snapshot,
}

/// Page backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default)]
    pub backend: PageBackend,

    #[serde(default = "default_cdp_endpoint")]
    pub cdp_endpoint: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            backend: PageBackend::default(),
            cdp_endpoint: default_cdp_endpoint(),
            snapshot_path: None,
        }
    }
}

fn default_cdp_endpoint() -> String {
    "http://localhost:9222".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: default_log_dir(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "~/.pagevoice/logs".to_string()
}
