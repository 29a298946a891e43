// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::services::detection::risk_monitor::DEFAULT_ALERT_THRESHOLD;
use crate::services::detection::transcription::DEFAULT_SIMILARITY_THRESHOLD;

const MAX_BACKUPS: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to {action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

fn io_err<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(std::io::Error) -> ConfigError + 'a {
    move |source| ConfigError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            risk: RiskConfig::default(),
            transcription: TranscriptionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskConfig {
    /// Keyword hits per student before an alert is raised.
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionConfig {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Session log files kept on startup cleanup.
    #[serde(default = "default_keep_files")]
    pub keep_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            keep_files: default_keep_files(),
        }
    }
}

fn default_version() -> String { env!("CARGO_PKG_VERSION").to_string() }
fn default_alert_threshold() -> u32 { DEFAULT_ALERT_THRESHOLD }
fn default_similarity_threshold() -> f64 { DEFAULT_SIMILARITY_THRESHOLD }
fn default_keep_files() -> usize { 30 }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("schoolhub"))
    }

    /// Store at the default location, if the platform has one.
    pub fn open_default() -> Option<Self> {
        Self::default_config_dir().map(Self::new)
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(io_err("create", &self.config_dir))
    }

    /// Load configuration from file; a missing file yields defaults.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            debug!(path = %self.config_file.display(), "config.missing_using_defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(io_err("read", &self.config_file))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content).map_err(io_err("write", &self.config_file))?;
        info!(path = %self.config_file.display(), "config.saved");
        Ok(())
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(io_err("create", &backup_dir))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(io_err("back up", &self.config_file))?;

        self.cleanup_old_backups(&backup_dir, MAX_BACKUPS)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(io_err("read", backup_dir))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Timestamped names sort oldest first
        entries.sort_by_key(|e| e.file_name());

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}
