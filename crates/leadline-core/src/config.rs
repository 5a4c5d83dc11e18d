//! Application configuration management.
//!
//! This module handles loading and saving the configuration, which picks the
//! page the form reports as its source, which intake receives leads, and the
//! submission timings.
//!
//! Configuration is stored at `~/.config/leadline/config.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::form::controller::{DEFAULT_RESET_DELAY_MS, DEFAULT_SUBMIT_TIMEOUT_SECS};
use crate::form::FormSettings;
use crate::intake::{HttpIntake, Intake, LogIntake, OutboxIntake};
use crate::site::Page;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "leadline";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Simulated network delay for the log intake, in milliseconds
const DEFAULT_SIMULATED_DELAY_MS: u64 = 1500;

/// Env var that switches delivery to the HTTP intake
pub const ENV_INTAKE_URL: &str = "LEADLINE_INTAKE_URL";

/// Env var that overrides the source page
pub const ENV_SOURCE_PAGE: &str = "LEADLINE_SOURCE_PAGE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntakeConfig {
    Log { simulated_delay_ms: u64 },
    Http { endpoint: String },
    Outbox,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        IntakeConfig::Log {
            simulated_delay_ms: DEFAULT_SIMULATED_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source_page: String,
    pub intake: IntakeConfig,
    pub reset_delay_ms: u64,
    /// `None` waits on the intake indefinitely
    pub submit_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_page: Page::FreeEstimate.path(),
            intake: IntakeConfig::default(),
            reset_delay_ms: DEFAULT_RESET_DELAY_MS,
            submit_timeout_secs: Some(DEFAULT_SUBMIT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for logs
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Directory for the lead outbox
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Apply `LEADLINE_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_INTAKE_URL).ok(),
            std::env::var(ENV_SOURCE_PAGE).ok(),
        );
    }

    fn apply_overrides(&mut self, intake_url: Option<String>, source_page: Option<String>) {
        if let Some(endpoint) = intake_url.filter(|url| !url.trim().is_empty()) {
            self.intake = IntakeConfig::Http { endpoint };
        }
        if let Some(page) = source_page.filter(|page| !page.trim().is_empty()) {
            self.source_page = page;
        }
    }

    /// The configured source page as a canonical site path.
    /// Unknown paths fall back to the free estimate page.
    pub fn resolved_source_page(&self) -> String {
        match Page::from_path(&self.source_page) {
            Some(page) => page.path(),
            None => {
                warn!(source_page = %self.source_page, "Unknown source page, using default");
                Page::FreeEstimate.path()
            }
        }
    }

    pub fn form_settings(&self) -> FormSettings {
        FormSettings {
            reset_delay: Duration::from_millis(self.reset_delay_ms),
            submit_timeout: self.submit_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Build the configured intake collaborator
    pub fn build_intake(&self) -> Result<Arc<dyn Intake>> {
        let intake: Arc<dyn Intake> = match &self.intake {
            IntakeConfig::Log { simulated_delay_ms } => {
                Arc::new(LogIntake::new(Duration::from_millis(*simulated_delay_ms)))
            }
            IntakeConfig::Http { endpoint } => {
                let url = Url::parse(endpoint)
                    .with_context(|| format!("Invalid intake endpoint: {}", endpoint))?;
                Arc::new(HttpIntake::new(url).context("Failed to create HTTP client")?)
            }
            IntakeConfig::Outbox => Arc::new(OutboxIntake::new(self.data_dir()?)),
        };
        Ok(intake)
    }
}
