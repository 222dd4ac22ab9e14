//! Application settings and configuration
//!
//! This module provides configuration management for the application,
//! loading settings from environment variables with sensible defaults.

use crate::services::fetcher::{FetcherConfig, DEFAULT_DRIVE_BASE, DEFAULT_SHEETS_BASE};
use crate::services::key_rotation::KeyCategory;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!("Invalid environment: {}. Expected: development, staging, or production", s),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // HTTP settings
    pub http_timeout_seconds: u64,
    pub sheets_base_url: String,
    pub drive_base_url: String,

    /// Where downloaded Drive files are written
    pub download_dir: PathBuf,

    /// API keys per category name, read from `<CATEGORY>_API_KEYS`
    #[serde(skip_serializing)]
    pub api_keys: BTreeMap<String, Vec<String>>,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let settings = Self {
            app_name: env_or_default("APP_NAME", "vidgen-helper"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: env_or_default("ENVIRONMENT", "development")
                .parse()
                .unwrap_or_default(),
            log_level: env_or_default("LOG_LEVEL", "info"),

            http_timeout_seconds: env_or_default("HTTP_TIMEOUT_SECONDS", "60")
                .parse()
                .context("Invalid HTTP_TIMEOUT_SECONDS value")?,
            sheets_base_url: env_or_default("SHEETS_BASE_URL", DEFAULT_SHEETS_BASE),
            drive_base_url: env_or_default("DRIVE_BASE_URL", DEFAULT_DRIVE_BASE),
            download_dir: PathBuf::from(env_or_default("DOWNLOAD_DIR", "downloads")),

            api_keys: Self::load_api_keys(),
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    fn validate(&self) -> Result<()> {
        if self.http_timeout_seconds == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECONDS must be > 0");
        }

        for (name, value) in [
            ("SHEETS_BASE_URL", &self.sheets_base_url),
            ("DRIVE_BASE_URL", &self.drive_base_url),
        ] {
            url::Url::parse(value).with_context(|| format!("Invalid {} value: {}", name, value))?;
        }

        Ok(())
    }

    /// Read `<CATEGORY>_API_KEYS` for every known category
    ///
    /// Categories whose variable is unset or holds only blanks are omitted.
    fn load_api_keys() -> BTreeMap<String, Vec<String>> {
        KeyCategory::ALL
            .iter()
            .filter_map(|category| {
                let raw = env::var(category.env_var()).ok()?;
                let keys = split_key_list(&raw);
                (!keys.is_empty()).then(|| (category.as_str().to_string(), keys))
            })
            .collect()
    }

    /// Fetcher configuration derived from these settings
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::default()
            .with_timeout(self.http_timeout_seconds)
            .with_sheets_base_url(&self.sheets_base_url)
            .with_drive_base_url(&self.drive_base_url)
    }

    /// Whether any category has at least one key configured
    pub fn has_api_keys(&self) -> bool {
        self.api_keys.values().any(|keys| !keys.is_empty())
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "vidgen-helper".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            http_timeout_seconds: 60,
            sheets_base_url: DEFAULT_SHEETS_BASE.to_string(),
            drive_base_url: DEFAULT_DRIVE_BASE.to_string(),
            download_dir: PathBuf::from("downloads"),
            api_keys: BTreeMap::new(),
        }
    }
}

/// Split a comma or newline separated key list, dropping blanks
pub fn split_key_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
