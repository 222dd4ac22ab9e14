//! Application context
//!
//! Bundles the shared resources every command needs. The key registry is
//! passed in rather than looked up, so tests can hand over a private
//! instance while the binary uses the process-wide one.

use crate::config::Settings;
use crate::error::ToolError;
use crate::services::{KeyRotationRegistry, SheetFetcher};
use std::sync::Arc;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Key pools shared by every consumer
    pub keys: &'static KeyRotationRegistry,

    /// Sheets/Drive fetcher
    pub fetcher: SheetFetcher,
}

impl AppContext {
    /// Create a context, seeding `keys` from the configured API keys
    pub fn new(settings: Settings, keys: &'static KeyRotationRegistry) -> Result<Self, ToolError> {
        let settings = Arc::new(settings);

        if !settings.has_api_keys() {
            tracing::warn!("No API keys configured; providers will report missing keys");
        }
        keys.load_from_settings(&settings);
        let fetcher = SheetFetcher::new(settings.fetcher_config())?;

        tracing::debug!(
            categories = keys.categories().len(),
            timeout_seconds = settings.http_timeout_seconds,
            "Application context initialized"
        );

        Ok(Self {
            settings,
            keys,
            fetcher,
        })
    }

    /// Create a context backed by the process-wide key registry
    pub fn with_global_keys(settings: Settings) -> Result<Self, ToolError> {
        Self::new(settings, KeyRotationRegistry::global())
    }

    /// Next key for a category, or an error naming the missing configuration
    pub fn require_key(&self, category: &str) -> Result<String, ToolError> {
        self.keys
            .get_next_key(category)
            .ok_or_else(|| ToolError::NoKeyAvailable {
                category: category.to_string(),
            })
    }
}
