//! Key Rotation Registry
//!
//! Holds one [`KeyPool`] per category behind a single mutex so that every
//! caller in the process draws from the same rotation sequence.

use super::category::KeyCategory;
use crate::config::Settings;
use crate::utils::mask_key;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static GLOBAL_REGISTRY: OnceLock<KeyRotationRegistry> = OnceLock::new();

// ============================================================================
// Key Pool
// ============================================================================

/// Ordered credentials for one category plus its rotation cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPool {
    /// Credentials in insertion order; never contains blank entries
    keys: Vec<String>,
    /// Position the next selection is served from
    cursor: usize,
}

impl KeyPool {
    /// Build a pool from raw input, dropping empty and whitespace-only entries
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = keys
            .into_iter()
            .map(Into::into)
            .filter(|key: &String| !key.trim().is_empty())
            .collect();
        Self { keys, cursor: 0 }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Cursor position, always reduced modulo the current length
    pub fn cursor(&self) -> usize {
        if self.keys.is_empty() {
            0
        } else {
            self.cursor % self.keys.len()
        }
    }

    /// Return the key at the cursor and advance it, wrapping after the last key
    pub fn advance(&mut self) -> Option<(usize, &str)> {
        let len = self.keys.len();
        if len == 0 {
            return None;
        }
        let index = self.cursor % len;
        self.cursor = (index + 1) % len;
        Some((index, self.keys[index].as_str()))
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Thread-safe registry of key pools with round-robin selection
///
/// Every operation takes the same lock, so the read-then-advance in
/// [`get_next_key`](Self::get_next_key) can never interleave with another
/// advance or with a concurrent [`set_keys`](Self::set_keys).
#[derive(Debug)]
pub struct KeyRotationRegistry {
    pools: Mutex<HashMap<String, KeyPool>>,
}

impl Default for KeyRotationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyRotationRegistry {
    /// Create a registry with an empty pool for every known category
    pub fn new() -> Self {
        let pools = KeyCategory::ALL
            .iter()
            .map(|category| (category.as_str().to_string(), KeyPool::default()))
            .collect();
        Self {
            pools: Mutex::new(pools),
        }
    }

    /// The process-wide registry, constructed on first use
    ///
    /// Concurrent first callers block until the single construction finishes;
    /// every caller receives the same instance.
    pub fn global() -> &'static KeyRotationRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            tracing::debug!("Initializing global key rotation registry");
            KeyRotationRegistry::new()
        })
    }

    /// Replace a category's keys wholesale and reset its cursor
    ///
    /// Blank entries are dropped. Unknown categories are created.
    pub fn set_keys<C, I, S>(&self, category: C, keys: I)
    where
        C: AsRef<str>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let category = category.as_ref();
        let pool = KeyPool::from_keys(keys);
        let key_count = pool.len();

        let mut pools = self.lock();
        if !pools.contains_key(category) {
            tracing::debug!(category = %category, "Registering new key category");
        }
        pools.insert(category.to_string(), pool);
        drop(pools);

        tracing::info!(category = %category, key_count, "Replaced key pool");
    }

    /// Copy of a category's keys, empty for unknown categories
    pub fn get_all_keys(&self, category: impl AsRef<str>) -> Vec<String> {
        self.lock()
            .get(category.as_ref())
            .map(|pool| pool.keys().to_vec())
            .unwrap_or_default()
    }

    /// Next key in round-robin order, or `None` when the pool is empty or unknown
    pub fn get_next_key(&self, category: impl AsRef<str>) -> Option<String> {
        let category = category.as_ref();
        let mut pools = self.lock();

        let Some((index, key)) = pools.get_mut(category).and_then(KeyPool::advance) else {
            tracing::debug!(category = %category, "No key available");
            return None;
        };
        let key = key.to_string();
        drop(pools);

        tracing::debug!(
            category = %category,
            index,
            key = %mask_key(&key),
            "Selected key"
        );
        Some(key)
    }

    /// Names of all registered categories, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of a category's pool size and cursor
    pub fn stats(&self, category: impl AsRef<str>) -> Option<KeyPoolStats> {
        let category = category.as_ref();
        self.lock().get(category).map(|pool| KeyPoolStats {
            category: category.to_string(),
            total: pool.len(),
            cursor: pool.cursor(),
        })
    }

    /// Seed every category configured in the settings
    ///
    /// Categories without configured keys keep their current pool.
    pub fn load_from_settings(&self, settings: &Settings) {
        for (category, keys) in &settings.api_keys {
            self.set_keys(category, keys.iter().cloned());
        }
    }

    /// No operation panics while holding the guard mid-update, so a
    /// poisoned lock still protects a consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, KeyPool>> {
        self.pools.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Pool Statistics
// ============================================================================

/// Statistics about one key pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPoolStats {
    pub category: String,
    /// Number of usable keys
    pub total: usize,
    /// Index the next selection will be served from
    pub cursor: usize,
}

impl KeyPoolStats {
    /// At least one key is available
    pub fn is_available(&self) -> bool {
        self.total > 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(keys: &[&str]) -> KeyRotationRegistry {
        let registry = KeyRotationRegistry::new();
        registry.set_keys(KeyCategory::Gemini, keys.iter().copied());
        registry
    }

    #[test]
    fn test_known_categories_start_empty() {
        let registry = KeyRotationRegistry::new();
        assert_eq!(
            registry.categories(),
            vec!["elevenlabs", "gemini", "openai", "pexels"]
        );
        for category in KeyCategory::ALL {
            assert!(registry.get_all_keys(category).is_empty());
            assert_eq!(registry.get_next_key(category), None);
        }
    }

    #[test]
    fn test_round_robin_cycle() {
        let registry = registry_with(&["k1", "k2", "k3"]);

        let served: Vec<String> = (0..4)
            .filter_map(|_| registry.get_next_key("gemini"))
            .collect();
        assert_eq!(served, vec!["k1", "k2", "k3", "k1"]);
    }

    #[test]
    fn test_set_keys_filters_blank_entries() {
        let registry = registry_with(&["a", "", "  ", "b", "\t\n"]);
        assert_eq!(registry.get_all_keys("gemini"), vec!["a", "b"]);
    }

    #[test]
    fn test_set_keys_keeps_duplicates_in_order() {
        let registry = registry_with(&["a", "b", "a"]);
        assert_eq!(registry.get_all_keys("gemini"), vec!["a", "b", "a"]);

        let served: Vec<String> = (0..3)
            .filter_map(|_| registry.get_next_key("gemini"))
            .collect();
        assert_eq!(served, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_set_keys_resets_cursor() {
        let registry = registry_with(&["k1", "k2", "k3"]);
        registry.get_next_key("gemini");
        registry.get_next_key("gemini");
        assert_eq!(registry.stats("gemini").unwrap().cursor, 2);

        registry.set_keys("gemini", ["k1", "k2", "k3"]);
        assert_eq!(registry.stats("gemini").unwrap().cursor, 0);
        assert_eq!(registry.get_next_key("gemini").as_deref(), Some("k1"));
    }

    #[test]
    fn test_shrinking_pool_never_goes_out_of_range() {
        let registry = registry_with(&["k1", "k2", "k3", "k4"]);
        for _ in 0..3 {
            registry.get_next_key("gemini");
        }

        registry.set_keys("gemini", ["only"]);
        for _ in 0..3 {
            assert_eq!(registry.get_next_key("gemini").as_deref(), Some("only"));
        }
    }

    #[test]
    fn test_replacing_with_empty_list_yields_none() {
        let registry = registry_with(&["k1"]);
        registry.set_keys("gemini", Vec::<String>::new());
        assert_eq!(registry.get_next_key("gemini"), None);
        assert!(registry.get_all_keys("gemini").is_empty());
    }

    #[test]
    fn test_unknown_category_is_soft() {
        let registry = KeyRotationRegistry::new();
        assert!(registry.get_all_keys("pixabay").is_empty());
        assert_eq!(registry.get_next_key("pixabay"), None);
        assert!(registry.stats("pixabay").is_none());
    }

    #[test]
    fn test_set_keys_creates_unknown_category() {
        let registry = KeyRotationRegistry::new();
        registry.set_keys("pixabay", ["p1", "p2"]);

        assert!(registry.categories().contains(&"pixabay".to_string()));
        assert_eq!(registry.get_all_keys("pixabay"), vec!["p1", "p2"]);
        assert_eq!(registry.get_next_key("pixabay").as_deref(), Some("p1"));
    }

    #[test]
    fn test_returned_keys_are_copies() {
        let registry = registry_with(&["k1", "k2"]);
        let mut keys = registry.get_all_keys("gemini");
        keys.clear();
        keys.push("tampered".to_string());

        assert_eq!(registry.get_all_keys("gemini"), vec!["k1", "k2"]);
    }

    #[test]
    fn test_categories_rotate_independently() {
        let registry = KeyRotationRegistry::new();
        registry.set_keys(KeyCategory::Gemini, ["g1", "g2"]);
        registry.set_keys(KeyCategory::Pexels, ["p1", "p2"]);

        assert_eq!(registry.get_next_key(KeyCategory::Gemini).as_deref(), Some("g1"));
        assert_eq!(registry.get_next_key(KeyCategory::Pexels).as_deref(), Some("p1"));
        assert_eq!(registry.get_next_key(KeyCategory::Gemini).as_deref(), Some("g2"));
    }

    #[test]
    fn test_pool_stats() {
        let registry = registry_with(&["k1", "k2"]);
        let stats = registry.stats(KeyCategory::Gemini).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.cursor, 0);
        assert!(stats.is_available());

        registry.get_next_key(KeyCategory::Gemini);
        registry.get_next_key(KeyCategory::Gemini);
        assert_eq!(registry.stats(KeyCategory::Gemini).unwrap().cursor, 0);

        assert!(!registry.stats(KeyCategory::Pexels).unwrap().is_available());
    }

    #[test]
    fn test_load_from_settings() {
        let mut settings = Settings::default();
        settings
            .api_keys
            .insert("gemini".to_string(), vec!["g1".to_string(), "g2".to_string()]);

        let registry = KeyRotationRegistry::new();
        registry.set_keys(KeyCategory::Pexels, ["kept"]);
        registry.load_from_settings(&settings);

        assert_eq!(registry.get_all_keys("gemini"), vec!["g1", "g2"]);
        assert_eq!(registry.get_all_keys("pexels"), vec!["kept"]);
    }

    #[test]
    fn test_key_pool_advance_wraps() {
        let mut pool = KeyPool::from_keys(["a", "b"]);
        assert_eq!(pool.advance(), Some((0, "a")));
        assert_eq!(pool.advance(), Some((1, "b")));
        assert_eq!(pool.advance(), Some((0, "a")));

        let mut empty = KeyPool::default();
        assert_eq!(empty.advance(), None);
        assert_eq!(empty.cursor(), 0);
    }
}
