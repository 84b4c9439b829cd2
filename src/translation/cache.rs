/*!
 * Translation caching functionality.
 *
 * Quest packs repeat many strings across chapters ("Rewards", "Getting
 * Started", ...). The cache keeps one translation per (text, target language)
 * for the lifetime of a run so repeats are not sent to the backend again.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::debug;

/// Cache key combining source text and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source_text: String,
    target_language: String,
}

impl CacheKey {
    fn new(source_text: &str, target_language: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

/// Translation cache shared by clones
#[derive(Clone)]
pub struct TranslationCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, String>>>,

    /// Hit and miss counters
    stats: Arc<RwLock<(usize, usize)>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl TranslationCache {
    /// Create a new translation cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new((0, 0))),
            enabled,
        }
    }

    /// Get a translation from the cache
    pub fn get(&self, source_text: &str, target_language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(source_text, target_language);
        let found = self.cache.read().get(&key).cloned();

        let mut stats = self.stats.write();
        match found {
            Some(translation) => {
                stats.0 += 1;
                debug!("Cache hit for '{}' (-> {})", truncate_text(source_text, 30), target_language);
                Some(translation)
            }
            None => {
                stats.1 += 1;
                None
            }
        }
    }

    /// Store a translation in the cache
    pub fn store(&self, source_text: &str, target_language: &str, translation: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(source_text, target_language);
        self.cache.write().insert(key, translation.to_string());
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let (hits, misses) = *self.stats.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
