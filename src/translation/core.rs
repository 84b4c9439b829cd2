/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, which fans a chapter's literals
 * out to the configured backend and collects the results in their original
 * order. Failures never abort a run: a string that cannot be translated keeps
 * its source text.
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::providers::deepl::DeepL;
use crate::providers::google::GoogleTranslate;
use crate::providers::{RetryPolicy, Translator};
use crate::quest_processor::is_image_reference;
use super::cache::TranslationCache;
use super::formatting::ColorCodeGuard;

/// Translation options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Maximum number of requests in flight for one field kind
    pub max_concurrent_requests: usize,

    /// Whether identical strings are translated once per run
    pub cache_enabled: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 8,
            cache_enabled: true,
        }
    }
}

/// Outcome of translating one literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// The backend returned a translation
    Translated(String),
    /// Image references are copied through untouched
    PassedThrough(String),
    /// The backend failed; the source text is used instead
    Fallback(String),
}

impl TranslationOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Translated(text) | Self::PassedThrough(text) | Self::Fallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Translated(text) | Self::PassedThrough(text) | Self::Fallback(text) => text,
        }
    }
}

/// Main translation service for quest strings
#[derive(Clone)]
pub struct TranslationService {
    /// Backend implementation
    translator: Arc<dyn Translator>,

    /// Target language code as configured
    target_language: String,

    /// Translation options
    pub options: TranslationOptions,

    /// Translation cache for storing and retrieving translations
    pub cache: TranslationCache,

    /// Number of strings that fell back to their source text
    fallbacks: Arc<AtomicUsize>,
}

impl TranslationService {
    /// Create a new translation service with the backend selected by `config`
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let retry = RetryPolicy::new(config.retry_count, config.retry_backoff_ms);

        let translator: Arc<dyn Translator> = match config.provider {
            TranslationProvider::DeepL => Arc::new(DeepL::new(
                config.api_key.clone(),
                config.endpoint.clone(),
                retry,
                config.timeout_secs,
            )),
            TranslationProvider::Google => Arc::new(GoogleTranslate::new(
                config.endpoint.clone(),
                retry,
                config.timeout_secs,
            )),
        };

        let options = TranslationOptions {
            max_concurrent_requests: config.concurrent_requests.max(1),
            cache_enabled: true,
        };

        Ok(Self::with_translator(translator, config.target_language.clone(), options))
    }

    /// Create a service around an existing backend
    pub fn with_translator(
        translator: Arc<dyn Translator>,
        target_language: impl Into<String>,
        options: TranslationOptions,
    ) -> Self {
        Self {
            translator,
            target_language: target_language.into(),
            cache: TranslationCache::new(options.cache_enabled),
            options,
            fallbacks: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn provider_name(&self) -> &'static str {
        self.translator.name()
    }

    /// Number of strings that kept their source text because translation failed
    pub fn fallback_count(&self) -> usize {
        self.fallbacks.load(Ordering::SeqCst)
    }

    /// Translate one literal, never failing
    pub async fn translate_literal(&self, literal: &str) -> TranslationOutcome {
        if is_image_reference(literal) || literal.trim().is_empty() {
            return TranslationOutcome::PassedThrough(literal.to_string());
        }

        if let Some(cached) = self.cache.get(literal, &self.target_language) {
            return TranslationOutcome::Translated(cached);
        }

        let request_text = ColorCodeGuard::protect(literal);
        match self.translator.translate(&request_text, &self.target_language).await {
            Ok(translated) if !translated.trim().is_empty() => {
                let translated = ColorCodeGuard::restore(&translated);
                self.cache.store(literal, &self.target_language, &translated);
                TranslationOutcome::Translated(translated)
            }
            Ok(_) => {
                self.fallbacks.fetch_add(1, Ordering::SeqCst);
                warn!(
                    "{} returned an empty translation for '{}', keeping source text",
                    self.translator.name(),
                    literal
                );
                TranslationOutcome::Fallback(literal.to_string())
            }
            Err(e) => {
                self.fallbacks.fetch_add(1, Ordering::SeqCst);
                warn!(
                    "{} translation failed for '{}': {} - keeping source text",
                    self.translator.name(),
                    literal,
                    e
                );
                TranslationOutcome::Fallback(literal.to_string())
            }
        }
    }

    /// Translate a list of literals concurrently
    ///
    /// Results are returned in the order of `literals`, independent of the
    /// order in which requests complete.
    pub async fn translate_all(&self, literals: &[String]) -> Vec<TranslationOutcome> {
        if literals.is_empty() {
            return Vec::new();
        }

        debug!(
            "Translating {} strings to {} via {}",
            literals.len(),
            self.target_language,
            self.translator.name()
        );

        stream::iter(literals.iter())
            .map(|literal| self.translate_literal(literal))
            .buffered(self.options.max_concurrent_requests.max(1))
            .collect::<Vec<_>>()
            .await
    }
}
