use log::{debug, warn};

use crate::localization::{Catalog, ChapterRewriter, LocalizationKey};
use crate::quest_processor::{extract_fields, Chapter, FieldKind};
use crate::translation::{TranslationOutcome, TranslationService};

// @module: Per-chapter localization

/// Everything produced for one chapter
#[derive(Debug, Clone)]
pub struct ChapterOutput {
    /// Chapter text with every localized literal replaced by its placeholder
    pub rewritten: String,

    /// Source catalog entries discovered in this chapter
    pub source: Catalog,

    /// Translated entries, present when translation is enabled
    pub translated: Option<Catalog>,

    /// Number of literals localized
    pub literal_count: usize,

    /// Number of literals that kept their source text in the translated catalog
    pub fallback_count: usize,
}

// @struct: Extracts, rewrites and optionally translates one chapter
#[derive(Clone)]
pub struct ChapterProcessor {
    modpack: String,
    translation: Option<TranslationService>,
}

impl ChapterProcessor {
    pub fn new(modpack: impl Into<String>, translation: Option<TranslationService>) -> Self {
        Self {
            modpack: modpack.into(),
            translation,
        }
    }

    pub fn modpack(&self) -> &str {
        &self.modpack
    }

    pub fn translates(&self) -> bool {
        self.translation.is_some()
    }

    /// Process one chapter
    ///
    /// Returns `None` when the chapter has no title, subtitle or description
    /// block. Field kinds are handled in order title, subtitle, description;
    /// within a kind, keys are numbered in discovery order.
    pub async fn process(&self, chapter: &Chapter) -> Option<ChapterOutput> {
        let Some(fields) = extract_fields(&chapter.text) else {
            debug!("{}: no localizable blocks, skipping", chapter.file_name);
            return None;
        };

        let mut rewriter = ChapterRewriter::new(chapter.text.as_str());
        let mut source = Catalog::new();
        let mut translated = self.translation.as_ref().map(|_| Catalog::new());
        let mut fallback_count = 0;

        for kind in FieldKind::ALL {
            let literals = fields.literals(kind);
            if literals.is_empty() {
                continue;
            }

            let outcomes = match &self.translation {
                Some(service) => Some(service.translate_all(literals).await),
                None => None,
            };

            for (index, literal) in literals.iter().enumerate() {
                let key = LocalizationKey::new(self.modpack.as_str(), chapter.id.as_str(), kind, index);

                if !rewriter.replace_literal(literal, &key) {
                    warn!(
                        "{}: literal for {} not found in chapter text, keeping catalog entry only",
                        chapter.file_name, key
                    );
                }

                source.insert(key.to_string(), literal.as_str());

                if let (Some(catalog), Some(outcomes)) = (translated.as_mut(), outcomes.as_ref()) {
                    let outcome = outcomes
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| TranslationOutcome::Fallback(literal.clone()));
                    if matches!(outcome, TranslationOutcome::Fallback(_)) {
                        fallback_count += 1;
                    }
                    catalog.insert(key.to_string(), outcome.into_text());
                }
            }
        }

        debug!(
            "{}: {} literals localized ({} replaced in text)",
            chapter.file_name,
            fields.len(),
            rewriter.replaced()
        );

        Some(ChapterOutput {
            rewritten: rewriter.finish(),
            source,
            translated,
            literal_count: fields.len(),
            fallback_count,
        })
    }
}
