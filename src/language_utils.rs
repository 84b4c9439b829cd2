use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for target language handling
///
/// Target languages use the codes the translation backends accept: an
/// ISO 639-1 code, optionally followed by a region (`zh-CN`, `pt-BR`).
/// Codes accepted as translation targets
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "ar", "bg", "bn", "ca", "cs", "cy", "da", "de", "el", "en", "es", "et", "fa", "fi",
    "fr", "ga", "he", "hi", "hr", "hu", "id", "is", "it", "ja", "ko", "lt", "lv", "ms", "mt",
    "nb", "nl", "pl", "pt", "pt-BR", "pt-PT", "ro", "ru", "sk", "sl", "sq", "sr", "sv", "sw",
    "th", "tl", "tr", "uk", "ur", "vi", "zh", "zh-CN", "zh-TW",
];

/// Split a code like `zh-CN` into its language part
fn base_code(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}

/// Validate a target language code
pub fn validate_target_language(code: &str) -> Result<()> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Target language is required when translation is enabled"));
    }

    if SUPPORTED_LANGUAGES.iter().any(|supported| supported.eq_ignore_ascii_case(trimmed)) {
        return Ok(());
    }

    Err(anyhow!(
        "Unsupported target language: {} (supported: {})",
        code,
        SUPPORTED_LANGUAGES.join(", ")
    ))
}

/// Get the English name of a language from its code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = base_code(code.trim()).to_lowercase();

    Language::from_639_1(&normalized)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
