/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;

use ftbq_localizer::app_config::{sanitize_modpack_name, Config, LogLevel, TranslationProvider};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.input_dir, PathBuf::from("ftbquests/quests/chapters"));
    assert_eq!(config.output_dir, PathBuf::from("output"));
    assert_eq!(config.concurrent_chapters, 4);
    assert!(!config.translation.enabled);
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.translation.retry_backoff_ms, 1000);
    assert_eq!(config.translation.concurrent_requests, 8);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that a partial config file is filled with defaults
#[test]
fn test_deserialize_withPartialJson_shouldApplyDefaults() {
    let json = r#"{
        "modpack_name": "Pack",
        "translation": { "enabled": true, "provider": "deepl", "target_language": "ko", "target_locale": "kr" }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.modpack_name, "Pack");
    assert_eq!(config.translation.provider, TranslationProvider::DeepL);
    assert_eq!(config.translation.timeout_secs, 30);
    assert_eq!(config.translation.language_file_stem(), "ko_kr");
    assert_eq!(config.input_dir, PathBuf::from("ftbquests/quests/chapters"));
}

/// Test that the auth key is not written into a generated config file
#[test]
fn test_serialize_withEmptyApiKey_shouldOmitKey() {
    let json = serde_json::to_string(&Config::default()).unwrap();
    assert!(!json.contains("api_key"));
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    // Modpack name is required
    assert!(config.validate().is_err());
    config.modpack_name = "Pack".to_string();
    assert!(config.validate().is_ok());

    // Translation needs a supported language and a locale
    config.translation.enabled = true;
    assert!(config.validate().is_err());
    config.translation.target_language = "ko".to_string();
    assert!(config.validate().is_err());
    config.translation.target_locale = "kr".to_string();
    assert!(config.validate().is_ok());

    config.translation.target_language = "klingon".to_string();
    assert!(config.validate().is_err());
    config.translation.target_language = "zh-CN".to_string();
    assert!(config.validate().is_ok());

    config.translation.target_locale = "k r".to_string();
    assert!(config.validate().is_err());
    config.translation.target_locale = "cn".to_string();

    // A missing DeepL key only warns
    config.translation.provider = TranslationProvider::DeepL;
    assert!(config.validate().is_ok());
}

/// Test that a name made only of illegal characters is rejected
#[test]
fn test_config_validation_withIllegalModpackName_shouldFail() {
    let mut config = Config::default();
    config.modpack_name = "<>?".to_string();
    assert!(config.validate().is_err());
}

/// Test modpack name sanitizing
#[test]
fn test_sanitize_modpack_name_withIllegalCharacters_shouldStripThem() {
    assert_eq!(sanitize_modpack_name("My~Pack#1"), "MyPack1");
    assert_eq!(sanitize_modpack_name(r#"a"b%c&d*e"#), "abcde");
    assert_eq!(sanitize_modpack_name("x/y\\z{|}"), "xyz");
    assert_eq!(sanitize_modpack_name("All The Mods"), "All The Mods");
}

/// Test normalization of user-provided values
#[test]
fn test_normalize_withUntrimmedValues_shouldClean() {
    let mut config = Config::default();
    config.modpack_name = " Pack: Reborn ".to_string();
    config.translation.target_language = " ko ".to_string();
    config.translation.target_locale = " KR ".to_string();

    config.normalize();

    assert_eq!(config.modpack_name, "Pack Reborn");
    assert_eq!(config.translation.target_language, "ko");
    assert_eq!(config.translation.target_locale, "kr");
}

/// Test provider string parsing
#[test]
fn test_translation_provider_from_str_withKnownNames_shouldParse() {
    assert_eq!("deepl".parse::<TranslationProvider>().unwrap(), TranslationProvider::DeepL);
    assert_eq!("GOOGLE".parse::<TranslationProvider>().unwrap(), TranslationProvider::Google);
    assert_eq!(TranslationProvider::DeepL.to_string(), "deepl");
    assert_eq!(TranslationProvider::Google.display_name(), "Google Translate");
}
