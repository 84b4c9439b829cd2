/*!
 * Tests for localization keys, catalogs and chapter rewriting
 */

use std::collections::HashSet;

use ftbq_localizer::chapter_processor::ChapterProcessor;
use ftbq_localizer::localization::{Catalog, ChapterRewriter, LocalizationKey};
use ftbq_localizer::quest_processor::{Chapter, FieldKind};
use crate::common;

/// Test the basic title scenario end to end
#[tokio::test]
async fn test_process_withSingleTitle_shouldProduceKeyAndPlaceholder() {
    let chapter = Chapter::from_text("ch1.snbt", "title: \"Hello\"");
    let output = ChapterProcessor::new("Pack", None).process(&chapter).await.unwrap();

    assert_eq!(output.source.get("Pack.ch1.title0"), Some("Hello"));
    assert_eq!(output.rewritten, "title: \"{Pack.ch1.title0}\"");
}

/// Test that description entries are numbered in order
#[tokio::test]
async fn test_process_withDescriptionArray_shouldNumberInOrder() {
    let chapter = Chapter::from_text("ch1.snbt", "description: [\"A\", \"B\"]");
    let output = ChapterProcessor::new("Pack", None).process(&chapter).await.unwrap();

    let entries: Vec<(&str, &str)> = output.source.iter().collect();
    assert_eq!(
        entries,
        vec![("Pack.ch1.description0", "A"), ("Pack.ch1.description1", "B")]
    );
    assert_eq!(
        output.rewritten,
        "description: [\"{Pack.ch1.description0}\", \"{Pack.ch1.description1}\"]"
    );
}

/// Test that every literal is replaced by exactly one placeholder
#[tokio::test]
async fn test_process_withSampleChapter_shouldReplaceEveryLiteral() {
    let chapter = Chapter::from_text("getting_started.snbt", common::SAMPLE_CHAPTER);
    let output = ChapterProcessor::new("Pack", None).process(&chapter).await.unwrap();

    assert_eq!(output.literal_count, 8);
    assert_eq!(output.source.len(), 8);

    for (key, literal) in output.source.iter() {
        let placeholder = format!("\"{{{}}}\"", key);
        assert_eq!(output.rewritten.matches(&placeholder).count(), 1, "placeholder for {}", key);
        assert!(!output.rewritten.contains(&format!("\"{}\"", literal)), "literal {} left behind", literal);
    }
}

/// Test that substituting catalog values back reproduces the chapter
#[tokio::test]
async fn test_process_withSampleChapter_shouldRoundTripThroughCatalog() {
    let chapter = Chapter::from_text("getting_started.snbt", common::SAMPLE_CHAPTER);
    let output = ChapterProcessor::new("Pack", None).process(&chapter).await.unwrap();

    let mut restored = output.rewritten.clone();
    for (key, literal) in output.source.iter() {
        restored = restored.replacen(&format!("{{{}}}", key), literal, 1);
    }

    assert_eq!(restored, chapter.text);
}

/// Test that keys are unique within a chapter
#[tokio::test]
async fn test_process_withSampleChapter_shouldGenerateUniqueKeys() {
    let chapter = Chapter::from_text("getting_started.snbt", common::SAMPLE_CHAPTER);
    let output = ChapterProcessor::new("Pack", None).process(&chapter).await.unwrap();

    let keys: HashSet<&str> = output.source.iter().map(|(k, _)| k).collect();
    assert_eq!(keys.len(), output.source.len());
    assert!(keys.contains("Pack.getting_started.subtitle0"));
    assert!(keys.contains("Pack.getting_started.description3"));
}

/// Test that identical literals are consumed in document order
#[test]
fn test_rewriter_withDuplicateLiterals_shouldConsumeInOrder() {
    let mut rewriter = ChapterRewriter::new("description: [\"Same\", \"Same\"]");
    let first = LocalizationKey::new("Pack", "ch1", FieldKind::Description, 0);
    let second = LocalizationKey::new("Pack", "ch1", FieldKind::Description, 1);

    rewriter.replace_literal("Same", &first);
    rewriter.replace_literal("Same", &second);

    assert_eq!(
        rewriter.finish(),
        "description: [\"{Pack.ch1.description0}\", \"{Pack.ch1.description1}\"]"
    );
}

/// Test catalog JSON output is pretty-printed in insertion order
#[test]
fn test_catalog_to_json_pretty_withEntries_shouldKeepInsertionOrder() {
    let mut catalog = Catalog::new();
    catalog.insert("Pack.ch1.title1", "Second");
    catalog.insert("Pack.ch1.title0", "First");

    let json = catalog.to_json_pretty().unwrap();

    assert_eq!(
        json,
        "{\n  \"Pack.ch1.title1\": \"Second\",\n  \"Pack.ch1.title0\": \"First\"\n}"
    );
}

/// Test that non-string values are rejected
#[test]
fn test_catalog_from_json_str_withNestedObject_shouldFail() {
    assert!(Catalog::from_json_str("{\"a\": {\"b\": \"c\"}}").is_err());
    assert!(Catalog::from_json_str("[]").is_err());
    assert!(Catalog::from_json_str("{}").unwrap().is_empty());
}
