/*!
 * Tests for catalog file persistence
 */

use anyhow::Result;
use std::fs;

use ftbq_localizer::errors::CatalogError;
use ftbq_localizer::localization::{Catalog, CatalogStore};
use crate::common;

fn catalog(entries: &[(&str, &str)]) -> Catalog {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Test that a missing file loads as an empty catalog
#[tokio::test]
async fn test_load_withMissingFile_shouldReturnEmptyCatalog() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let loaded = CatalogStore::load(&temp_dir.path().join("en_us.json")).await?;
    assert!(loaded.is_empty());
    Ok(())
}

/// Test that merging creates the file and its parent directories
#[tokio::test]
async fn test_merge_into_withNoFile_shouldWriteFreshCatalog() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("output").join("Pack").join("en_us.json");
    let store = CatalogStore::new();

    store.merge_into(&path, &catalog(&[("Pack.ch1.title0", "Hello")])).await?;

    let json = common::read_json(&path)?;
    assert_eq!(json["Pack.ch1.title0"], "Hello");
    Ok(())
}

/// Test that writing the same catalog twice equals writing it once
#[tokio::test]
async fn test_merge_into_withSameCatalogTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("en_us.json");
    let store = CatalogStore::new();
    let entries = catalog(&[("a", "1"), ("b", "2")]);

    let once = store.merge_into(&path, &entries).await?;
    let once_on_disk = fs::read_to_string(&path)?;
    let twice = store.merge_into(&path, &entries).await?;

    assert_eq!(once, twice);
    assert_eq!(fs::read_to_string(&path)?, once_on_disk);
    assert_eq!(twice.len(), 2);
    Ok(())
}

/// Test that prior keys survive and new keys are added
#[tokio::test]
async fn test_merge_into_withPriorKeys_shouldKeepUnion() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "en_us.json", "{\"Old.ch9.title0\": \"Legacy\"}")?;
    let store = CatalogStore::new();

    let merged = store.merge_into(&path, &catalog(&[("Pack.ch1.title0", "Hello")])).await?;

    assert_eq!(merged.get("Old.ch9.title0"), Some("Legacy"));
    assert_eq!(merged.get("Pack.ch1.title0"), Some("Hello"));
    assert_eq!(CatalogStore::load(&path).await?, merged);
    Ok(())
}

/// Test that entries from the current run win on collision
#[tokio::test]
async fn test_merge_into_withCollidingKey_shouldPreferNewValue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "en_us.json", "{\"Pack.ch1.title0\": \"Old\"}")?;

    let merged = CatalogStore::new()
        .merge_into(&path, &catalog(&[("Pack.ch1.title0", "New")]))
        .await?;

    assert_eq!(merged.get("Pack.ch1.title0"), Some("New"));
    Ok(())
}

/// Test that an unparsable prior catalog is reported instead of overwritten
#[tokio::test]
async fn test_merge_into_withMalformedFile_shouldFailWithoutOverwriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "en_us.json", "{ not json")?;

    let result = CatalogStore::new().merge_into(&path, &catalog(&[("a", "1")])).await;

    assert!(matches!(result, Err(CatalogError::Malformed { .. })));
    assert_eq!(fs::read_to_string(&path)?, "{ not json");
    Ok(())
}

/// Test that concurrent merges into one file lose no entries
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_merge_into_withConcurrentWriters_shouldLoseNoUpdates() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("en_us.json");
    let store = CatalogStore::new();

    let mut handles = Vec::new();
    for chapter in 0..16 {
        let store = store.clone();
        let path = path.clone();
        handles.push(tokio::spawn(async move {
            let title = format!("Pack.ch{}.title0", chapter);
            let description = format!("Pack.ch{}.description0", chapter);
            let entries = catalog(&[(title.as_str(), "Title"), (description.as_str(), "Text")]);
            store.merge_into(&path, &entries).await
        }));
    }

    for handle in handles {
        handle.await??;
    }

    let loaded = CatalogStore::load(&path).await?;
    assert_eq!(loaded.len(), 32);
    Ok(())
}
