/*!
 * Catalog persistence.
 *
 * Each catalog file is updated with a read-merge-write sequence. Chapters may be
 * processed concurrently, so the whole sequence runs while holding an async
 * mutex dedicated to the destination path.
 */

use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Catalog;
use crate::errors::CatalogError;

/// Serializes catalog file updates per destination path
#[derive(Debug, Default, Clone)]
pub struct CatalogStore {
    locks: Arc<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.entry(path.to_path_buf()).or_default().clone()
    }

    /// Load a catalog file, or an empty catalog when the file does not exist
    ///
    /// A file that exists but is not a flat JSON object of strings is an error.
    pub async fn load(path: &Path) -> Result<Catalog, CatalogError> {
        match tokio::fs::read_to_string(path).await {
            Ok(json) => Catalog::from_json_str(&json).map_err(|source| CatalogError::Malformed {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Catalog::new()),
            Err(source) => Err(CatalogError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Merge `entries` into the catalog file at `path` and write it back
    ///
    /// Entries from `entries` win on key collision. Returns the merged catalog
    /// as written to disk.
    pub async fn merge_into(&self, path: &Path, entries: &Catalog) -> Result<Catalog, CatalogError> {
        let lock = self.lock_for(path);
        let _guard = lock.lock().await;

        let mut merged = Self::load(path).await?;
        let added = merged.merge(entries);
        let json = merged.to_json_pretty()?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|source| CatalogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        tokio::fs::write(path, json).await.map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "Merged {} entries into {:?} ({} new, {} total)",
            entries.len(),
            path,
            added,
            merged.len()
        );

        Ok(merged)
    }
}
