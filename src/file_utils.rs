use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::quest_processor::CHAPTER_EXTENSION;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find the chapter files directly inside `dir`, sorted by file name
    ///
    /// Subdirectories are not searched. Every regular file counts as a
    /// chapter; files without the chapter extension are included too so that
    /// renamed exports are not silently skipped.
    pub fn find_chapter_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_file() {
                result.push(entry.into_path());
            }
        }

        result.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(result)
    }

    /// Whether the path carries the chapter extension
    pub fn has_chapter_extension<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(CHAPTER_EXTENSION))
            .unwrap_or(false)
    }
}

/// Locations of everything a run writes for one modpack
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `<output_dir>/<modpack>`
    pub fn new<P: AsRef<Path>>(output_dir: P, modpack: &str) -> Self {
        Self {
            root: output_dir.as_ref().join(modpack),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory receiving rewritten chapter files
    pub fn chapters_dir(&self) -> PathBuf {
        self.root.join("chapters")
    }

    /// The source language catalog
    pub fn source_catalog_path(&self) -> PathBuf {
        self.root.join("en_us.json")
    }

    /// The translated catalog, e.g. `ko_kr.json`
    pub fn translated_catalog_path(&self, language: &str, locale: &str) -> PathBuf {
        self.root.join(format!("{}_{}.json", language, locale))
    }

    /// The resource pack archive for a language
    pub fn archive_path(&self, modpack: &str, language: &str, locale: &str) -> PathBuf {
        self.root.join(format!("{}ResourcePack_{}_{}.zip", modpack, language, locale))
    }
}
