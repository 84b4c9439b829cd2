/*!
 * Resource pack packaging.
 *
 * A translation run ends by bundling both catalogs into a zip that Minecraft
 * loads as a resource pack. KubeJS picks the language files up from
 * `assets/kubejs/lang/`.
 */

use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::PackagingError;
use crate::file_utils::OutputLayout;

/// Resource pack format written to `pack.mcmeta`
pub const PACK_FORMAT: u32 = 15;

/// Directory of language files inside the archive
const LANG_DIR: &str = "assets/kubejs/lang";

#[derive(Debug, Serialize)]
struct PackSection {
    pack_format: u32,
    description: String,
}

/// Contents of `pack.mcmeta`
#[derive(Debug, Serialize)]
pub struct PackManifest {
    pack: PackSection,
}

impl PackManifest {
    pub fn new(modpack: &str, language: &str, locale: &str) -> Self {
        Self {
            pack: PackSection {
                pack_format: PACK_FORMAT,
                description: format!("{} FTBQuest {}_{} translation pack", modpack, language, locale),
            },
        }
    }

    /// Compact JSON as stored in the archive
    pub fn to_json(&self) -> Result<String, PackagingError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A translation resource pack for one target language
#[derive(Debug, Clone)]
pub struct ResourcePack {
    modpack: String,
    language: String,
    locale: String,
}

impl ResourcePack {
    pub fn new(modpack: impl Into<String>, language: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            modpack: modpack.into(),
            language: language.into(),
            locale: locale.into(),
        }
    }

    pub fn manifest(&self) -> PackManifest {
        PackManifest::new(&self.modpack, &self.language, &self.locale)
    }

    /// Write the archive next to the catalogs and return its path
    ///
    /// Both catalog files are copied into the archive exactly as they are on
    /// disk, so this must run after every chapter has been persisted.
    pub fn write(&self, layout: &OutputLayout) -> Result<PathBuf, PackagingError> {
        let translated_path = layout.translated_catalog_path(&self.language, &self.locale);
        let source_path = layout.source_catalog_path();
        let archive_path = layout.archive_path(&self.modpack, &self.language, &self.locale);

        let translated = read_file(&translated_path)?;
        let source = read_file(&source_path)?;
        let manifest = self.manifest().to_json()?;

        let file = File::create(&archive_path).map_err(|source| PackagingError::Io {
            path: archive_path.clone(),
            source,
        })?;

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(file);

        let entries: [(String, &[u8]); 3] = [
            ("pack.mcmeta".to_string(), manifest.as_bytes()),
            (format!("{}/{}_{}.json", LANG_DIR, self.language, self.locale), translated.as_slice()),
            (format!("{}/en_us.json", LANG_DIR), source.as_slice()),
        ];

        for (name, bytes) in entries {
            zip.start_file(name, options)?;
            zip.write_all(bytes).map_err(|source| PackagingError::Io {
                path: archive_path.clone(),
                source,
            })?;
        }

        zip.finish()?;

        info!("Resource pack written to {:?}", archive_path);
        Ok(archive_path)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, PackagingError> {
    std::fs::read(path).map_err(|source| PackagingError::Io {
        path: path.to_path_buf(),
        source,
    })
}
