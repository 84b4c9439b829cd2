use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

// @module: Quest chapter loading and localizable string extraction

static TITLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)\btitle: "[\s\S]*?""#).expect("valid title pattern"));

static SUBTITLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)\bsubtitle: (?:\[[\s\S]*?\]|"[\s\S]*?")"#).expect("valid subtitle pattern"));

static DESCRIPTION_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)\bdescription: \[[\s\S]*?\]"#).expect("valid description pattern"));

// A quoted span ends at the first quote not preceded by a backslash escape
static QUOTED_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid literal pattern"));

static IMAGE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\{image:[0-9a-zA-Z]*:.*\}$").expect("valid image pattern"));

/// Extension used by FTB Quests chapter files
pub const CHAPTER_EXTENSION: &str = "snbt";

/// Structural slot of a quest that holds localizable text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Title,
    Subtitle,
    Description,
}

impl FieldKind {
    /// Processing order: titles, then subtitles, then descriptions
    pub const ALL: [FieldKind; 3] = [Self::Title, Self::Subtitle, Self::Description];

    /// Label used both in the source format and in generated keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Description => "description",
        }
    }

    fn block_pattern(&self) -> &'static Regex {
        match self {
            Self::Title => &TITLE_BLOCK,
            Self::Subtitle => &SUBTITLE_BLOCK,
            Self::Description => &DESCRIPTION_BLOCK,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One localizable literal found in a chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub kind: FieldKind,
    /// Literal content without the surrounding quotes
    pub literal: String,
    /// 0-based occurrence order within `kind` for this chapter
    pub index: usize,
}

/// A single quest chapter file
#[derive(Debug, Clone)]
pub struct Chapter {
    /// Identifier derived from the file name, used in generated keys
    pub id: String,
    /// Original file name, reused for the rewritten output
    pub file_name: String,
    /// Chapter text after the escaped-quote pre-pass
    pub text: String,
}

impl Chapter {
    /// Build a chapter from raw file contents
    pub fn from_text(file_name: impl Into<String>, raw: &str) -> Self {
        let file_name = file_name.into();
        Self {
            id: chapter_id_from_file_name(&file_name),
            file_name,
            text: normalize_escaped_quotes(raw),
        }
    }

    /// Read a chapter from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read chapter file: {:?}", path))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("Chapter path has no file name: {:?}", path))?;

        Ok(Self::from_text(file_name, &raw))
    }

    /// Output path of the rewritten chapter inside `chapters_dir`
    pub fn output_path(&self, chapters_dir: &Path) -> PathBuf {
        chapters_dir.join(&self.file_name)
    }
}

/// Derive the chapter id by dropping the `.snbt` extension
pub fn chapter_id_from_file_name(file_name: &str) -> String {
    file_name
        .strip_suffix(&format!(".{}", CHAPTER_EXTENSION))
        .unwrap_or(file_name)
        .to_string()
}

/// Replace escaped double quotes with single quotes so literal boundaries are unambiguous
pub fn normalize_escaped_quotes(raw: &str) -> String {
    raw.replace("\\\"", "'")
}

/// Whether a literal is an inline image reference (`{image:<id>:<path>}`)
pub fn is_image_reference(literal: &str) -> bool {
    IMAGE_REFERENCE.is_match(literal)
}

/// Find every whole field block of the given kind
pub fn find_field_blocks(text: &str, kind: FieldKind) -> Vec<&str> {
    kind.block_pattern()
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}

/// Pull the quoted literals out of one matched field block
///
/// The `kind: ` prefix is removed first, then pairs of adjacent empty quotes
/// left over from array syntax. Empty literals are dropped.
pub fn extract_literals(block: &str, kind: FieldKind) -> Vec<String> {
    let prefix = format!("{}: ", kind.as_str());
    let body = block.replacen(&prefix, "", 1).replace("\"\"", "");

    QUOTED_LITERAL
        .captures_iter(&body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|literal| !literal.is_empty())
        .map(str::to_string)
        .collect()
}

/// Literals of one chapter, grouped by field kind in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub titles: Vec<String>,
    pub subtitles: Vec<String>,
    pub descriptions: Vec<String>,
}

impl ExtractedFields {
    /// Literals of a given kind
    pub fn literals(&self, kind: FieldKind) -> &[String] {
        match kind {
            FieldKind::Title => &self.titles,
            FieldKind::Subtitle => &self.subtitles,
            FieldKind::Description => &self.descriptions,
        }
    }

    /// Total number of literals across all kinds
    pub fn len(&self) -> usize {
        self.titles.len() + self.subtitles.len() + self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All literals as indexed matches, titles first
    pub fn matches(&self) -> Vec<FieldMatch> {
        FieldKind::ALL
            .iter()
            .flat_map(|kind| {
                self.literals(*kind)
                    .iter()
                    .enumerate()
                    .map(move |(index, literal)| FieldMatch {
                        kind: *kind,
                        literal: literal.clone(),
                        index,
                    })
            })
            .collect()
    }
}

/// Extract every localizable literal from chapter text
///
/// Returns `None` when the text contains no title, subtitle or description
/// block at all, in which case the chapter should be skipped.
pub fn extract_fields(text: &str) -> Option<ExtractedFields> {
    let mut found_block = false;
    let mut fields = ExtractedFields::default();

    for kind in FieldKind::ALL {
        let blocks = find_field_blocks(text, kind);
        if blocks.is_empty() {
            continue;
        }
        found_block = true;

        let literals: Vec<String> = blocks
            .into_iter()
            .flat_map(|block| extract_literals(block, kind))
            .collect();

        match kind {
            FieldKind::Title => fields.titles = literals,
            FieldKind::Subtitle => fields.subtitles = literals,
            FieldKind::Description => fields.descriptions = literals,
        }
    }

    found_block.then_some(fields)
}
