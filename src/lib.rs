/*!
 * # ftbq-localizer - FTB Quests chapter localizer
 *
 * A Rust library that moves the player-facing text of FTB Quests chapter files
 * into language catalogs.
 *
 * ## Features
 *
 * - Extract quest titles, subtitles and descriptions from `.snbt` chapters
 * - Replace each string with a `{modpack.chapter.fieldN}` placeholder
 * - Merge the strings into `en_us.json` across chapters and runs
 * - Optionally machine-translate every string:
 *   - DeepL API
 *   - Google Translate web endpoint
 * - Bundle both catalogs into a KubeJS resource pack
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `quest_processor`: Chapter loading and string extraction
 * - `localization`: Keys, catalogs, chapter rewriting and catalog persistence
 * - `chapter_processor`: Localization of a single chapter
 * - `translation`: Translation orchestration:
 *   - `translation::core`: Ordered concurrent translation with fallback
 *   - `translation::cache`: Per-run translation cache
 *   - `translation::formatting`: Color code protection
 * - `providers`: Translation backends:
 *   - `providers::deepl`: DeepL API client
 *   - `providers::google`: Google Translate client
 *   - `providers::mock`: Scripted backend for tests
 * - `packaging`: Resource pack archive
 * - `file_utils`: File system operations and output layout
 * - `app_controller`: Main application controller
 * - `language_utils`: Supported target languages
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod quest_processor;
pub mod localization;
pub mod chapter_processor;
pub mod translation;
pub mod packaging;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use chapter_processor::{ChapterOutput, ChapterProcessor};
pub use localization::{Catalog, CatalogStore, LocalizationKey};
pub use quest_processor::{Chapter, FieldKind};
pub use translation::TranslationService;
pub use language_utils::get_language_name;
pub use errors::{AppError, CatalogError, PackagingError, ProviderError};
