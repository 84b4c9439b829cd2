/*!
 * Translation of extracted quest strings.
 *
 * - `core`: the `TranslationService` orchestrator (ordered fan-out, per-string fallback)
 * - `cache`: per-run memo of translated strings
 * - `formatting`: color code protection around backend calls
 */

pub use self::core::{TranslationOptions, TranslationOutcome, TranslationService};

pub mod cache;
pub mod core;
pub mod formatting;
