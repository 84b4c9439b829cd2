/*!
 * Color code protection for translated text.
 *
 * Minecraft formatting codes (`&a`, `&l`, `&r`, ...) are glued to the words
 * they style, so backends tend to merge or drop them. They are wrapped in
 * quotes before a string is sent and unwrapped again in the result.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// A color/format code: `&` followed by 0-9, a-f, k-o or r
static COLOR_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)&[0-9A-FK-OR]").unwrap());

/// A color code that was wrapped by `protect`
static PROTECTED_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)"(&[0-9A-FK-OR])""#).unwrap());

/// Protects color codes while a string is out for translation
pub struct ColorCodeGuard;

impl ColorCodeGuard {
    /// Whether the text contains any color code
    pub fn contains_codes(text: &str) -> bool {
        COLOR_CODE_REGEX.is_match(text)
    }

    /// Wrap every color code in double quotes
    pub fn protect(text: &str) -> String {
        COLOR_CODE_REGEX.replace_all(text, "\"$0\"").into_owned()
    }

    /// Remove the quotes `protect` put around color codes
    pub fn restore(text: &str) -> String {
        PROTECTED_CODE_REGEX.replace_all(text, "$1").into_owned()
    }
}
