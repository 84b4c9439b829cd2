use super::LocalizationKey;

/// Working copy of a chapter's text that literals are swapped out of
///
/// Replacement is by content: each call rewrites the first remaining
/// occurrence of the quoted literal. Two literals with identical text are
/// therefore consumed in document order, and a literal that also appears
/// earlier under another field kind is taken from that earlier position.
#[derive(Debug, Clone)]
pub struct ChapterRewriter {
    text: String,
    replaced: usize,
}

impl ChapterRewriter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            replaced: 0,
        }
    }

    /// Replace `"literal"` with `"{key}"`, returning whether anything matched
    pub fn replace_literal(&mut self, literal: &str, key: &LocalizationKey) -> bool {
        let quoted = format!("\"{}\"", literal);
        match self.text.find(&quoted) {
            Some(start) => {
                let placeholder = format!("\"{}\"", key.placeholder());
                self.text.replace_range(start..start + quoted.len(), &placeholder);
                self.replaced += 1;
                true
            }
            None => false,
        }
    }

    /// Number of successful replacements so far
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn finish(self) -> String {
        self.text
    }
}
