//! Greedy whitespace-token chunking.
//!
//! Text is split on runs of whitespace and packed into chunks of at most
//! `max_tokens` tokens. Tokens are never broken, so a bound of zero degrades
//! to one chunk per token.

/// Default chunk bound used by the DOCX reader.
pub const DEFAULT_MAX_TOKENS: usize = 2048;

/// Splits text into bounded, whitespace-token-counted chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunker {
    max_tokens: usize,
}

impl TextChunker {
    /// Create a chunker with the given token bound.
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    /// The configured token bound.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Split `text` into chunks.
    ///
    /// Tokens inside a chunk are joined with a single space, so the original
    /// whitespace layout (newlines, repeated spaces) is not preserved.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for token in text.split_whitespace() {
            if !current.is_empty() && current.len() + 1 > self.max_tokens {
                chunks.push(current.join(" "));
                current.clear();
            }
            current.push(token);
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
        }

        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

/// Split `text` into chunks of at most `max_tokens` whitespace tokens.
///
/// # Example
///
/// ```
/// use unoffice::split_text;
///
/// assert_eq!(split_text("a b c d", 2), vec!["a b", "c d"]);
/// assert_eq!(split_text("a b c", 2), vec!["a b", "c"]);
/// assert!(split_text("", 2).is_empty());
/// ```
pub fn split_text(text: &str, max_tokens: usize) -> Vec<String> {
    TextChunker::new(max_tokens).split(text)
}

/// Number of whitespace-delimited tokens in `text`.
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}
