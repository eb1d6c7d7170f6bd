//! Pluggable tokenization used to size transcript chunks.
//!
//! [`ModelTokenizer`] counts in the sentiment model's own vocabulary and is
//! used whenever its `tokenizer.json` is available. [`WhitespaceTokenizer`]
//! counts words; pair it with [`word_budget`] so word-sized chunks still fit
//! the model.

use std::path::Path;

use crate::error::TokenizerError;

/// Sub-word prefix of WordPiece (BERT family) vocabularies.
pub const WORDPIECE_CONTINUATION: &str = "##";

/// A reversible tokenization.
///
/// `detokenize(&tokenize(x))` must reproduce `x` up to normalization (for
/// example collapsed whitespace or lowercasing).
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
    fn detokenize(&self, tokens: &[String]) -> String;

    /// `true` if `token` continues the word started by the token before it.
    fn continues_word(&self, _token: &str) -> bool {
        false
    }

    /// Tokens the model wraps around every input, such as `[CLS]` and `[SEP]`.
    fn special_tokens(&self) -> usize {
        0
    }
}

/// Splits on Unicode whitespace and rejoins with single spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn detokenize(&self, tokens: &[String]) -> String {
        tokens.join(" ")
    }
}

/// Words per chunk for a model budget of `max_tokens` when chunking with
/// [`WhitespaceTokenizer`].
///
/// English captions average about 1.3 WordPiece tokens per word. The budget
/// assumes 1.5 so punctuation-heavy text still fits.
#[must_use]
pub fn word_budget(max_tokens: usize) -> usize {
    (max_tokens.saturating_mul(2) / 3).max(1)
}

/// Tokenizer loaded from a Hugging Face `tokenizer.json` (WordPiece models).
pub struct ModelTokenizer {
    inner: tokenizers::Tokenizer,
    special_tokens: usize,
}

impl ModelTokenizer {
    /// # Errors
    ///
    /// Returns [`TokenizerError::Load`] if the file is missing or not a tokenizer definition.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TokenizerError> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| TokenizerError::Load {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_inner(inner))
    }

    /// Parse an in-memory `tokenizer.json` document.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizerError::Load`] if `json` is not a tokenizer definition.
    pub fn from_json(json: &str) -> Result<Self, TokenizerError> {
        let inner = json
            .parse::<tokenizers::Tokenizer>()
            .map_err(|e| TokenizerError::Load {
                source_name: "inline json".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_inner(inner))
    }

    fn from_inner(inner: tokenizers::Tokenizer) -> Self {
        use tokenizers::PostProcessor as _;

        let special_tokens = inner
            .get_post_processor()
            .map_or(0, |processor| processor.added_tokens(false));
        Self {
            inner,
            special_tokens,
        }
    }
}

impl Tokenizer for ModelTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        match self.inner.encode(text, false) {
            Ok(encoding) => encoding.get_tokens().to_vec(),
            Err(e) => {
                tracing::warn!(error = %e, "model tokenization failed, splitting on whitespace");
                WhitespaceTokenizer.tokenize(text)
            }
        }
    }

    fn detokenize(&self, tokens: &[String]) -> String {
        let ids: Option<Vec<u32>> = tokens
            .iter()
            .map(|token| self.inner.token_to_id(token))
            .collect();
        match ids.map(|ids| self.inner.decode(&ids, true)) {
            Some(Ok(text)) => text,
            _ => tokens.join(" "),
        }
    }

    fn continues_word(&self, token: &str) -> bool {
        token.starts_with(WORDPIECE_CONTINUATION)
    }

    fn special_tokens(&self) -> usize {
        self.special_tokens
    }
}

impl std::fmt::Debug for ModelTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelTokenizer")
            .field("special_tokens", &self.special_tokens)
            .finish_non_exhaustive()
    }
}
