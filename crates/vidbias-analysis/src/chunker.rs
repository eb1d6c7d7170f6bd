//! Positional, non-overlapping transcript chunking under a token budget.

use std::sync::Arc;

use serde::Serialize;

use crate::tokenizer::Tokenizer;

/// One token-bounded slice of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptChunk {
    /// Position of this chunk in the transcript, starting at 0.
    pub index: usize,
    pub text: String,
    /// Never exceeds the chunker's `max_tokens`.
    pub token_count: usize,
}

/// Splits transcripts into consecutive windows of at most `max_tokens` tokens.
///
/// A window never ends between two pieces of one word unless that word alone
/// is longer than the window.
#[derive(Clone)]
pub struct Chunker {
    tokenizer: Arc<dyn Tokenizer>,
    max_tokens: usize,
}

impl Chunker {
    /// `max_tokens` is the model's input limit; the tokenizer's special
    /// tokens are reserved from it. The resulting budget is at least `1`.
    #[must_use]
    pub fn new(tokenizer: Arc<dyn Tokenizer>, max_tokens: usize) -> Self {
        let max_tokens = max_tokens
            .saturating_sub(tokenizer.special_tokens())
            .max(1);
        Self {
            tokenizer,
            max_tokens,
        }
    }

    #[must_use]
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    #[must_use]
    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// Chunk `text`. Empty or whitespace-only text yields no chunks.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<TranscriptChunk> {
        let tokens = self.tokenizer.tokenize(text);
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < tokens.len() {
            let end = self.window_end(&tokens, start);
            let window = &tokens[start..end];
            chunks.push(TranscriptChunk {
                index: chunks.len(),
                text: self.tokenizer.detokenize(window),
                token_count: window.len(),
            });
            start = end;
        }
        chunks
    }

    fn window_end(&self, tokens: &[String], start: usize) -> usize {
        let end = (start + self.max_tokens).min(tokens.len());
        if end == tokens.len() {
            return end;
        }
        let mut cut = end;
        while cut > start && self.tokenizer.continues_word(&tokens[cut]) {
            cut -= 1;
        }
        if cut > start {
            cut
        } else {
            end
        }
    }
}

impl std::fmt::Debug for Chunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunker")
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}
