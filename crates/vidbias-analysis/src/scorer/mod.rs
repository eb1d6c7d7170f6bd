//! Scorer seams used by the orchestrator.
//!
//! Each scorer normalizes its model's raw label list into a
//! [`SentimentResult`] or [`BiasVector`] at this boundary; nothing downstream
//! sees provider-specific labels.

mod bias;
mod sentiment;

use async_trait::async_trait;
use vidbias_core::{BiasVector, SentimentResult};

use crate::chunker::TranscriptChunk;
use crate::error::InferenceError;

pub use bias::HfBiasScorer;
pub use sentiment::HfSentimentScorer;

/// Classifies the sentiment of one transcript chunk.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`InferenceError`] when the classifier is unreachable, times
    /// out, or answers with a payload that carries no usable label.
    async fn score(&self, chunk: &TranscriptChunk) -> Result<SentimentResult, InferenceError>;
}

/// Produces a normalized five-way bias distribution for a span of text.
///
/// The same interface serves per-chunk and whole-transcript scoring; the
/// orchestrator decides which text it passes in.
#[async_trait]
pub trait BiasScorer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`InferenceError`] on the same conditions as [`SentimentScorer::score`].
    async fn score(&self, text: &str) -> Result<BiasVector, InferenceError>;
}
