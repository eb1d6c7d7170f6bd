use async_trait::async_trait;
use vidbias_core::{SentimentLabel, SentimentResult};

use super::SentimentScorer;
use crate::chunker::TranscriptChunk;
use crate::error::InferenceError;
use crate::inference::{InferenceClient, LabelScore};

/// Sentiment scorer backed by a hosted text-classification model.
#[derive(Clone)]
pub struct HfSentimentScorer {
    client: InferenceClient,
    model: String,
}

impl HfSentimentScorer {
    #[must_use]
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl SentimentScorer for HfSentimentScorer {
    async fn score(&self, chunk: &TranscriptChunk) -> Result<SentimentResult, InferenceError> {
        let labels = self.client.classify(&self.model, &chunk.text).await?;
        let result = pick_sentiment(&self.model, &labels)?;
        tracing::debug!(
            chunk = chunk.index,
            label = %result.label,
            confidence = result.confidence,
            "chunk sentiment scored"
        );
        Ok(result)
    }
}

/// The highest-scoring recognised label. Unrecognised labels are ignored.
fn pick_sentiment(model: &str, labels: &[LabelScore]) -> Result<SentimentResult, InferenceError> {
    labels
        .iter()
        .filter_map(|ls| {
            ls.label
                .parse::<SentimentLabel>()
                .ok()
                .filter(|label| *label != SentimentLabel::Unknown)
                .map(|label| (label, ls.score))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(label, score)| SentimentResult::new(label, score))
        .ok_or_else(|| InferenceError::MalformedResponse {
            model: model.to_string(),
            reason: "no recognised sentiment label".to_string(),
        })
}
