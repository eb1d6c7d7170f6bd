//! Human-readable interpretation of an analysis.
//!
//! Nothing here is persisted. [`interpret`] is a pure template over the
//! stored scores; [`CommentaryClient`] asks a text-generation model for a
//! free-form reading of the transcript.

use serde_json::json;
use vidbias_core::{BiasVector, SentimentResult};

use crate::error::InferenceError;
use crate::inference::InferenceClient;

/// Balance scores beyond this magnitude count as leaning.
pub const LEANING_THRESHOLD: f64 = 30.0;

/// Characters of caption text sent with the commentary prompt.
pub const PROMPT_CAPTION_CHARS: usize = 3000;

/// Coarse reading of [`bias_balance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceZone {
    LeftLeaning,
    Balanced,
    RightLeaning,
}

impl BalanceZone {
    #[must_use]
    pub fn classify(balance: f64) -> Self {
        if balance < -LEANING_THRESHOLD {
            Self::LeftLeaning
        } else if balance > LEANING_THRESHOLD {
            Self::RightLeaning
        } else {
            Self::Balanced
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftLeaning => "left-leaning",
            Self::Balanced => "balanced",
            Self::RightLeaning => "right-leaning",
        }
    }
}

/// `(right - left) * 100`, from -100 (fully left) to 100 (fully right).
#[must_use]
pub fn bias_balance(bias: &BiasVector) -> f64 {
    ((bias.right - bias.left) * 100.0).clamp(-100.0, 100.0)
}

fn percent(v: f64) -> f64 {
    (v * 1000.0).round() / 10.0
}

/// Render a markdown interpretation of the scores. Deterministic.
#[must_use]
pub fn interpret(sentiment: &SentimentResult, bias: &BiasVector) -> String {
    let tone = sentiment.label.as_str().to_ascii_lowercase();
    let balance = bias_balance(bias);
    let zone = BalanceZone::classify(balance);

    let mut out = format!(
        "**Interpretation**\n\n\
         The transcript reads with a **{tone} tone** ({:.1}% confidence).\n\n\
         - Ideological split: **{:.1}% left**, **{:.1}% center**, **{:.1}% right**.\n\
         - Language: **{:.1}%** likely biased, **{:.1}%** likely neutral.\n\
         - Balance: **{balance:+.1}** ({}).\n\n",
        percent(sentiment.confidence),
        percent(bias.left),
        percent(bias.center),
        percent(bias.right),
        percent(bias.biased),
        percent(bias.neutral),
        zone.as_str()
    );

    out.push_str("**Improving neutrality**\n\n");
    if zone != BalanceZone::Balanced {
        out.push_str("- Include voices from the other side of the spectrum.\n");
    }
    if bias.biased > bias.neutral {
        out.push_str("- Replace loaded or emotive wording with plain description.\n");
    }
    out.push_str("- Back claims with data from more than one reputable source.\n");
    out.push_str("- Pair criticism with constructive context.\n");
    out
}

/// Prompt for the commentary model over the first [`PROMPT_CAPTION_CHARS`] characters.
#[must_use]
pub fn commentary_prompt(caption_text: &str) -> String {
    let excerpt: String = caption_text.chars().take(PROMPT_CAPTION_CHARS).collect();
    format!(
        "Below is the transcript of an online news video. Answer these questions about its tone and bias:\n\
         1. Is it a news report or an interview?\n\
         2. For an interview, are the questions neutral or do they lead the guest?\n\
         3. For a news report, is the reporting biased or neutral?\n\
         4. What is the main agenda or takeaway?\n\
         5. Are the facts presented accurately and fairly?\n\
         \n\
         Transcript:\n\
         {excerpt}"
    )
}

/// Free-text commentary from a hosted text-generation model.
#[derive(Clone)]
pub struct CommentaryClient {
    client: InferenceClient,
    model: String,
}

impl CommentaryClient {
    #[must_use]
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`InferenceError`] if the model call fails or returns no text.
    pub async fn summarize(&self, caption_text: &str) -> Result<String, InferenceError> {
        let prompt = commentary_prompt(caption_text);
        let text = self
            .client
            .generate(&self.model, &prompt, &json!({ "temperature": 0.7 }))
            .await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(InferenceError::MalformedResponse {
                model: self.model.clone(),
                reason: "empty generated_text".to_string(),
            });
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use vidbias_core::SentimentLabel;

    use super::*;

    fn bias(left: f64, right: f64, biased: f64) -> BiasVector {
        BiasVector {
            left,
            center: 1.0 - left - right,
            right,
            biased,
            neutral: 1.0 - biased,
        }
    }

    #[test]
    fn balance_spans_left_to_right() {
        assert!((bias_balance(&bias(1.0, 0.0, 0.5)) + 100.0).abs() < 1e-9);
        assert!((bias_balance(&bias(0.0, 1.0, 0.5)) - 100.0).abs() < 1e-9);
        assert!(bias_balance(&bias(0.3, 0.3, 0.5)).abs() < 1e-9);
    }

    #[test]
    fn zones_use_thirty_point_threshold() {
        assert_eq!(BalanceZone::classify(-30.1), BalanceZone::LeftLeaning);
        assert_eq!(BalanceZone::classify(-30.0), BalanceZone::Balanced);
        assert_eq!(BalanceZone::classify(30.0), BalanceZone::Balanced);
        assert_eq!(BalanceZone::classify(45.0), BalanceZone::RightLeaning);
    }

    #[test]
    fn interpret_reports_percentages_and_zone() {
        let sentiment = SentimentResult::new(SentimentLabel::Negative, 0.876);
        let text = interpret(&sentiment, &bias(0.6, 0.1, 0.7));

        assert!(text.contains("**negative tone** (87.6% confidence)"), "{text}");
        assert!(text.contains("**60.0% left**"), "{text}");
        assert!(text.contains("**70.0%** likely biased"), "{text}");
        assert!(text.contains("(left-leaning)"), "{text}");
        assert!(text.contains("other side of the spectrum"));
        assert!(text.contains("emotive wording"));
    }

    #[test]
    fn interpret_is_deterministic_and_quiet_when_balanced() {
        let sentiment = SentimentResult::new(SentimentLabel::Neutral, 0.5);
        let b = bias(0.3, 0.3, 0.2);
        let text = interpret(&sentiment, &b);
        assert_eq!(text, interpret(&sentiment, &b));
        assert!(text.contains("(balanced)"));
        assert!(!text.contains("other side of the spectrum"));
        assert!(!text.contains("emotive wording"));
    }

    #[test]
    fn prompt_truncates_caption_by_characters() {
        let caption = "é".repeat(PROMPT_CAPTION_CHARS + 50);
        let prompt = commentary_prompt(&caption);
        assert_eq!(prompt.matches('é').count(), PROMPT_CAPTION_CHARS);
        assert!(prompt.contains("5. Are the facts presented accurately and fairly?"));
    }
}
