//! Normalization of the heterogeneous hosted-inference response shapes.
//!
//! Classifiers answer `[{label, score}]` or `[[{label, score}, ...]]`;
//! generators answer `[{generated_text}]`. Everything downstream only sees
//! [`InferenceOutput`].

use serde::Deserialize;

use crate::error::InferenceError;

/// One class probability from a classifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Nested(Vec<Vec<LabelScore>>),
    Labels(Vec<LabelScore>),
    Generated(Vec<GeneratedText>),
}

/// A response reduced to one of the two shapes the pipeline consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutput {
    Labels(Vec<LabelScore>),
    Generated(String),
}

/// Parse a 2xx response body from `model`.
///
/// # Errors
///
/// Returns [`InferenceError::MalformedResponse`] if the body matches none of
/// the known shapes, carries no labels, or carries non-finite scores.
pub(crate) fn parse_output(model: &str, body: &str) -> Result<InferenceOutput, InferenceError> {
    let malformed = |reason: String| InferenceError::MalformedResponse {
        model: model.to_string(),
        reason,
    };

    let raw: RawPayload = serde_json::from_str(body)
        .map_err(|e| malformed(format!("unrecognised payload: {e}")))?;

    let labels = match raw {
        RawPayload::Nested(mut outer) => {
            if outer.is_empty() {
                return Err(malformed("empty prediction list".to_string()));
            }
            outer.swap_remove(0)
        }
        RawPayload::Labels(labels) => labels,
        RawPayload::Generated(items) => {
            return items
                .into_iter()
                .map(|g| g.generated_text)
                .find(|t| !t.trim().is_empty())
                .map(InferenceOutput::Generated)
                .ok_or_else(|| malformed("empty generated_text".to_string()));
        }
    };

    if labels.is_empty() {
        return Err(malformed("empty prediction list".to_string()));
    }
    if let Some(bad) = labels.iter().find(|l| !l.score.is_finite()) {
        return Err(malformed(format!("non-finite score for label '{}'", bad.label)));
    }
    Ok(InferenceOutput::Labels(labels))
}
