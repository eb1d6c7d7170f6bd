use async_trait::async_trait;
use vidbias_core::BiasVector;

use super::BiasScorer;
use crate::error::InferenceError;
use crate::inference::{InferenceClient, LabelScore};

/// Bias scorer combining two hosted classifiers: an ideology model
/// (left / center / right) and a bias-detection model (biased / neutral).
#[derive(Clone)]
pub struct HfBiasScorer {
    client: InferenceClient,
    ideology_model: String,
    bias_model: String,
}

impl HfBiasScorer {
    #[must_use]
    pub fn new(
        client: InferenceClient,
        ideology_model: impl Into<String>,
        bias_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            ideology_model: ideology_model.into(),
            bias_model: bias_model.into(),
        }
    }
}

#[async_trait]
impl BiasScorer for HfBiasScorer {
    async fn score(&self, text: &str) -> Result<BiasVector, InferenceError> {
        let (ideology, bias) = tokio::try_join!(
            self.client.classify(&self.ideology_model, text),
            self.client.classify(&self.bias_model, text),
        )?;

        let (left, center, right) = ideology_split(&self.ideology_model, &ideology)?;
        let (biased, neutral) = bias_split(&self.bias_model, &bias)?;

        Ok(BiasVector {
            left,
            center,
            right,
            biased,
            neutral,
        }
        .normalized())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ideology {
    Left,
    Center,
    Right,
}

fn ideology_label(label: &str) -> Option<Ideology> {
    match label.trim().to_ascii_uppercase().as_str() {
        "LEFT" | "LABEL_0" => Some(Ideology::Left),
        "CENTER" | "CENTRE" | "LABEL_1" => Some(Ideology::Center),
        "RIGHT" | "LABEL_2" => Some(Ideology::Right),
        _ => None,
    }
}

/// Returns `Some(true)` for the biased class, `Some(false)` for the neutral one.
fn bias_label(label: &str) -> Option<bool> {
    match label.trim().to_ascii_uppercase().as_str() {
        "BIASED" => Some(true),
        "NEUTRAL" | "NON-BIASED" | "UNBIASED" => Some(false),
        _ => None,
    }
}

/// Absent ideology classes count as 0; at least one must be present.
fn ideology_split(model: &str, labels: &[LabelScore]) -> Result<(f64, f64, f64), InferenceError> {
    let mut left = 0.0;
    let mut center = 0.0;
    let mut right = 0.0;
    let mut recognised = false;

    for ls in labels {
        let Some(class) = ideology_label(&ls.label) else {
            continue;
        };
        recognised = true;
        match class {
            Ideology::Left => left += ls.score,
            Ideology::Center => center += ls.score,
            Ideology::Right => right += ls.score,
        }
    }

    if !recognised {
        return Err(InferenceError::MalformedResponse {
            model: model.to_string(),
            reason: "no recognised ideology label".to_string(),
        });
    }
    Ok((left, center, right))
}

/// A missing side is filled with the complement of the present one.
fn bias_split(model: &str, labels: &[LabelScore]) -> Result<(f64, f64), InferenceError> {
    let mut biased: Option<f64> = None;
    let mut neutral: Option<f64> = None;

    for ls in labels {
        match bias_label(&ls.label) {
            Some(true) => *biased.get_or_insert(0.0) += ls.score,
            Some(false) => *neutral.get_or_insert(0.0) += ls.score,
            None => {}
        }
    }

    match (biased, neutral) {
        (Some(b), Some(n)) => Ok((b, n)),
        (Some(b), None) => Ok((b, (1.0 - b).max(0.0))),
        (None, Some(n)) => Ok(((1.0 - n).max(0.0), n)),
        (None, None) => Err(InferenceError::MalformedResponse {
            model: model.to_string(),
            reason: "no recognised bias label".to_string(),
        }),
    }
}
