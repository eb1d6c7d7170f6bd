//! Length-weighted aggregation of chunk scores into document scores.
//!
//! Every input is a `(token_count, score)` pair. Weights are token counts
//! relative to the total; when every count is 0 the chunks weigh equally.
//! Results do not depend on input order beyond floating-point tolerance.

use std::collections::BTreeMap;

use vidbias_core::{BiasVector, SentimentLabel, SentimentResult};

/// Label masses closer than this are treated as tied.
const TIE_EPSILON: f64 = 1e-12;

#[allow(clippy::cast_precision_loss)]
fn weights<T>(scored: &[(usize, T)]) -> Vec<f64> {
    let total: usize = scored.iter().map(|(tokens, _)| *tokens).sum();
    if total == 0 {
        let n = scored.len() as f64;
        vec![1.0 / n; scored.len()]
    } else {
        let total = total as f64;
        scored
            .iter()
            .map(|(tokens, _)| *tokens as f64 / total)
            .collect()
    }
}

#[derive(Default)]
struct LabelMass {
    weight: f64,
    confidence_mass: f64,
}

/// Aggregate per-chunk sentiment. Returns `None` for an empty slice.
///
/// The label with the largest weighted confidence mass wins; exact ties go to
/// the label that sorts first. The confidence is the weighted mean confidence
/// of the chunks carrying the winning label.
#[must_use]
pub fn aggregate_sentiment(scored: &[(usize, SentimentResult)]) -> Option<SentimentResult> {
    if scored.is_empty() {
        return None;
    }

    let mut by_label: BTreeMap<SentimentLabel, LabelMass> = BTreeMap::new();
    for ((_, result), weight) in scored.iter().zip(weights(scored)) {
        let entry = by_label.entry(result.label).or_default();
        entry.weight += weight;
        entry.confidence_mass += weight * result.confidence;
    }

    let mut winner: Option<(SentimentLabel, &LabelMass)> = None;
    for (label, mass) in &by_label {
        match winner {
            Some((_, best)) if mass.confidence_mass <= best.confidence_mass + TIE_EPSILON => {}
            _ => winner = Some((*label, mass)),
        }
    }

    winner.map(|(label, mass)| {
        let confidence = if mass.weight > 0.0 {
            mass.confidence_mass / mass.weight
        } else {
            0.0
        };
        SentimentResult::new(label, confidence)
    })
}

/// Aggregate per-chunk bias vectors. Returns `None` for an empty slice.
///
/// Each component is the weighted mean of that component; the result is
/// re-normalized so both axes sum to 1.
#[must_use]
pub fn aggregate_bias(scored: &[(usize, BiasVector)]) -> Option<BiasVector> {
    if scored.is_empty() {
        return None;
    }

    let mut acc = BiasVector {
        left: 0.0,
        center: 0.0,
        right: 0.0,
        biased: 0.0,
        neutral: 0.0,
    };
    for ((_, v), w) in scored.iter().zip(weights(scored)) {
        acc.left += w * v.left;
        acc.center += w * v.center;
        acc.right += w * v.right;
        acc.biased += w * v.biased;
        acc.neutral += w * v.neutral;
    }

    Some(acc.normalized())
}
