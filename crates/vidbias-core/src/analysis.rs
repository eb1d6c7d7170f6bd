//! Normalized score shapes shared by the scorers, the aggregator and storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a [`BiasVector`] is a valid distribution.
pub const DISTRIBUTION_EPSILON: f64 = 1e-6;

/// Document or chunk level sentiment class.
///
/// The variant order is the tie-break order used by aggregation, so it must
/// stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Map a stored label back to a variant. Unrecognized text reads as
    /// [`SentimentLabel::Unknown`] rather than failing the read.
    #[must_use]
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" => Ok(Self::Positive),
            "NEGATIVE" | "NEG" => Ok(Self::Negative),
            "NEUTRAL" | "NEU" => Ok(Self::Neutral),
            "UNKNOWN" => Ok(Self::Unknown),
            other => Err(format!("unrecognized sentiment label '{other}'")),
        }
    }
}

/// A sentiment class with the classifier's confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl SentimentResult {
    /// Build a result, clamping `confidence` into `[0, 1]` (NaN becomes 0).
    #[must_use]
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        Self {
            label,
            confidence: clamp_probability(confidence),
        }
    }
}

/// Five-way bias distribution.
///
/// `left + center + right` and `biased + neutral` are two independent
/// distributions; each sums to 1 once [`BiasVector::normalized`] is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasVector {
    pub left: f64,
    pub center: f64,
    pub right: f64,
    pub biased: f64,
    pub neutral: f64,
}

impl BiasVector {
    /// Rescale both axes so they each sum to 1.
    ///
    /// Negative or NaN components are treated as 0. An axis with no mass at
    /// all becomes uniform.
    #[must_use]
    pub fn normalized(self) -> Self {
        let left = non_negative(self.left);
        let center = non_negative(self.center);
        let right = non_negative(self.right);
        let biased = non_negative(self.biased);
        let neutral = non_negative(self.neutral);

        let ideology_total = left + center + right;
        let (left, center, right) = if ideology_total > f64::EPSILON {
            (
                left / ideology_total,
                center / ideology_total,
                right / ideology_total,
            )
        } else {
            (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
        };

        let bias_total = biased + neutral;
        let (biased, neutral) = if bias_total > f64::EPSILON {
            (biased / bias_total, neutral / bias_total)
        } else {
            (0.5, 0.5)
        };

        Self {
            left,
            center,
            right,
            biased,
            neutral,
        }
    }

    /// `true` when both axes sum to 1 within `epsilon` and no component is negative.
    #[must_use]
    pub fn is_distribution(&self, epsilon: f64) -> bool {
        let components = [self.left, self.center, self.right, self.biased, self.neutral];
        components.iter().all(|c| *c >= 0.0 && *c <= 1.0 + epsilon)
            && ((self.left + self.center + self.right) - 1.0).abs() <= epsilon
            && ((self.biased + self.neutral) - 1.0).abs() <= epsilon
    }
}

/// Whether the bias classifier runs per chunk or over the whole transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BiasMode {
    #[default]
    Chunked,
    Whole,
}

impl FromStr for BiasMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chunked" | "chunk" => Ok(Self::Chunked),
            "whole" | "document" => Ok(Self::Whole),
            other => Err(format!("expected 'chunked' or 'whole', got '{other}'")),
        }
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_nan() || v < 0.0 {
        0.0
    } else {
        v
    }
}

fn clamp_probability(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
