//! Video identifier extraction from URLs or bare ids.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::error::AnalysisError;

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id regex"));

/// A validated 11-character video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Accept a bare id or any of the recognised URL shapes.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidIdentifier`] when no id can be extracted.
    pub fn parse(input: &str) -> Result<Self, AnalysisError> {
        extract_video_id(input)
            .map(Self)
            .ok_or_else(|| AnalysisError::InvalidIdentifier(input.trim().to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical watch URL stored alongside the analysis.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the id from `input`, returning `None` if it is not recognised.
///
/// Handles `youtu.be/<id>`, `youtube.com/watch?v=<id>`, `/embed/<id>`,
/// `/v/<id>`, `/shorts/<id>` and `/live/<id>` on the `www.`, `m.` and bare
/// hosts. The scheme may be omitted.
#[must_use]
pub fn extract_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if VIDEO_ID_RE.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let url = Url::parse(&with_scheme).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host);

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("embed" | "v" | "shorts" | "live") => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    }?;

    VIDEO_ID_RE.is_match(&candidate).then_some(candidate)
}
