use thiserror::Error;

/// Failure talking to a hosted classifier or text-generation model.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error calling {model}: {source}")]
    Http {
        model: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status. The body is not parsed.
    #[error("{model} returned status {status}")]
    Status { model: String, status: u16 },

    /// The call did not finish within the configured per-call timeout.
    #[error("{model} timed out after {timeout_ms} ms")]
    Timeout { model: String, timeout_ms: u64 },

    /// A 2xx response whose payload is missing the expected fields.
    #[error("malformed response from {model}: {reason}")]
    MalformedResponse { model: String, reason: String },
}

/// Failure loading a model tokenizer definition.
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("failed to load tokenizer from {source_name}: {reason}")]
    Load { source_name: String, reason: String },
}

/// Failure fetching video metadata and captions.
///
/// "No captions" is not an error; see [`crate::fetcher::FetchOutcome`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by an [`crate::store::AnalysisStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another writer stored a record for this video first.
    #[error("an analysis for video '{video_id}' already exists")]
    DuplicateKey { video_id: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<vidbias_db::DbError> for StoreError {
    fn from(err: vidbias_db::DbError) -> Self {
        match err {
            vidbias_db::DbError::DuplicateKey { video_id } => Self::DuplicateKey { video_id },
            other => Self::Backend(other.to_string()),
        }
    }
}

/// Terminal failure of one pipeline run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input is neither a video id nor a recognised video URL.
    #[error("could not extract a video id from '{0}'")]
    InvalidIdentifier(String),

    /// The video exists but has no usable captions; nothing was stored.
    #[error("no transcript available for video '{video_id}'")]
    NoTranscript { video_id: String },

    /// The metadata/transcript collaborator itself failed.
    #[error("fetching video '{video_id}' failed: {source}")]
    Fetch {
        video_id: String,
        #[source]
        source: FetchError,
    },

    /// A scorer failed; the run is aborted and nothing is stored.
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    /// A concurrent run stored this video first. Re-read it via lookup.
    #[error("video '{video_id}' was stored by a concurrent run")]
    DuplicateKeyConflict { video_id: String },

    /// The store is unavailable; the computed result is lost.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for AnalysisError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { video_id } => Self::DuplicateKeyConflict { video_id },
            StoreError::Backend(msg) => Self::Storage(msg),
        }
    }
}
