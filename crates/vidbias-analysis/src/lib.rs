//! Transcript bias and sentiment analysis.
//!
//! A video id (or URL) goes through identify, lookup, fetch, analyze and
//! persist. Transcripts are chunked under a token budget, every chunk is
//! scored for sentiment and bias by hosted classifiers, chunk scores are
//! length-weighted into one document score, and the result is stored once per
//! video. Later requests for the same video are served from storage.

pub mod aggregator;
pub mod chunker;
pub mod commentary;
pub mod error;
pub mod fetcher;
pub mod identify;
pub mod inference;
pub mod pipeline;
pub mod scorer;
pub mod store;
pub mod tokenizer;
pub mod types;

pub use aggregator::{aggregate_bias, aggregate_sentiment};
pub use chunker::{Chunker, TranscriptChunk};
pub use commentary::{bias_balance, interpret, BalanceZone, CommentaryClient};
pub use error::{AnalysisError, FetchError, InferenceError, StoreError, TokenizerError};
pub use fetcher::{FetchOutcome, HttpTranscriptFetcher, TranscriptFetcher};
pub use identify::{extract_video_id, VideoId};
pub use inference::{retry_budget, InferenceClient, InferenceOutput, LabelScore};
pub use pipeline::{AnalysisOutcome, Orchestrator, PipelineOptions, PipelineStage};
pub use scorer::{BiasScorer, HfBiasScorer, HfSentimentScorer, SentimentScorer};
pub use store::{
    get_or_create, AnalysisStore, Lookup, MemoryAnalysisStore, PgAnalysisStore, Provenance,
};
pub use tokenizer::{word_budget, ModelTokenizer, Tokenizer, WhitespaceTokenizer};
pub use types::{NewVideoAnalysis, VideoAnalysisRecord, VideoMetadata, VideoTranscript};
