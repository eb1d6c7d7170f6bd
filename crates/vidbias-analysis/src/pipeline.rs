//! Pipeline orchestration: identify, lookup, fetch, analyze, persist.
//!
//! The orchestrator holds no global state. Every collaborator is injected,
//! so tests substitute fakes for the scorers, the fetcher and the store.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use vidbias_core::{AppConfig, BiasMode, BiasVector, SentimentResult};

use crate::aggregator::{aggregate_bias, aggregate_sentiment};
use crate::chunker::{Chunker, TranscriptChunk};
use crate::error::{AnalysisError, InferenceError};
use crate::fetcher::{FetchOutcome, TranscriptFetcher};
use crate::identify::VideoId;
use crate::inference::retry_budget;
use crate::scorer::{BiasScorer, SentimentScorer};
use crate::store::{get_or_create, AnalysisStore, Lookup, Provenance};
use crate::types::{NewVideoAnalysis, VideoAnalysisRecord};

/// The linear stages of one run. Used as the `stage` field in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Identify,
    Lookup,
    Fetch,
    Analyze,
    Persist,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Identify => "IDENTIFY",
            Self::Lookup => "LOOKUP",
            Self::Fetch => "FETCH",
            Self::Analyze => "ANALYZE",
            Self::Persist => "PERSIST",
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub bias_mode: BiasMode,
    /// Upper bound on one scorer call, HTTP retries and back-off included.
    /// Expiry is an [`InferenceError::Timeout`].
    pub inference_timeout: Duration,
    /// Chunks scored at once by each scorer. Sentiment and bias run side by
    /// side, so up to twice this many scorer calls are in flight.
    pub inference_concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            bias_mode: BiasMode::Chunked,
            inference_timeout: Duration::from_secs(30),
            inference_concurrency: 4,
        }
    }
}

impl PipelineOptions {
    /// The scorer timeout is the whole retry budget of the HTTP client, so a
    /// timed-out attempt still leaves room for its retries.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            bias_mode: config.bias_mode,
            inference_timeout: retry_budget(
                Duration::from_secs(config.inference_timeout_secs),
                config.inference_max_retries,
                config.inference_retry_backoff_ms,
            ),
            inference_concurrency: config.inference_concurrency,
        }
    }
}

/// A finished run: the canonical record and whether this run created it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub record: VideoAnalysisRecord,
    pub provenance: Provenance,
}

pub struct Orchestrator {
    chunker: Chunker,
    sentiment: Arc<dyn SentimentScorer>,
    bias: Arc<dyn BiasScorer>,
    fetcher: Arc<dyn TranscriptFetcher>,
    store: Arc<dyn AnalysisStore>,
    options: PipelineOptions,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        chunker: Chunker,
        sentiment: Arc<dyn SentimentScorer>,
        bias: Arc<dyn BiasScorer>,
        fetcher: Arc<dyn TranscriptFetcher>,
        store: Arc<dyn AnalysisStore>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            chunker,
            sentiment,
            bias,
            fetcher,
            store,
            options,
        }
    }

    /// Return the stored analysis for `input`, or compute and store it.
    ///
    /// Scorer failures abort the run; nothing is stored and no placeholder is
    /// substituted.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InvalidIdentifier`] if no video id can be extracted.
    /// - [`AnalysisError::NoTranscript`] if the video has no captions.
    /// - [`AnalysisError::Fetch`] if the transcript service fails.
    /// - [`AnalysisError::Inference`] if any scorer call fails or times out.
    /// - [`AnalysisError::DuplicateKeyConflict`] if a concurrent run stored the video first.
    /// - [`AnalysisError::Storage`] if the store is unavailable.
    pub async fn analyze(&self, input: &str) -> Result<AnalysisOutcome, AnalysisError> {
        let video_id = VideoId::parse(input)?;
        tracing::debug!(stage = %PipelineStage::Identify, video_id = %video_id, "video identified");

        tracing::debug!(stage = %PipelineStage::Lookup, video_id = %video_id, "looking up stored analysis");
        let (record, provenance) =
            get_or_create(self.store.as_ref(), &video_id, || self.compute(&video_id)).await?;

        match provenance {
            Provenance::Stored => {
                tracing::info!(video_id = %video_id, "serving stored analysis");
            }
            Provenance::Created => {
                tracing::info!(
                    stage = %PipelineStage::Persist,
                    video_id = %video_id,
                    sentiment = %record.sentiment.label,
                    "analysis stored"
                );
            }
        }

        Ok(AnalysisOutcome { record, provenance })
    }

    /// Like [`Orchestrator::analyze`], but a lost insert race is resolved by
    /// reading the winner's record.
    ///
    /// # Errors
    ///
    /// Same as [`Orchestrator::analyze`], except that
    /// [`AnalysisError::DuplicateKeyConflict`] is only returned if the
    /// winning record cannot be read back.
    pub async fn analyze_or_reload(&self, input: &str) -> Result<AnalysisOutcome, AnalysisError> {
        match self.analyze(input).await {
            Err(AnalysisError::DuplicateKeyConflict { video_id }) => {
                let id = VideoId::parse(&video_id)?;
                match self.store.lookup(&id).await? {
                    Lookup::Found(record) => Ok(AnalysisOutcome {
                        record,
                        provenance: Provenance::Stored,
                    }),
                    Lookup::Missing => Err(AnalysisError::DuplicateKeyConflict { video_id }),
                }
            }
            other => other,
        }
    }

    /// Read-only lookup; never fetches or scores.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidIdentifier`] or [`AnalysisError::Storage`].
    pub async fn stored(&self, input: &str) -> Result<Option<VideoAnalysisRecord>, AnalysisError> {
        let video_id = VideoId::parse(input)?;
        Ok(match self.store.lookup(&video_id).await? {
            Lookup::Found(record) => Some(record),
            Lookup::Missing => None,
        })
    }

    async fn compute(&self, video_id: &VideoId) -> Result<NewVideoAnalysis, AnalysisError> {
        tracing::debug!(stage = %PipelineStage::Fetch, video_id = %video_id, "fetching transcript");
        let transcript = match self.fetcher.fetch(video_id).await {
            Ok(FetchOutcome::Available(transcript)) => transcript,
            Ok(FetchOutcome::Unavailable) => {
                return Err(AnalysisError::NoTranscript {
                    video_id: video_id.to_string(),
                });
            }
            Err(source) => {
                return Err(AnalysisError::Fetch {
                    video_id: video_id.to_string(),
                    source,
                });
            }
        };

        let chunks = self.chunker.chunk(&transcript.caption_text);
        if chunks.is_empty() {
            return Err(AnalysisError::NoTranscript {
                video_id: video_id.to_string(),
            });
        }
        tracing::debug!(
            stage = %PipelineStage::Analyze,
            video_id = %video_id,
            chunks = chunks.len(),
            bias_mode = ?self.options.bias_mode,
            "scoring transcript"
        );

        let (sentiments, biases) =
            tokio::try_join!(self.score_sentiment(&chunks), self.score_bias(&chunks))?;

        let sentiment = aggregate_sentiment(&sentiments).ok_or_else(|| AnalysisError::NoTranscript {
            video_id: video_id.to_string(),
        })?;
        let bias = aggregate_bias(&biases).ok_or_else(|| AnalysisError::NoTranscript {
            video_id: video_id.to_string(),
        })?;

        tracing::debug!(stage = %PipelineStage::Persist, video_id = %video_id, "persisting analysis");
        Ok(NewVideoAnalysis {
            video_id: video_id.to_string(),
            video_url: video_id.canonical_url(),
            metadata: transcript.metadata,
            caption_text: transcript.caption_text,
            sentiment,
            bias,
        })
    }

    async fn score_sentiment(
        &self,
        chunks: &[TranscriptChunk],
    ) -> Result<Vec<(usize, SentimentResult)>, InferenceError> {
        stream::iter(chunks)
            .map(|chunk| async move {
                let result = self
                    .with_timeout("sentiment", self.sentiment.score(chunk))
                    .await?;
                Ok::<_, InferenceError>((chunk.token_count, result))
            })
            .buffered(self.concurrency())
            .try_collect()
            .await
    }

    async fn score_bias(
        &self,
        chunks: &[TranscriptChunk],
    ) -> Result<Vec<(usize, BiasVector)>, InferenceError> {
        match self.options.bias_mode {
            BiasMode::Chunked => {
                stream::iter(chunks)
                    .map(|chunk| async move {
                        let vector = self.with_timeout("bias", self.bias.score(&chunk.text)).await?;
                        Ok::<_, InferenceError>((chunk.token_count, vector))
                    })
                    .buffered(self.concurrency())
                    .try_collect()
                    .await
            }
            BiasMode::Whole => {
                let tokens: usize = chunks.iter().map(|c| c.token_count).sum();
                let text = chunks
                    .iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let vector = self.with_timeout("bias", self.bias.score(&text)).await?;
                Ok(vec![(tokens, vector)])
            }
        }
    }

    fn concurrency(&self) -> usize {
        self.options.inference_concurrency.max(1)
    }

    async fn with_timeout<T, Fut>(&self, scorer: &str, fut: Fut) -> Result<T, InferenceError>
    where
        Fut: Future<Output = Result<T, InferenceError>>,
    {
        let timeout = self.options.inference_timeout;
        tokio::time::timeout(timeout, fut)
            .await
            .map_err(|_| InferenceError::Timeout {
                model: scorer.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Barrier;
    use vidbias_core::SentimentLabel;

    use super::*;
    use crate::error::FetchError;
    use crate::store::MemoryAnalysisStore;
    use crate::tokenizer::WhitespaceTokenizer;
    use crate::types::{VideoMetadata, VideoTranscript};

    const ID: &str = "dQw4w9WgXcQ";

    /// Tracks how many calls are running at once.
    #[derive(Default)]
    struct InFlight {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl InFlight {
        async fn hold(&self, delay: Option<Duration>) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.current.fetch_sub(1, Ordering::SeqCst);
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct CountingSentiment {
        calls: AtomicUsize,
        in_flight: InFlight,
        fail: bool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl SentimentScorer for CountingSentiment {
        async fn score(&self, chunk: &TranscriptChunk) -> Result<SentimentResult, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.in_flight.hold(self.delay).await;
            if self.fail {
                return Err(InferenceError::Status {
                    model: "sentiment".to_string(),
                    status: 503,
                });
            }
            let label = if chunk.text.contains("great") {
                SentimentLabel::Positive
            } else {
                SentimentLabel::Neutral
            };
            Ok(SentimentResult::new(label, 0.9))
        }
    }

    #[derive(Default)]
    struct CountingBias {
        calls: AtomicUsize,
        in_flight: InFlight,
        delay: Option<Duration>,
        texts: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BiasScorer for CountingBias {
        async fn score(&self, text: &str) -> Result<BiasVector, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.texts.lock().unwrap().push(text.to_string());
            self.in_flight.hold(self.delay).await;
            Ok(BiasVector {
                left: 0.6,
                center: 0.3,
                right: 0.2,
                biased: 0.4,
                neutral: 0.6,
            })
        }
    }

    struct ScriptedFetcher {
        captions: Option<String>,
        calls: AtomicUsize,
        barrier: Option<Barrier>,
        fail: bool,
    }

    impl ScriptedFetcher {
        fn with_captions(captions: &str) -> Self {
            Self {
                captions: Some(captions.to_string()),
                calls: AtomicUsize::new(0),
                barrier: None,
                fail: false,
            }
        }
    }

    #[async_trait]
    impl TranscriptFetcher for ScriptedFetcher {
        async fn fetch(&self, _video_id: &VideoId) -> Result<FetchOutcome, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            if self.fail {
                return Err(FetchError::UnexpectedStatus {
                    status: 500,
                    url: "http://transcripts.test/videos".to_string(),
                });
            }
            Ok(match &self.captions {
                Some(text) => FetchOutcome::Available(VideoTranscript {
                    metadata: VideoMetadata {
                        title: "Budget debate".to_string(),
                        channel_name: "Civic Desk".to_string(),
                        published_at: None,
                        view_count: 1_000,
                    },
                    caption_text: text.clone(),
                }),
                None => FetchOutcome::Unavailable,
            })
        }
    }

    struct Harness {
        orchestrator: Orchestrator,
        sentiment: Arc<CountingSentiment>,
        bias: Arc<CountingBias>,
        fetcher: Arc<ScriptedFetcher>,
        store: Arc<MemoryAnalysisStore>,
    }

    fn harness_with(
        sentiment: CountingSentiment,
        fetcher: ScriptedFetcher,
        options: PipelineOptions,
    ) -> Harness {
        harness_full(sentiment, CountingBias::default(), fetcher, options)
    }

    fn harness_full(
        sentiment: CountingSentiment,
        bias: CountingBias,
        fetcher: ScriptedFetcher,
        options: PipelineOptions,
    ) -> Harness {
        let sentiment = Arc::new(sentiment);
        let bias = Arc::new(bias);
        let fetcher = Arc::new(fetcher);
        let store = Arc::new(MemoryAnalysisStore::new());
        let orchestrator = Orchestrator::new(
            Chunker::new(Arc::new(WhitespaceTokenizer), 4),
            sentiment.clone(),
            bias.clone(),
            fetcher.clone(),
            store.clone(),
            options,
        );
        Harness {
            orchestrator,
            sentiment,
            bias,
            fetcher,
            store,
        }
    }

    fn harness(captions: &str) -> Harness {
        harness_with(
            CountingSentiment::default(),
            ScriptedFetcher::with_captions(captions),
            PipelineOptions::default(),
        )
    }

    #[tokio::test]
    async fn first_run_creates_and_normalizes() {
        let h = harness("this is a great debate about the city budget");
        let outcome = h.orchestrator.analyze(ID).await.unwrap();

        assert_eq!(outcome.provenance, Provenance::Created);
        assert_eq!(outcome.record.video_id, ID);
        assert_eq!(outcome.record.video_url, format!("https://www.youtube.com/watch?v={ID}"));
        assert_eq!(outcome.record.channel_name, "Civic Desk");
        assert!(outcome.record.bias.is_distribution(vidbias_core::DISTRIBUTION_EPSILON));
        assert!((outcome.record.bias.left - 0.545).abs() < 1e-3);
        // 9 tokens at budget 4 -> 3 chunks, each scored by both scorers.
        assert_eq!(h.sentiment.calls.load(Ordering::SeqCst), 3);
        assert_eq!(h.bias.calls.load(Ordering::SeqCst), 3);
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn second_run_is_served_from_storage() {
        let h = harness("a great transcript");
        let first = h.orchestrator.analyze(ID).await.unwrap();
        let second = h
            .orchestrator
            .analyze(&format!("https://youtu.be/{ID}"))
            .await
            .unwrap();

        assert_eq!(second.provenance, Provenance::Stored);
        assert_eq!(first.record, second.record);
        assert_eq!(h.sentiment.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.bias.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_first_runs_store_exactly_one_record() {
        let mut fetcher = ScriptedFetcher::with_captions("one two three four five");
        fetcher.barrier = Some(Barrier::new(2));
        let h = harness_with(CountingSentiment::default(), fetcher, PipelineOptions::default());

        let (a, b) = tokio::join!(h.orchestrator.analyze(ID), h.orchestrator.analyze(ID));
        let (winner, loser) = match (a, b) {
            (Ok(w), Err(l)) | (Err(l), Ok(w)) => (w, l),
            other => panic!("expected one winner and one conflict, got {other:?}"),
        };
        assert_eq!(winner.provenance, Provenance::Created);
        assert!(matches!(loser, AnalysisError::DuplicateKeyConflict { .. }));
        assert_eq!(h.store.len().await, 1);

        let retry = h.orchestrator.analyze(ID).await.unwrap();
        assert_eq!(retry.provenance, Provenance::Stored);
        assert_eq!(retry.record, winner.record);
    }

    #[tokio::test]
    async fn analyze_or_reload_resolves_the_race() {
        let mut fetcher = ScriptedFetcher::with_captions("one two three");
        fetcher.barrier = Some(Barrier::new(2));
        let h = harness_with(CountingSentiment::default(), fetcher, PipelineOptions::default());

        let (a, b) = tokio::join!(
            h.orchestrator.analyze_or_reload(ID),
            h.orchestrator.analyze_or_reload(ID)
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.record, b.record);
        let mut provenances = [a.provenance, b.provenance];
        provenances.sort_by_key(|p| matches!(p, Provenance::Stored));
        assert_eq!(provenances, [Provenance::Created, Provenance::Stored]);
    }

    #[tokio::test]
    async fn empty_transcript_is_no_transcript() {
        let h = harness("   \n\t ");
        let err = h.orchestrator.analyze(ID).await.unwrap_err();
        assert!(matches!(err, AnalysisError::NoTranscript { .. }));
        assert_eq!(h.sentiment.calls.load(Ordering::SeqCst), 0);
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_captions_are_no_transcript() {
        let mut fetcher = ScriptedFetcher::with_captions("");
        fetcher.captions = None;
        let h = harness_with(CountingSentiment::default(), fetcher, PipelineOptions::default());

        let err = h.orchestrator.analyze(ID).await.unwrap_err();
        assert!(matches!(err, AnalysisError::NoTranscript { ref video_id } if video_id == ID));
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let mut fetcher = ScriptedFetcher::with_captions("words");
        fetcher.fail = true;
        let h = harness_with(CountingSentiment::default(), fetcher, PipelineOptions::default());

        let err = h.orchestrator.analyze(ID).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Fetch { .. }));
    }

    #[tokio::test]
    async fn invalid_identifier_never_reaches_collaborators() {
        let h = harness("words");
        let err = h
            .orchestrator
            .analyze("https://vimeo.com/12345")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidIdentifier(_)));
        assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn scorer_failure_aborts_without_storing() {
        let sentiment = CountingSentiment {
            fail: true,
            ..CountingSentiment::default()
        };
        let h = harness_with(
            sentiment,
            ScriptedFetcher::with_captions("one two three"),
            PipelineOptions::default(),
        );

        let err = h.orchestrator.analyze(ID).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Inference(InferenceError::Status { status: 503, .. })
        ));
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn slow_scorer_times_out_as_inference_error() {
        let sentiment = CountingSentiment {
            delay: Some(Duration::from_secs(5)),
            ..CountingSentiment::default()
        };
        let options = PipelineOptions {
            inference_timeout: Duration::from_millis(20),
            ..PipelineOptions::default()
        };
        let h = harness_with(sentiment, ScriptedFetcher::with_captions("one two"), options);

        let err = h.orchestrator.analyze(ID).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Inference(InferenceError::Timeout { timeout_ms: 20, .. })
        ));
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn chunk_scoring_is_bounded_by_inference_concurrency() {
        let delay = Some(Duration::from_millis(5));
        let sentiment = CountingSentiment {
            delay,
            ..CountingSentiment::default()
        };
        let bias = CountingBias {
            delay,
            ..CountingBias::default()
        };
        let options = PipelineOptions {
            inference_concurrency: 3,
            ..PipelineOptions::default()
        };
        // 400 words at budget 4 -> 100 chunks.
        let words = (0..400).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let h = harness_full(sentiment, bias, ScriptedFetcher::with_captions(&words), options);

        h.orchestrator.analyze(ID).await.unwrap();

        assert_eq!(h.sentiment.calls.load(Ordering::SeqCst), 100);
        assert_eq!(h.bias.calls.load(Ordering::SeqCst), 100);
        for peak in [h.sentiment.in_flight.peak(), h.bias.in_flight.peak()] {
            assert!(peak <= 3, "{peak} scorer calls in flight");
            assert!(peak > 1, "chunks were scored one at a time");
        }
    }

    #[test]
    fn scorer_timeout_from_config_spans_every_retry() {
        let config = AppConfig {
            database_url: "postgres://example".to_string(),
            log_level: "info".to_string(),
            db_max_connections: 1,
            db_min_connections: 1,
            db_acquire_timeout_secs: 1,
            inference_base_url: "http://localhost:9000".to_string(),
            inference_api_token: None,
            sentiment_model: "sentiment".to_string(),
            ideology_model: "ideology".to_string(),
            bias_model: "bias".to_string(),
            commentary_model: "commentary".to_string(),
            inference_timeout_secs: 30,
            inference_max_retries: 2,
            inference_retry_backoff_ms: 1_000,
            inference_concurrency: 6,
            chunk_max_tokens: 512,
            tokenizer_path: None,
            bias_mode: BiasMode::Whole,
            transcript_service_url: "http://localhost:8085".to_string(),
        };
        let options = PipelineOptions::from_app_config(&config);
        assert_eq!(options.bias_mode, BiasMode::Whole);
        assert_eq!(options.inference_concurrency, 6);
        assert!(options.inference_timeout > Duration::from_secs(90));
        assert_eq!(options.inference_timeout, Duration::from_millis(93_750));
    }

    #[tokio::test]
    async fn whole_mode_scores_bias_once() {
        let options = PipelineOptions {
            bias_mode: BiasMode::Whole,
            ..PipelineOptions::default()
        };
        let h = harness_with(
            CountingSentiment::default(),
            ScriptedFetcher::with_captions("one two three four five six seven"),
            options,
        );

        h.orchestrator.analyze(ID).await.unwrap();
        assert_eq!(h.sentiment.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.bias.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            h.bias.texts.lock().unwrap().as_slice(),
            ["one two three four five six seven"]
        );
    }

    #[tokio::test]
    async fn stored_is_read_only() {
        let h = harness("words here");
        assert!(h.orchestrator.stored(ID).await.unwrap().is_none());
        assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);

        let created = h.orchestrator.analyze(ID).await.unwrap();
        let stored = h.orchestrator.stored(ID).await.unwrap();
        assert_eq!(stored, Some(created.record));
    }
}
