use crate::analysis::BiasMode;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub inference_base_url: String,
    pub inference_api_token: Option<String>,
    pub sentiment_model: String,
    pub ideology_model: String,
    pub bias_model: String,
    pub commentary_model: String,
    pub inference_timeout_secs: u64,
    pub inference_max_retries: u32,
    pub inference_retry_backoff_ms: u64,
    /// Scorer calls in flight at once per scorer, per video.
    pub inference_concurrency: usize,
    pub chunk_max_tokens: usize,
    /// `tokenizer.json` of the sentiment model. Without it chunks are sized in words.
    pub tokenizer_path: Option<String>,
    pub bias_mode: BiasMode,
    pub transcript_service_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("inference_base_url", &self.inference_base_url)
            .field(
                "inference_api_token",
                &self.inference_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("sentiment_model", &self.sentiment_model)
            .field("ideology_model", &self.ideology_model)
            .field("bias_model", &self.bias_model)
            .field("commentary_model", &self.commentary_model)
            .field("inference_timeout_secs", &self.inference_timeout_secs)
            .field("inference_max_retries", &self.inference_max_retries)
            .field(
                "inference_retry_backoff_ms",
                &self.inference_retry_backoff_ms,
            )
            .field("inference_concurrency", &self.inference_concurrency)
            .field("chunk_max_tokens", &self.chunk_max_tokens)
            .field("tokenizer_path", &self.tokenizer_path)
            .field("bias_mode", &self.bias_mode)
            .field("transcript_service_url", &self.transcript_service_url)
            .finish()
    }
}
