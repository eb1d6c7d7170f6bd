use crate::analysis::BiasMode;
use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_IDEOLOGY_MODEL: &str = "bucketresearch/politicalBiasBERT";
pub const DEFAULT_BIAS_MODEL: &str = "d4data/bias-detection-model";
pub const DEFAULT_COMMENTARY_MODEL: &str = "google/flan-t5-small";

/// Token budget of a distilled-BERT class model.
pub const DEFAULT_CHUNK_MAX_TOKENS: usize = 512;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let log_level = or_default("VIDBIAS_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("VIDBIAS_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("VIDBIAS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("VIDBIAS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let inference_base_url = or_default("VIDBIAS_INFERENCE_BASE_URL", DEFAULT_INFERENCE_BASE_URL);
    let inference_api_token = lookup("HF_API_TOKEN").ok().filter(|t| !t.trim().is_empty());
    let sentiment_model = or_default("VIDBIAS_SENTIMENT_MODEL", DEFAULT_SENTIMENT_MODEL);
    let ideology_model = or_default("VIDBIAS_IDEOLOGY_MODEL", DEFAULT_IDEOLOGY_MODEL);
    let bias_model = or_default("VIDBIAS_BIAS_MODEL", DEFAULT_BIAS_MODEL);
    let commentary_model = or_default("VIDBIAS_COMMENTARY_MODEL", DEFAULT_COMMENTARY_MODEL);

    let inference_timeout_secs = parse_u64("VIDBIAS_INFERENCE_TIMEOUT_SECS", "30")?;
    if inference_timeout_secs == 0 {
        return Err(invalid(
            "VIDBIAS_INFERENCE_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let inference_max_retries = parse_u32("VIDBIAS_INFERENCE_MAX_RETRIES", "2")?;
    let inference_retry_backoff_ms = parse_u64("VIDBIAS_INFERENCE_RETRY_BACKOFF_MS", "1000")?;
    let inference_concurrency = parse_usize("VIDBIAS_INFERENCE_CONCURRENCY", "4")?;
    if inference_concurrency == 0 {
        return Err(invalid(
            "VIDBIAS_INFERENCE_CONCURRENCY",
            "must be greater than zero".to_string(),
        ));
    }

    let chunk_max_tokens = parse_usize(
        "VIDBIAS_CHUNK_MAX_TOKENS",
        &DEFAULT_CHUNK_MAX_TOKENS.to_string(),
    )?;
    if chunk_max_tokens == 0 {
        return Err(invalid(
            "VIDBIAS_CHUNK_MAX_TOKENS",
            "must be greater than zero".to_string(),
        ));
    }

    let tokenizer_path = lookup("VIDBIAS_TOKENIZER_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty());

    let bias_mode = or_default("VIDBIAS_BIAS_MODE", "chunked")
        .parse::<BiasMode>()
        .map_err(|e| invalid("VIDBIAS_BIAS_MODE", e))?;

    let transcript_service_url = or_default("VIDBIAS_TRANSCRIPT_URL", "http://127.0.0.1:8085");

    Ok(AppConfig {
        database_url,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        inference_base_url,
        inference_api_token,
        sentiment_model,
        ideology_model,
        bias_model,
        commentary_model,
        inference_timeout_secs,
        inference_max_retries,
        inference_retry_backoff_ms,
        inference_concurrency,
        chunk_max_tokens,
        tokenizer_path,
        bias_mode,
        transcript_service_url,
    })
}
