//! Shared configuration and domain value types for vidbias.

pub mod analysis;
pub mod app_config;
pub mod config;

use thiserror::Error;

pub use analysis::{BiasMode, BiasVector, SentimentLabel, SentimentResult, DISTRIBUTION_EPSILON};
pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
