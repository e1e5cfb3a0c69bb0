//! Shared configuration and domain vocabulary for brandpost.

pub mod app_config;
pub mod config;
pub mod posts;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ModelConfig};
pub use config::{load_app_config, load_app_config_from_env, load_model_config};
pub use posts::{Category, Platform, PostStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid platform: {0}")]
    InvalidPlatform(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),
}
