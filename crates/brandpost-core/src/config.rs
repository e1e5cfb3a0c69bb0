use crate::app_config::{AppConfig, Environment, ModelConfig};
use crate::ConfigError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_MODEL_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Load server configuration from environment variables.
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

/// Load server configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load generative model settings (`GEMINI_*`) from the environment.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] if `GEMINI_API_KEY` is unset.
pub fn load_model_config() -> Result<ModelConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_model_config(|key| std::env::var(key))
}

/// Core parsing/validation logic, decoupled from the process environment so it
/// can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("BRANDPOST_ENV", "development"));

    let bind_addr = parse("BRANDPOST_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("BRANDPOST_LOG_LEVEL", "info");
    let media_root = PathBuf::from(or_default("BRANDPOST_MEDIA_ROOT", "./media"));
    let media_url = normalize_media_url(&or_default("BRANDPOST_MEDIA_URL", "/media"));
    let max_upload_bytes = parse_usize("BRANDPOST_MAX_UPLOAD_BYTES", "10485760")?;

    let db_max_connections = parse_u32("BRANDPOST_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("BRANDPOST_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("BRANDPOST_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        media_root,
        media_url,
        max_upload_bytes,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

fn build_model_config<F>(lookup: F) -> Result<ModelConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let api_key = lookup("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;
    let model = lookup("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let base_url =
        lookup("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_MODEL_BASE_URL.to_string());

    Ok(ModelConfig {
        api_key,
        model,
        base_url,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Ensure the media URL prefix starts with `/` and has no trailing slash.
fn normalize_media_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
