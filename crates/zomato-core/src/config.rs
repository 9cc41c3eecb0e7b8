use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.zomato.com";
pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("\"{raw}\" must start with http:// or https://"),
            });
        }
        Ok(trimmed.to_string())
    };

    let log_level = or_default("ZOMATO_LOG_LEVEL", "info");
    let base_url = parse_url("ZOMATO_BASE_URL", DEFAULT_BASE_URL)?;
    let geolocation_url = parse_url("ZOMATO_GEOLOCATION_URL", DEFAULT_GEOLOCATION_URL)?;

    let request_timeout_secs = parse_u64("ZOMATO_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ZOMATO_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }
    let user_agent = or_default("ZOMATO_USER_AGENT", DEFAULT_USER_AGENT);
    let output_dir = PathBuf::from(or_default("ZOMATO_OUTPUT_DIR", "."));
    let inter_request_delay_ms = parse_u64("ZOMATO_INTER_REQUEST_DELAY_MS", "1000")?;
    let max_retries = parse_u32("ZOMATO_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("ZOMATO_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        log_level,
        base_url,
        geolocation_url,
        request_timeout_secs,
        user_agent,
        output_dir,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
