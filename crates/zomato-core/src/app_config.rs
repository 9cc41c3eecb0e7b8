use std::path::PathBuf;

/// Runtime settings shared by the scraper library and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Origin of the food-delivery site, without a trailing slash.
    pub base_url: String,
    /// IP geolocation lookup used when no coordinates are supplied.
    pub geolocation_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Root directory for JSON written by the CLI.
    pub output_dir: PathBuf,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
