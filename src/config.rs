use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Snowfriend";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// OpenRouter-compatible chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Model used for every completion call.
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;
pub const DEFAULT_MAX_RETRIES: usize = 2;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1_000;
pub const DEFAULT_MAX_TOKENS: u32 = 600;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "snowfriend_lib=info,snowfriend=info"
}

/// Settings for the external completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Extra attempts after the first transport failure.
    pub max_retries: usize,
    /// Fixed pause between transport retries.
    pub retry_backoff: Duration,
    pub max_tokens: u32,
    /// Sent as HTTP-Referer for OpenRouter attribution.
    pub referer: String,
    /// Sent as X-Title for OpenRouter attribution.
    pub title: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            max_tokens: DEFAULT_MAX_TOKENS,
            referer: "http://localhost".to_string(),
            title: APP_NAME.to_string(),
        }
    }
}

impl CompletionConfig {
    /// Defaults overridden by environment variables:
    /// OPENROUTER_KEY, SNOWFRIEND_API_URL, SNOWFRIEND_MODEL, SNOWFRIEND_TIMEOUT_SECS.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable lookup (tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.api_key = lookup("OPENROUTER_KEY").filter(|k| !k.trim().is_empty());
        if let Some(url) = lookup("SNOWFRIEND_API_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(model) = lookup("SNOWFRIEND_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model = model;
        }
        if let Some(secs) = lookup("SNOWFRIEND_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok()) {
            if secs > 0 {
                config.timeout = Duration::from_secs(secs);
            }
        }
        config
    }
}
