use anyhow::{bail, Context, Result};
use reqwest::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables once at startup.
/// Nothing mutates it afterwards; it is cloned into `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the analysis service, without a trailing slash.
    pub api_url: String,
    pub port: u16,
    pub rust_log: String,
    pub session_idle_secs: u64,
    /// Restricts CORS to one origin when set; permissive otherwise.
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Config {
            api_url: normalize_api_url(&api_url)?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_idle_secs: std::env::var("SESSION_IDLE_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse::<u64>()
                .context("SESSION_IDLE_SECS must be a whole number of seconds")?,
            allowed_origin: std::env::var("ALLOWED_ORIGIN")
                .ok()
                .filter(|o| !o.trim().is_empty()),
        })
    }

    #[cfg(test)]
    pub fn for_api_url(api_url: impl Into<String>) -> Self {
        Config {
            api_url: normalize_api_url(&api_url.into()).expect("test API URL must be valid"),
            port: 3000,
            rust_log: "info".to_string(),
            session_idle_secs: 3600,
            allowed_origin: None,
        }
    }
}

/// Requires an absolute http(s) URL with a host and no query or fragment.
/// Trailing slashes are stripped so endpoint paths can be appended.
fn normalize_api_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim())
        .with_context(|| format!("API_URL is not a valid URL: '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("API_URL must use http or https, got '{raw}'");
    }
    if url.host_str().map_or(true, str::is_empty) {
        bail!("API_URL must name a host, got '{raw}'");
    }
    if url.query().is_some() || url.fragment().is_some() {
        bail!("API_URL must not carry a query or fragment, got '{raw}'");
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
