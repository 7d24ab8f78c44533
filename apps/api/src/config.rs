use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server-side provider key. Optional: callers may bring their own.
    pub deepseek_api_key: Option<String>,
    pub deepseek_base_url: String,
    pub llm_timeout: Duration,
    /// Browser executable; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
    pub pdf_timeout: Duration,
    pub allow_client_api_key: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            deepseek_api_key: optional_env("DEEPSEEK_API_KEY"),
            deepseek_base_url: optional_env("DEEPSEEK_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120)?),
            chrome_path: optional_env("CHROME_PATH").map(PathBuf::from),
            pdf_timeout: Duration::from_secs(parse_env("PDF_TIMEOUT_SECS", 60)?),
            allow_client_api_key: parse_env("ALLOW_CLIENT_API_KEY", true)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Picks the key for one request: a caller-supplied key when allowed and
    /// non-blank, otherwise the server key.
    pub fn resolve_credential(&self, supplied: Option<&str>) -> Option<String> {
        let supplied = supplied
            .map(str::trim)
            .filter(|key| self.allow_client_api_key && !key.is_empty());
        supplied
            .or(self.deepseek_api_key.as_deref())
            .map(str::to_string)
    }
}

/// Unset and blank both read as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        deepseek_api_key: Some("sk-server".to_string()),
        deepseek_base_url: DEFAULT_BASE_URL.to_string(),
        llm_timeout: Duration::from_secs(120),
        chrome_path: None,
        pdf_timeout: Duration::from_secs(60),
        allow_client_api_key: true,
        port: 8080,
        rust_log: "info".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_key_wins_when_allowed() {
        let config = test_config();
        assert_eq!(
            config.resolve_credential(Some(" sk-caller ")),
            Some("sk-caller".to_string())
        );
    }

    #[test]
    fn test_blank_caller_key_falls_back_to_server() {
        let config = test_config();
        assert_eq!(
            config.resolve_credential(Some("   ")),
            Some("sk-server".to_string())
        );
        assert_eq!(config.resolve_credential(None), Some("sk-server".to_string()));
    }

    #[test]
    fn test_caller_key_ignored_when_disallowed() {
        let config = Config {
            allow_client_api_key: false,
            ..test_config()
        };
        assert_eq!(
            config.resolve_credential(Some("sk-caller")),
            Some("sk-server".to_string())
        );
    }

    #[test]
    fn test_no_key_anywhere() {
        let config = Config {
            deepseek_api_key: None,
            ..test_config()
        };
        assert_eq!(config.resolve_credential(None), None);
    }
}
