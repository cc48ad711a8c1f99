use std::env;

use anyhow::{Context, Result};
use feedgate_scrapers::instagram::DEFAULT_APP_ID;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub host: String,
    pub port: u16,

    // Scraping
    pub apify_token: Option<String>,
    pub instagram_app_id: String,
}

impl Config {
    /// Load configuration from the process environment.
    /// Fails if `PORT` is missing or not a number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT").context("PORT environment variable is required")?;
        let port = port
            .trim()
            .parse::<u16>()
            .with_context(|| format!("PORT must be a number, got {port:?}"))?;

        Ok(Self {
            host: non_empty(lookup("HOST")).unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            apify_token: non_empty(lookup("APIFY_TOKEN")),
            instagram_app_id: non_empty(lookup("INSTAGRAM_APP_ID"))
                .unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn port_is_required() {
        let err = load(&[("HOST", "127.0.0.1")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn port_must_be_numeric() {
        assert!(load(&[("PORT", "eighty")]).is_err());
    }

    #[test]
    fn host_defaults_to_wildcard() {
        let config = load(&[("PORT", "8000")]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.apify_token, None);
        assert_eq!(config.instagram_app_id, DEFAULT_APP_ID);
    }

    #[test]
    fn empty_host_falls_back_to_wildcard() {
        let config = load(&[("PORT", "8000"), ("HOST", "")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn explicit_values_are_used() {
        let config = load(&[
            ("PORT", "9000"),
            ("HOST", "127.0.0.1"),
            ("APIFY_TOKEN", "secret"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.apify_token.as_deref(), Some("secret"));
    }
}
