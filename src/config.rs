use crate::error::DepScanError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_CONCURRENT: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub max_concurrent: usize,
    pub request_timeout: Duration,
    pub npm_registry_url: String,
    pub npm_downloads_url: String,
    pub github_api_url: String,
    pub osv_api_url: String,
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    #[serde(skip_serializing)]
    pub anthropic_api_key: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            npm_registry_url: "https://registry.npmjs.org".to_string(),
            npm_downloads_url: "https://api.npmjs.org".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            osv_api_url: "https://api.osv.dev".to_string(),
            github_token: None,
            anthropic_api_key: None,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `DEPSCAN_*`, `GITHUB_TOKEN` and
    /// `ANTHROPIC_API_KEY` from the environment.
    pub fn from_env() -> Result<Self, DepScanError> {
        let mut config = Self::default();

        if let Some(value) = env_var("DEPSCAN_MAX_CONCURRENT") {
            config.max_concurrent = value.parse().map_err(|_| {
                DepScanError::ConfigError(format!(
                    "DEPSCAN_MAX_CONCURRENT must be a positive integer, got '{}'",
                    value
                ))
            })?;
        }

        if let Some(value) = env_var("DEPSCAN_TIMEOUT_SECS") {
            let secs: u64 = value.parse().map_err(|_| {
                DepScanError::ConfigError(format!(
                    "DEPSCAN_TIMEOUT_SECS must be a number of seconds, got '{}'",
                    value
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(url) = env_var("DEPSCAN_NPM_REGISTRY_URL") {
            config.npm_registry_url = url;
        }
        if let Some(url) = env_var("DEPSCAN_NPM_DOWNLOADS_URL") {
            config.npm_downloads_url = url;
        }
        if let Some(url) = env_var("DEPSCAN_GITHUB_API_URL") {
            config.github_api_url = url;
        }
        if let Some(url) = env_var("DEPSCAN_OSV_API_URL") {
            config.osv_api_url = url;
        }

        config.github_token = env_var("GITHUB_TOKEN");
        config.anthropic_api_key = env_var("ANTHROPIC_API_KEY");

        config.validate()?;
        Ok(config)
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout = Duration::from_secs(seconds);
        self
    }

    pub fn with_github_token(mut self, token: String) -> Self {
        self.github_token = Some(token);
        self
    }

    /// Points every upstream client at one base URL. Used against mock servers.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        self.npm_registry_url = base.clone();
        self.npm_downloads_url = base.clone();
        self.github_api_url = base.clone();
        self.osv_api_url = base;
        self
    }

    pub fn validate(&self) -> Result<(), DepScanError> {
        if !(1..=50).contains(&self.max_concurrent) {
            return Err(DepScanError::ConfigError(
                "Concurrency must be between 1 and 50".to_string(),
            ));
        }

        let secs = self.request_timeout.as_secs();
        if !(1..=120).contains(&secs) {
            return Err(DepScanError::ConfigError(
                "Request timeout must be between 1 and 120 seconds".to_string(),
            ));
        }

        for (name, url) in [
            ("npm registry", &self.npm_registry_url),
            ("npm downloads", &self.npm_downloads_url),
            ("GitHub API", &self.github_api_url),
            ("OSV API", &self.osv_api_url),
        ] {
            if url.trim().is_empty() {
                return Err(DepScanError::ConfigError(format!("{} URL cannot be empty", name)));
            }
        }

        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
