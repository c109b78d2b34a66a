use crate::config::ScanConfig;
use crate::error::DepScanError;
use crate::models::RegistryData;
use crate::providers::{build_http_client, ProviderFuture, RegistryProvider};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const PROVIDER: &str = "npm registry";

pub struct NpmRegistryClient {
    client: reqwest::Client,
    registry_url: String,
    downloads_url: String,
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(default)]
    time: Option<HashMap<String, Value>>,
    #[serde(default)]
    license: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default, rename = "dist-tags")]
    dist_tags: Option<DistTags>,
    #[serde(default)]
    repository: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct DistTags {
    #[serde(default)]
    latest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DownloadsDocument {
    #[serde(default)]
    downloads: Option<u64>,
}

impl NpmRegistryClient {
    pub fn new(config: &ScanConfig) -> Result<Self, DepScanError> {
        Ok(Self {
            client: build_http_client(config)?,
            registry_url: config.npm_registry_url.clone(),
            downloads_url: config.npm_downloads_url.clone(),
        })
    }

    async fn fetch(&self, name: &str) -> Result<Option<RegistryData>, DepScanError> {
        let url = package_url(&self.registry_url, &[name])?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DepScanError::UpstreamStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let document: RegistryDocument = response.json().await?;

        let Some(latest_version) = document.dist_tags.and_then(|tags| tags.latest) else {
            return Ok(None);
        };
        let Some(last_publish_date) = document
            .time
            .as_ref()
            .and_then(|time| time.get(&latest_version))
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            return Ok(None);
        };

        let weekly_downloads = self.fetch_weekly_downloads(name).await;

        Ok(Some(RegistryData {
            last_publish_date,
            weekly_downloads,
            license: document.license.as_ref().and_then(license_name),
            latest_version,
            description: document
                .description
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            repository_url: document.repository.as_ref().and_then(repository_url),
        }))
    }

    /// Download counts are secondary; any failure here counts as zero.
    async fn fetch_weekly_downloads(&self, name: &str) -> u64 {
        self.try_fetch_weekly_downloads(name).await.unwrap_or_else(|e| {
            tracing::debug!(package = name, error = %e, "weekly downloads unavailable");
            0
        })
    }

    async fn try_fetch_weekly_downloads(&self, name: &str) -> Result<u64, DepScanError> {
        let url = package_url(&self.downloads_url, &["downloads", "point", "last-week", name])?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Ok(0);
        }
        let document: DownloadsDocument = response.json().await?;
        Ok(document.downloads.unwrap_or(0))
    }
}

impl RegistryProvider for NpmRegistryClient {
    fn fetch_metadata<'a>(&'a self, name: &'a str) -> ProviderFuture<'a, RegistryData> {
        Box::pin(self.fetch(name))
    }

    /// Package document, then the downloads point query.
    fn requests_per_lookup(&self) -> u32 {
        2
    }
}

/// Appends each segment, percent-encoding `/` so scoped names stay one segment.
fn package_url(base: &str, segments: &[&str]) -> Result<Url, DepScanError> {
    let mut url = Url::parse(base)
        .map_err(|e| DepScanError::ConfigError(format!("Invalid URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| DepScanError::ConfigError(format!("URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Accepts an SPDX string or the legacy `{ "type": "MIT" }` object form.
fn license_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("type").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn repository_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("url").and_then(Value::as_str).map(|url| {
            let url = url.strip_prefix("git+").unwrap_or(url);
            url.strip_suffix(".git").unwrap_or(url).to_string()
        }),
        _ => None,
    }
}
