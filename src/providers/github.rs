use crate::config::ScanConfig;
use crate::error::DepScanError;
use crate::models::RepositoryStats;
use crate::providers::{build_http_client, ProviderFuture, RepositoryProvider};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

const PROVIDER: &str = "GitHub";

lazy_static::lazy_static! {
    static ref OWNER_REPO: Regex = Regex::new(r"github\.com[/:]([^/]+)/([^/]+)").unwrap();
    static ref LAST_PAGE: Regex =
        Regex::new(r#"<[^>]*[?&]page=(\d+)[^>]*>;\s*rel="last""#).unwrap();
}

pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoDocument {
    #[serde(default)]
    stargazers_count: Option<u64>,
    #[serde(default)]
    open_issues_count: Option<u64>,
    #[serde(default)]
    pushed_at: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(default)]
    total_count: Option<u64>,
}

impl GithubClient {
    pub fn new(config: &ScanConfig) -> Result<Self, DepScanError> {
        Ok(Self {
            client: build_http_client(config)?,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    async fn fetch(&self, repository_url: Option<&str>) -> Result<Option<RepositoryStats>, DepScanError> {
        let Some((owner, repo)) = repository_url.and_then(parse_owner_repo) else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/repos/{}/{}", self.api_url, owner, repo))
            .headers(self.headers())
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DepScanError::UpstreamStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let document: RepoDocument = response.json().await?;
        let (Some(pushed_at), Some(html_url)) = (document.pushed_at, document.html_url) else {
            return Ok(None);
        };

        let contributor_count = self.fetch_contributor_count(&owner, &repo).await;
        let closed_issue_count = self.fetch_closed_issue_count(&owner, &repo).await;

        Ok(Some(RepositoryStats {
            contributor_count,
            open_issue_count: document.open_issues_count.unwrap_or(0),
            closed_issue_count,
            stars: document.stargazers_count.unwrap_or(0),
            last_commit_date: pushed_at,
            repo_url: html_url,
        }))
    }

    /// With `per_page=1` the `Link` header's last page number is the
    /// contributor count.
    async fn fetch_contributor_count(&self, owner: &str, repo: &str) -> u64 {
        self.try_fetch_contributor_count(owner, repo)
            .await
            .unwrap_or_else(|e| {
                tracing::debug!(owner, repo, error = %e, "contributor count unavailable");
                0
            })
    }

    async fn try_fetch_contributor_count(&self, owner: &str, repo: &str) -> Result<u64, DepScanError> {
        let response = self
            .client
            .get(format!("{}/repos/{}/{}/contributors", self.api_url, owner, repo))
            .query(&[("per_page", "1"), ("anon", "true")])
            .headers(self.headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(0);
        }

        if let Some(link) = response.headers().get(LINK).and_then(|v| v.to_str().ok()) {
            return Ok(parse_last_page(link).unwrap_or(1));
        }

        let body: Vec<Value> = response.json().await?;
        Ok(body.len() as u64)
    }

    async fn fetch_closed_issue_count(&self, owner: &str, repo: &str) -> u64 {
        self.try_fetch_closed_issue_count(owner, repo)
            .await
            .unwrap_or_else(|e| {
                tracing::debug!(owner, repo, error = %e, "closed issue count unavailable");
                0
            })
    }

    async fn try_fetch_closed_issue_count(&self, owner: &str, repo: &str) -> Result<u64, DepScanError> {
        let query = format!("repo:{}/{} type:issue state:closed", owner, repo);
        let response = self
            .client
            .get(format!("{}/search/issues", self.api_url))
            .query(&[("q", query.as_str()), ("per_page", "1")])
            .headers(self.headers())
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(0);
        }

        let document: SearchDocument = response.json().await?;
        Ok(document.total_count.unwrap_or(0))
    }
}

impl RepositoryProvider for GithubClient {
    fn fetch_statistics<'a>(
        &'a self,
        _name: &'a str,
        repository_url: Option<&'a str>,
    ) -> ProviderFuture<'a, RepositoryStats> {
        Box::pin(self.fetch(repository_url))
    }

    /// Repository, contributors, closed-issue search.
    fn requests_per_lookup(&self) -> u32 {
        3
    }
}

pub fn parse_owner_repo(repository_url: &str) -> Option<(String, String)> {
    let trimmed = repository_url.trim_end_matches('/');
    let cleaned = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let captures = OWNER_REPO.captures(cleaned)?;
    Some((captures[1].to_string(), captures[2].to_string()))
}

fn parse_last_page(link_header: &str) -> Option<u64> {
    LAST_PAGE
        .captures(link_header)
        .and_then(|c| c[1].parse().ok())
}
