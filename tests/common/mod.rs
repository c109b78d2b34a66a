#![allow(dead_code)]

use chrono::{Duration as ChronoDuration, Utc};
use depscan::error::DepScanError;
use depscan::models::{RegistryData, RepositoryStats, Vulnerability, VulnerabilityReport};
use depscan::providers::{ProviderFuture, RegistryProvider, RepositoryProvider, VulnerabilityProvider};
use depscan::DependencyAnalyzer;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How a fake upstream answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Respond,
    Fail,
    Hang,
}

/// Records how many calls overlap at once.
#[derive(Debug, Default)]
pub struct ConcurrencyTracker {
    in_flight: AtomicUsize,
    max_seen: AtomicUsize,
    calls: AtomicUsize,
}

impl ConcurrencyTracker {
    fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_seen.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn max_seen(&self) -> usize {
        self.max_seen.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub struct FakeRegistry {
    pub packages: HashMap<String, RegistryData>,
    pub behavior: Behavior,
    pub delay: Duration,
    pub tracker: Arc<ConcurrencyTracker>,
}

impl FakeRegistry {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            packages: HashMap::new(),
            behavior,
            delay: Duration::ZERO,
            tracker: Arc::new(ConcurrencyTracker::default()),
        }
    }

    pub fn with_package(mut self, name: &str, data: RegistryData) -> Self {
        self.packages.insert(name.to_string(), data);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl RegistryProvider for FakeRegistry {
    fn fetch_metadata<'a>(&'a self, name: &'a str) -> ProviderFuture<'a, RegistryData> {
        Box::pin(async move {
            if self.behavior == Behavior::Hang {
                return std::future::pending().await;
            }

            self.tracker.enter();
            tokio::time::sleep(self.delay).await;
            self.tracker.exit();

            match self.behavior {
                Behavior::Fail => Err(DepScanError::UpstreamStatus {
                    provider: "npm registry",
                    status: 503,
                }),
                _ => Ok(self.packages.get(name).cloned()),
            }
        })
    }
}

pub struct FakeRepository {
    pub repositories: HashMap<String, RepositoryStats>,
    pub behavior: Behavior,
    pub delay: Duration,
    pub requests: u32,
}

impl FakeRepository {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            repositories: HashMap::new(),
            behavior,
            delay: Duration::ZERO,
            requests: 1,
        }
    }

    /// Answers after `delay`, reporting `requests` sequential calls per lookup.
    pub fn with_round_trips(mut self, requests: u32, delay: Duration) -> Self {
        self.requests = requests;
        self.delay = delay;
        self
    }

    /// Keyed by repository URL, the way the real client is addressed.
    pub fn with_repository(mut self, url: &str, stats: RepositoryStats) -> Self {
        self.repositories.insert(url.to_string(), stats);
        self
    }
}

impl RepositoryProvider for FakeRepository {
    fn fetch_statistics<'a>(
        &'a self,
        _name: &'a str,
        repository_url: Option<&'a str>,
    ) -> ProviderFuture<'a, RepositoryStats> {
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.behavior {
                Behavior::Hang => std::future::pending().await,
                Behavior::Fail => Err(DepScanError::UpstreamStatus {
                    provider: "GitHub",
                    status: 403,
                }),
                Behavior::Respond => {
                    Ok(repository_url.and_then(|url| self.repositories.get(url).cloned()))
                }
            }
        })
    }

    fn requests_per_lookup(&self) -> u32 {
        self.requests
    }
}

pub struct FakeVulnerabilities {
    pub reports: HashMap<String, Vec<Vulnerability>>,
    pub behavior: Behavior,
}

impl FakeVulnerabilities {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            reports: HashMap::new(),
            behavior,
        }
    }

    pub fn with_vulnerability(mut self, name: &str, vulnerability: Vulnerability) -> Self {
        self.reports
            .entry(name.to_string())
            .or_default()
            .push(vulnerability);
        self
    }
}

impl VulnerabilityProvider for FakeVulnerabilities {
    fn fetch_vulnerabilities<'a>(
        &'a self,
        name: &'a str,
        _version: &'a str,
    ) -> ProviderFuture<'a, VulnerabilityReport> {
        Box::pin(async move {
            match self.behavior {
                Behavior::Hang => std::future::pending().await,
                Behavior::Fail => Err(DepScanError::UpstreamStatus {
                    provider: "OSV",
                    status: 500,
                }),
                Behavior::Respond => Ok(Some(VulnerabilityReport::new(
                    self.reports.get(name).cloned().unwrap_or_default(),
                ))),
            }
        })
    }
}

pub fn analyzer(
    registry: FakeRegistry,
    repository: FakeRepository,
    vulnerabilities: FakeVulnerabilities,
) -> DependencyAnalyzer {
    DependencyAnalyzer::with_providers(
        Arc::new(registry),
        Arc::new(repository),
        Arc::new(vulnerabilities),
    )
}

pub fn days_ago(days: i64) -> String {
    (Utc::now() - ChronoDuration::days(days)).to_rfc3339()
}

pub fn registry_data(
    last_publish_date: &str,
    weekly_downloads: u64,
    license: Option<&str>,
    repository_url: Option<&str>,
) -> RegistryData {
    RegistryData {
        last_publish_date: last_publish_date.to_string(),
        weekly_downloads,
        license: license.map(str::to_string),
        latest_version: "1.0.0".to_string(),
        description: String::new(),
        repository_url: repository_url.map(str::to_string),
    }
}

pub fn repo_stats(contributors: u64, open: u64, closed: u64) -> RepositoryStats {
    RepositoryStats {
        contributor_count: contributors,
        open_issue_count: open,
        closed_issue_count: closed,
        stars: 1_000,
        last_commit_date: days_ago(3),
        repo_url: "https://github.com/example/example".to_string(),
    }
}

/// A `package.json` with the given runtime dependencies, all pinned exactly.
pub fn manifest_with(names: &[&str]) -> String {
    let deps: serde_json::Map<String, serde_json::Value> = names
        .iter()
        .map(|name| (name.to_string(), serde_json::Value::from("1.0.0")))
        .collect();
    serde_json::json!({ "name": "fixture", "dependencies": deps }).to_string()
}
