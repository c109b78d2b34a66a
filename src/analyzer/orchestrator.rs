use crate::analyzer::advisor::{PlaceholderAdvisor, RemediationAdvisor};
use crate::analyzer::aggregator::ResultAggregator;
use crate::config::ScanConfig;
use crate::error::DepScanError;
use crate::models::{
    AnalysisResult, DependencyMetadata, DependencyResult, ParsedDependency, SignalScore,
};
use crate::parser::parse_manifest;
use crate::providers::{
    GithubClient, NpmRegistryClient, OsvClient, ProviderFuture, RegistryProvider,
    RepositoryProvider, VulnerabilityProvider,
};
use crate::scoring::{
    calculate_risk_score, get_risk_level, score_bus_factor, score_download_trend, score_license,
    score_open_issues, score_staleness, score_version_pinning, score_vulnerabilities,
};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{timeout, Duration};

pub struct DependencyAnalyzer {
    registry: Arc<dyn RegistryProvider>,
    repositories: Arc<dyn RepositoryProvider>,
    vulnerabilities: Arc<dyn VulnerabilityProvider>,
    advisor: Arc<dyn RemediationAdvisor>,
    aggregator: ResultAggregator,
    max_concurrent_requests: usize,
    request_timeout: Duration,
}

impl DependencyAnalyzer {
    /// Analyzer backed by the live npm, GitHub and OSV clients.
    pub fn new(config: &ScanConfig) -> Result<Self, DepScanError> {
        config.validate()?;

        Ok(Self::with_providers(
            Arc::new(NpmRegistryClient::new(config)?),
            Arc::new(GithubClient::new(config)?),
            Arc::new(OsvClient::new(config)?),
        )
        .with_advisor(Arc::new(PlaceholderAdvisor::from_config(config)))
        .with_concurrency(config.max_concurrent)
        .with_timeout(config.request_timeout))
    }

    pub fn with_providers(
        registry: Arc<dyn RegistryProvider>,
        repositories: Arc<dyn RepositoryProvider>,
        vulnerabilities: Arc<dyn VulnerabilityProvider>,
    ) -> Self {
        Self {
            registry,
            repositories,
            vulnerabilities,
            advisor: Arc::new(PlaceholderAdvisor::new()),
            aggregator: ResultAggregator::new(),
            max_concurrent_requests: crate::config::DEFAULT_MAX_CONCURRENT,
            request_timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn RemediationAdvisor>) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent_requests = max_concurrent.max(1);
        self
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Parses the manifest and scores every dependency, at most
    /// `max_concurrent_requests` at a time. Only parse failures abort; an
    /// upstream failure degrades the affected dependency.
    pub async fn analyze_manifest(&self, content: &str) -> Result<AnalysisResult, DepScanError> {
        let manifest = parse_manifest(content)?;

        tracing::info!(
            dependencies = manifest.dependencies.len(),
            total = manifest.total_count,
            concurrency = self.max_concurrent_requests,
            "starting dependency analysis"
        );

        let semaphore = Semaphore::new(self.max_concurrent_requests);
        let tasks: Vec<_> = manifest
            .dependencies
            .iter()
            .map(|dep| {
                let semaphore = &semaphore;
                async move {
                    // The semaphore is never closed, so acquire cannot fail.
                    let _permit = semaphore.acquire().await.ok();
                    self.analyze_dependency(dep).await
                }
            })
            .collect();

        let results: Vec<DependencyResult> = join_all(tasks).await;

        let summary = self.aggregator.summarize(results);
        let ai_recommendation = self.advisor.summarize(&summary.dependencies).await;

        let analysis = self.aggregator.into_analysis_result(
            summary,
            manifest.total_count,
            manifest.was_truncated,
            ai_recommendation,
        );

        tracing::info!(
            overall_score = analysis.overall_score,
            grade = analysis.grade.as_str(),
            partial = analysis.partial_data_count(),
            "dependency analysis complete"
        );

        Ok(analysis)
    }

    pub async fn analyze_dependency(&self, dep: &ParsedDependency) -> DependencyResult {
        // The repository lookup needs the registry's repository URL, so it is
        // chained after the registry call while the vulnerability query runs.
        let registry_then_repo = async {
            let npm_data = self
                .fetch_or_none(
                    "registry",
                    &dep.name,
                    self.registry.requests_per_lookup(),
                    self.registry.fetch_metadata(&dep.name),
                )
                .await;
            let repository_url = npm_data.as_ref().and_then(|d| d.repository_url.as_deref());
            let github_data = self
                .fetch_or_none(
                    "repository",
                    &dep.name,
                    self.repositories.requests_per_lookup(),
                    self.repositories.fetch_statistics(&dep.name, repository_url),
                )
                .await;
            (npm_data, github_data)
        };
        let vulns = self.fetch_or_none(
            "vulnerabilities",
            &dep.name,
            self.vulnerabilities.requests_per_lookup(),
            self.vulnerabilities.fetch_vulnerabilities(&dep.name, &dep.version),
        );

        let ((npm_data, github_data), osv_data) = tokio::join!(registry_then_repo, vulns);

        let metadata = DependencyMetadata {
            npm_data,
            github_data,
            osv_data,
        };
        let signals = score_signals(dep, &metadata);
        let risk_score = calculate_risk_score(&signals);
        let risk_level = get_risk_level(risk_score);
        let has_partial_data = metadata.is_partial();

        tracing::debug!(
            package = %dep.name,
            risk_score,
            risk_level = risk_level.as_str(),
            partial = has_partial_data,
            "scored dependency"
        );

        DependencyResult {
            name: dep.name.clone(),
            version: dep.version.clone(),
            dep_type: dep.dep_type,
            risk_score,
            risk_level,
            signals,
            metadata,
            has_partial_data,
        }
    }

    /// Boundary adapter: timeouts, upstream errors and "not found" all
    /// collapse into `None`. The bound covers every request of the lookup.
    async fn fetch_or_none<T>(
        &self,
        provider: &'static str,
        package: &str,
        requests: u32,
        request: ProviderFuture<'_, T>,
    ) -> Option<T> {
        let budget = self.lookup_budget(requests);
        match timeout(budget, request).await {
            Ok(Ok(data)) => {
                if data.is_none() {
                    tracing::debug!(provider, package, "no upstream data");
                }
                data
            }
            Ok(Err(e)) => {
                tracing::warn!(provider, package, error = %e, "upstream lookup failed");
                None
            }
            Err(_) => {
                let e = DepScanError::UpstreamTimeout {
                    provider,
                    timeout: budget.as_secs(),
                };
                tracing::warn!(provider, package, error = %e, "upstream lookup failed");
                None
            }
        }
    }

    fn lookup_budget(&self, requests: u32) -> Duration {
        self.request_timeout * requests.max(1)
    }

    pub fn get_config_info(&self) -> String {
        format!(
            "Timeout: {}s, Max Concurrent: {}",
            self.request_timeout.as_secs(),
            self.max_concurrent_requests
        )
    }
}

/// Runs all seven scorers over whatever upstream data is present.
pub fn score_signals(dep: &ParsedDependency, metadata: &DependencyMetadata) -> Vec<SignalScore> {
    let npm = metadata.npm_data.as_ref();
    let github = metadata.github_data.as_ref();
    let osv = metadata.osv_data.as_ref();

    vec![
        score_staleness(npm.map(|d| d.last_publish_date.as_str())),
        score_vulnerabilities(osv.map(|d| d.vulnerabilities.as_slice())),
        score_bus_factor(github.map(|d| d.contributor_count)),
        score_open_issues(
            github.map(|d| d.open_issue_count),
            github.map(|d| d.closed_issue_count),
        ),
        score_download_trend(npm.map(|d| d.weekly_downloads)),
        score_license(npm.map(|d| d.license.as_deref())),
        score_version_pinning(&dep.version),
    ]
}
