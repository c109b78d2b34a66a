use serde::{Deserialize, Serialize};

/// Registry view of a package, as returned by the npm adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryData {
    pub last_publish_date: String,
    pub weekly_downloads: u64,
    pub license: Option<String>,
    pub latest_version: String,
    pub description: String,
    /// Only used to address the repository lookup; never part of the result.
    #[serde(default, skip_serializing)]
    pub repository_url: Option<String>,
}

/// Source-host statistics for the package's repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    pub contributor_count: u64,
    pub open_issue_count: u64,
    pub closed_issue_count: u64,
    pub stars: u64,
    pub last_commit_date: String,
    pub repo_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub summary: String,
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VulnerabilityReport {
    pub vulnerabilities: Vec<Vulnerability>,
}

/// Raw upstream data kept on a dependency result. Each source is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm_data: Option<RegistryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_data: Option<RepositoryStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osv_data: Option<VulnerabilityReport>,
}

impl Vulnerability {
    pub fn new<I: Into<String>, S: Into<String>, V: Into<String>>(id: I, summary: S, severity: V) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            severity: severity.into(),
        }
    }
}

impl VulnerabilityReport {
    pub fn new(vulnerabilities: Vec<Vulnerability>) -> Self {
        Self { vulnerabilities }
    }

    pub fn is_clean(&self) -> bool {
        self.vulnerabilities.is_empty()
    }
}

impl DependencyMetadata {
    /// True when any of the three sources produced nothing.
    pub fn is_partial(&self) -> bool {
        self.npm_data.is_none() || self.github_data.is_none() || self.osv_data.is_none()
    }
}
