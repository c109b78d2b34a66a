use crate::config::ScanConfig;
use crate::error::DepScanError;
use crate::models::{Vulnerability, VulnerabilityReport};
use crate::providers::{build_http_client, ProviderFuture, VulnerabilityProvider};
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "OSV";

pub struct OsvClient {
    client: reqwest::Client,
    api_url: String,
}

#[derive(Debug, Serialize)]
struct OsvQuery<'a> {
    package: OsvPackage<'a>,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct OsvPackage<'a> {
    name: &'a str,
    ecosystem: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct OsvResponse {
    #[serde(default)]
    vulns: Vec<OsvVulnerability>,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerability {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    database_specific: Option<DatabaseSpecific>,
    #[serde(default)]
    severity: Vec<OsvSeverity>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSpecific {
    #[serde(default)]
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsvSeverity {
    #[serde(default)]
    score: Option<String>,
}

impl OsvClient {
    pub fn new(config: &ScanConfig) -> Result<Self, DepScanError> {
        Ok(Self {
            client: build_http_client(config)?,
            api_url: config.osv_api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn query(&self, name: &str, version: &str) -> Result<Option<VulnerabilityReport>, DepScanError> {
        let body = OsvQuery {
            package: OsvPackage {
                name,
                ecosystem: "npm",
            },
            version: strip_version_prefix(version),
        };

        let response = self
            .client
            .post(format!("{}/v1/query", self.api_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DepScanError::UpstreamStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let document: OsvResponse = response.json().await?;
        let vulnerabilities = document
            .vulns
            .into_iter()
            .map(|vuln| {
                let severity = extract_severity(&vuln);
                Vulnerability::new(
                    vuln.id.unwrap_or_else(|| "UNKNOWN".to_string()),
                    vuln.summary
                        .unwrap_or_else(|| "No summary available".to_string()),
                    severity,
                )
            })
            .collect();

        Ok(Some(VulnerabilityReport::new(vulnerabilities)))
    }
}

impl VulnerabilityProvider for OsvClient {
    fn fetch_vulnerabilities<'a>(
        &'a self,
        name: &'a str,
        version: &'a str,
    ) -> ProviderFuture<'a, VulnerabilityReport> {
        Box::pin(self.query(name, version))
    }
}

/// Drops leading range operators so `^4.17.1` is queried as `4.17.1`.
pub fn strip_version_prefix(version: &str) -> &str {
    version.trim_start_matches(['~', '^', '>', '='])
}

fn extract_severity(vuln: &OsvVulnerability) -> String {
    vuln.database_specific
        .as_ref()
        .and_then(|d| d.severity.clone())
        .or_else(|| vuln.severity.first().map(|s| s.score.clone().unwrap_or_else(|| "UNKNOWN".to_string())))
        .unwrap_or_else(|| "UNKNOWN".to_string())
}
