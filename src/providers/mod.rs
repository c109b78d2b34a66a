//! External data adapters for the registry, source host and vulnerability
//! database.
//!
//! Each provider answers `Ok(Some(..))` with data, `Ok(None)` when the
//! upstream simply has nothing for the package, and `Err(..)` on failure.
//! The orchestrator flattens both of the latter into "no data".

pub mod github;
pub mod npm;
pub mod osv;

pub use github::GithubClient;
pub use npm::NpmRegistryClient;
pub use osv::OsvClient;

use crate::config::ScanConfig;
use crate::error::DepScanError;
use crate::models::{RegistryData, RepositoryStats, VulnerabilityReport};
use std::future::Future;
use std::pin::Pin;

pub type ProviderFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<Option<T>, DepScanError>> + Send + 'a>>;

pub trait RegistryProvider: Send + Sync {
    fn fetch_metadata<'a>(&'a self, name: &'a str) -> ProviderFuture<'a, RegistryData>;

    /// Sequential HTTP requests one lookup may issue. Each gets the full
    /// per-request timeout, so the orchestrator scales its bound by this.
    fn requests_per_lookup(&self) -> u32 {
        1
    }
}

pub trait RepositoryProvider: Send + Sync {
    fn fetch_statistics<'a>(
        &'a self,
        name: &'a str,
        repository_url: Option<&'a str>,
    ) -> ProviderFuture<'a, RepositoryStats>;

    fn requests_per_lookup(&self) -> u32 {
        1
    }
}

pub trait VulnerabilityProvider: Send + Sync {
    fn fetch_vulnerabilities<'a>(
        &'a self,
        name: &'a str,
        version: &'a str,
    ) -> ProviderFuture<'a, VulnerabilityReport>;

    fn requests_per_lookup(&self) -> u32 {
        1
    }
}

pub(crate) fn build_http_client(config: &ScanConfig) -> Result<reqwest::Client, DepScanError> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!("depscan/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
