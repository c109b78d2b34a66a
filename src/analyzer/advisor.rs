use crate::config::ScanConfig;
use crate::models::DependencyResult;
use std::future::Future;
use std::pin::Pin;

pub const PLACEHOLDER_RECOMMENDATION: &str = "AI-powered recommendations coming soon. Connect your Anthropic API key to get personalized dependency upgrade advice.";

/// Produces a remediation summary for the analyzed dependencies. Must never
/// fail; a backend that cannot answer returns fixed text instead.
pub trait RemediationAdvisor: Send + Sync {
    fn summarize<'a>(
        &'a self,
        results: &'a [DependencyResult],
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>>;
}

pub struct PlaceholderAdvisor {
    api_key_configured: bool,
}

impl PlaceholderAdvisor {
    pub fn new() -> Self {
        Self {
            api_key_configured: false,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            api_key_configured: config.anthropic_api_key.is_some(),
        }
    }
}

impl Default for PlaceholderAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl RemediationAdvisor for PlaceholderAdvisor {
    fn summarize<'a>(
        &'a self,
        results: &'a [DependencyResult],
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        Box::pin(async move {
            if self.api_key_configured {
                tracing::debug!(
                    dependencies = results.len(),
                    "API key configured but no generation backend available"
                );
            }
            PLACEHOLDER_RECOMMENDATION.to_string()
        })
    }
}
