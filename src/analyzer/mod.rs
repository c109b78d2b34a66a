// Analyzer module - dependency analysis orchestration and project roll-up

pub mod advisor;
pub mod aggregator;
pub mod orchestrator;

pub use advisor::{PlaceholderAdvisor, RemediationAdvisor, PLACEHOLDER_RECOMMENDATION};
pub use aggregator::{ProjectSummary, ResultAggregator};
pub use orchestrator::{score_signals, DependencyAnalyzer};
