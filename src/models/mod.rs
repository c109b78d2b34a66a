pub mod dependency;
pub mod signal;
pub mod metadata;
pub mod analysis;

pub use dependency::{DependencyType, ParsedDependency, ParsedManifest};
pub use signal::{SignalKind, SignalScore};
pub use metadata::{DependencyMetadata, RegistryData, RepositoryStats, Vulnerability, VulnerabilityReport};
pub use analysis::{
    AnalysisResult, AnalyzeRequest, AnalyzeResponse, DependencyResult, Grade, RiskCounts, RiskLevel,
};
