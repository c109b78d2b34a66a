pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod providers;
pub mod scoring;
pub mod server;

pub use error::DepScanError;

// Re-export commonly used types
pub use models::{
    AnalysisResult, DependencyResult, DependencyType, Grade, ParsedDependency, RiskCounts,
    RiskLevel, SignalKind, SignalScore,
};

pub use analyzer::DependencyAnalyzer;
pub use config::ScanConfig;

pub use cli::CliHandler;
