use crate::models::{DependencyMetadata, DependencyType, SignalKind, SignalScore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyResult {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub signals: Vec<SignalScore>,
    pub metadata: DependencyMetadata,
    pub has_partial_data: bool,
}

/// Project-level outcome of one manifest analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub grade: Grade,
    pub total_dependencies: usize,
    pub analyzed_count: usize,
    pub was_truncated: bool,
    pub risk_counts: RiskCounts,
    pub dependencies: Vec<DependencyResult>,
    pub ai_recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn as_emoji(&self) -> &'static str {
        match self {
            RiskLevel::Low => "✅",
            RiskLevel::Medium => "🔶",
            RiskLevel::High => "⚠️",
            RiskLevel::Critical => "🚨",
        }
    }

    pub fn numeric_value(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.numeric_value().cmp(&other.numeric_value())
    }
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Grade::A => "Healthy dependency set",
            Grade::B => "Minor concerns",
            Grade::C => "Moderate risk, review recommended",
            Grade::D => "High risk, action needed",
            Grade::F => "Critical risk, immediate attention required",
        }
    }
}

impl RiskCounts {
    pub fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Critical => self.critical += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::Low => self.low += 1,
        }
    }

    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Critical => self.critical,
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }

    pub fn high_and_critical(&self) -> usize {
        self.high + self.critical
    }
}

impl DependencyResult {
    pub fn signal(&self, kind: SignalKind) -> Option<&SignalScore> {
        self.signals.iter().find(|s| s.signal == kind)
    }

    /// Available signals ordered by score, highest first.
    pub fn top_signals(&self, limit: usize) -> Vec<&SignalScore> {
        let mut available: Vec<&SignalScore> = self.signals.iter().filter(|s| s.available).collect();
        available.sort_by(|a, b| b.score.total_cmp(&a.score));
        available.into_iter().take(limit).collect()
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_level >= RiskLevel::High
    }
}

impl AnalysisResult {
    pub fn partial_data_count(&self) -> usize {
        self.dependencies.iter().filter(|d| d.has_partial_data).count()
    }

    pub fn worst_dependency(&self) -> Option<&DependencyResult> {
        self.dependencies.first()
    }
}

impl AnalyzeResponse {
    pub fn ok(data: AnalysisResult) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure<S: Into<String>>(error: S) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
