use crate::models::{AnalysisResult, DependencyResult, Grade, RiskCounts};
use crate::scoring::{calculate_grade, calculate_overall_score};

/// Project-level roll-up of per-dependency results.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub dependencies: Vec<DependencyResult>,
    pub risk_counts: RiskCounts,
    pub overall_score: f64,
    pub grade: Grade,
}

pub struct ResultAggregator;

impl ResultAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Sorts by risk score (highest first, ties keep their order), tallies
    /// risk levels and derives the overall score and grade.
    pub fn summarize(&self, mut results: Vec<DependencyResult>) -> ProjectSummary {
        results.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));

        let mut risk_counts = RiskCounts::default();
        for result in &results {
            risk_counts.record(result.risk_level);
        }

        let overall_score = match results.first() {
            Some(worst) => {
                let average =
                    results.iter().map(|r| r.risk_score).sum::<f64>() / results.len() as f64;
                calculate_overall_score(average, worst.risk_score, risk_counts.high_and_critical())
            }
            None => 0.0,
        };

        ProjectSummary {
            dependencies: results,
            risk_counts,
            overall_score,
            grade: calculate_grade(overall_score),
        }
    }

    pub fn into_analysis_result(
        &self,
        summary: ProjectSummary,
        total_dependencies: usize,
        was_truncated: bool,
        ai_recommendation: String,
    ) -> AnalysisResult {
        AnalysisResult {
            overall_score: summary.overall_score,
            grade: summary.grade,
            total_dependencies,
            analyzed_count: summary.dependencies.len(),
            was_truncated,
            risk_counts: summary.risk_counts,
            dependencies: summary.dependencies,
            ai_recommendation,
        }
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}
