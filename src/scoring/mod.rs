// Scoring module - per-signal scorers and the risk aggregation rules

pub mod aggregate;
pub mod signals;

pub use aggregate::{
    calculate_grade, calculate_overall_score, calculate_risk_score, get_risk_level,
    UNAVAILABLE_PENALTY_SCORE,
};
pub use signals::{
    score_bus_factor, score_download_trend, score_license, score_open_issues, score_staleness,
    score_staleness_at, score_version_pinning, score_vulnerabilities,
};
