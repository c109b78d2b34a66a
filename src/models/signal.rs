use serde::{Deserialize, Serialize};

/// The seven independent risk signals scored for every dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKind {
    Staleness,
    Vulnerabilities,
    BusFactor,
    OpenIssues,
    DownloadTrend,
    License,
    VersionPinning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalScore {
    pub signal: SignalKind,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub detail: String,
    pub available: bool,
}

impl SignalKind {
    pub const ALL: [SignalKind; 7] = [
        SignalKind::Staleness,
        SignalKind::Vulnerabilities,
        SignalKind::BusFactor,
        SignalKind::OpenIssues,
        SignalKind::DownloadTrend,
        SignalKind::License,
        SignalKind::VersionPinning,
    ];

    /// Fixed weight of the signal. The seven weights sum to 1.0.
    pub fn weight(&self) -> f64 {
        match self {
            SignalKind::Staleness => 0.25,
            SignalKind::Vulnerabilities => 0.25,
            SignalKind::BusFactor => 0.15,
            SignalKind::OpenIssues => 0.10,
            SignalKind::DownloadTrend => 0.05,
            SignalKind::License => 0.10,
            SignalKind::VersionPinning => 0.10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Staleness => "staleness",
            SignalKind::Vulnerabilities => "vulnerabilities",
            SignalKind::BusFactor => "busFactor",
            SignalKind::OpenIssues => "openIssues",
            SignalKind::DownloadTrend => "downloadTrend",
            SignalKind::License => "license",
            SignalKind::VersionPinning => "versionPinning",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::Staleness => "Staleness",
            SignalKind::Vulnerabilities => "Vulnerabilities",
            SignalKind::BusFactor => "Bus factor",
            SignalKind::OpenIssues => "Open issues",
            SignalKind::DownloadTrend => "Downloads",
            SignalKind::License => "License",
            SignalKind::VersionPinning => "Version pinning",
        }
    }
}

impl SignalScore {
    /// Builds a score from a raw value, rounding to the nearest integer and
    /// clamping into [0, 100].
    pub fn measured<S: Into<String>>(signal: SignalKind, raw_score: f64, detail: S) -> Self {
        let score = if raw_score.is_nan() {
            0.0
        } else {
            raw_score.round().clamp(0.0, 100.0)
        };
        let weight = signal.weight();

        Self {
            signal,
            score,
            weight,
            weighted_score: score * weight,
            detail: detail.into(),
            available: true,
        }
    }

    /// Upstream data was missing. The weight is still reported so the
    /// aggregator can apply its missing-data penalty.
    pub fn unavailable(signal: SignalKind) -> Self {
        Self {
            signal,
            score: 0.0,
            weight: signal.weight(),
            weighted_score: 0.0,
            detail: "Data unavailable".to_string(),
            available: false,
        }
    }
}
