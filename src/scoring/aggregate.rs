use crate::models::{Grade, RiskLevel, SignalKind, SignalScore};

/// Score assumed for a signal whose upstream data was unavailable. Missing
/// data counts as moderate risk; it is never dropped from the weighting.
pub const UNAVAILABLE_PENALTY_SCORE: f64 = 50.0;

/// Combines a dependency's signal scores into one risk score in [0, 100].
pub fn calculate_risk_score(signals: &[SignalScore]) -> f64 {
    if signals.is_empty() {
        return 0.0;
    }

    let total_weight: f64 = signals.iter().map(|s| s.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let weighted_sum: f64 = signals
        .iter()
        .map(|s| {
            if s.available {
                s.weighted_score
            } else {
                UNAVAILABLE_PENALTY_SCORE * s.weight
            }
        })
        .sum();

    let score = weighted_sum / total_weight + compound_penalty(signals);

    round2(score.min(100.0).max(0.0))
}

/// Extra risk for dangerous staleness/vulnerability combinations. Only one
/// branch ever applies.
fn compound_penalty(signals: &[SignalScore]) -> f64 {
    let find = |kind: SignalKind| signals.iter().find(|s| s.signal == kind && s.available);
    let staleness = find(SignalKind::Staleness).map(|s| s.score);
    let vulns = find(SignalKind::Vulnerabilities).map(|s| s.score);

    match (staleness, vulns) {
        // Unmaintained with no known CVEs: likely undiscovered ones.
        (Some(stale), Some(v)) if stale >= 80.0 && v == 0.0 => 25.0,
        (Some(stale), Some(v)) if stale >= 80.0 && v >= 70.0 => 15.0,
        (Some(stale), Some(v)) if (75.0..80.0).contains(&stale) && v >= 70.0 => 10.0,
        _ => 0.0,
    }
}

pub fn calculate_grade(score: f64) -> Grade {
    if score <= 20.0 {
        Grade::A
    } else if score <= 35.0 {
        Grade::B
    } else if score <= 50.0 {
        Grade::C
    } else if score <= 70.0 {
        Grade::D
    } else {
        Grade::F
    }
}

pub fn get_risk_level(score: f64) -> RiskLevel {
    if score <= 25.0 {
        RiskLevel::Low
    } else if score <= 50.0 {
        RiskLevel::Medium
    } else if score <= 75.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Project score: half portfolio average, 30% worst dependency, 20% breadth
/// of high/critical exposure (saturating at four such dependencies).
pub fn calculate_overall_score(average: f64, max_score: f64, high_and_critical_count: usize) -> f64 {
    let high_risk_penalty = (high_and_critical_count as f64 * 25.0).min(100.0);
    let raw = average * 0.5 + max_score * 0.3 + high_risk_penalty * 0.2;
    round2(raw.min(100.0))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
