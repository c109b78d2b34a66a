//! The seven per-dependency signal scorers.
//!
//! Every scorer takes the raw upstream metric (or `None` when the upstream
//! lookup produced nothing) and returns a [`SignalScore`]. A missing metric
//! always yields an unavailable score; scorers never fail.

use crate::models::{SignalKind, SignalScore, Vulnerability};
use chrono::{DateTime, NaiveDate, Utc};

const MILLIS_PER_MONTH: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * 30.0;

const PERMISSIVE_LICENSES: &[&str] = &[
    "MIT",
    "APACHE-2.0",
    "BSD-2-CLAUSE",
    "BSD-3-CLAUSE",
    "ISC",
    "UNLICENSE",
    "0BSD",
];

const COPYLEFT_LICENSES: &[&str] = &["GPL-2.0", "GPL-3.0", "AGPL-3.0", "LGPL-2.1", "LGPL-3.0"];

pub fn score_staleness(last_publish_date: Option<&str>) -> SignalScore {
    score_staleness_at(last_publish_date, Utc::now())
}

/// Piecewise-linear in months since the last publish:
/// 0-6 → 0-10, 6-12 → 10-35, 12-24 → 35-75, 24+ → 75-100.
pub fn score_staleness_at(last_publish_date: Option<&str>, now: DateTime<Utc>) -> SignalScore {
    let Some(published) = last_publish_date.and_then(parse_timestamp) else {
        return SignalScore::unavailable(SignalKind::Staleness);
    };

    let months_ago = (now - published).num_milliseconds() as f64 / MILLIS_PER_MONTH;

    let score = if months_ago <= 6.0 {
        (months_ago / 6.0) * 10.0
    } else if months_ago <= 12.0 {
        10.0 + ((months_ago - 6.0) / 6.0) * 25.0
    } else if months_ago <= 24.0 {
        35.0 + ((months_ago - 12.0) / 12.0) * 40.0
    } else {
        (75.0 + ((months_ago - 24.0) / 24.0) * 25.0).min(100.0)
    };

    SignalScore::measured(
        SignalKind::Staleness,
        score,
        format!("Last published {:.1} years ago", months_ago / 12.0),
    )
}

pub fn score_vulnerabilities(vulnerabilities: Option<&[Vulnerability]>) -> SignalScore {
    let Some(vulns) = vulnerabilities else {
        return SignalScore::unavailable(SignalKind::Vulnerabilities);
    };

    match vulns.len() {
        0 => SignalScore::measured(SignalKind::Vulnerabilities, 0.0, "No known vulnerabilities"),
        n if n >= 3 => SignalScore::measured(
            SignalKind::Vulnerabilities,
            100.0,
            format!("{} vulnerabilities found", n),
        ),
        n => {
            let worst = vulns
                .iter()
                .max_by_key(|v| severity_score(&v.severity))
                .map(|v| v.severity.as_str())
                .unwrap_or("UNKNOWN");
            let max_score = vulns
                .iter()
                .map(|v| severity_score(&v.severity))
                .max()
                .unwrap_or(0);

            SignalScore::measured(
                SignalKind::Vulnerabilities,
                f64::from(max_score),
                format!(
                    "{} vulnerabilit{} found (worst: {})",
                    n,
                    if n == 1 { "y" } else { "ies" },
                    worst
                ),
            )
        }
    }
}

/// Unrecognized severities count as MEDIUM.
fn severity_score(severity: &str) -> u8 {
    match severity.to_uppercase().as_str() {
        "CRITICAL" => 90,
        "HIGH" => 70,
        "LOW" => 20,
        _ => 40,
    }
}

pub fn score_bus_factor(contributor_count: Option<u64>) -> SignalScore {
    let Some(count) = contributor_count else {
        return SignalScore::unavailable(SignalKind::BusFactor);
    };

    let score = match count {
        0..=1 => 95.0,
        2 => 70.0,
        3..=5 => 50.0,
        6..=10 => 30.0,
        11..=20 => 15.0,
        21..=50 => 5.0,
        _ => 0.0,
    };

    SignalScore::measured(SignalKind::BusFactor, score, format!("{} contributor(s)", count))
}

/// Balances the open proportion against the absolute backlog size, which
/// saturates at 500 open issues.
pub fn score_open_issues(open_count: Option<u64>, closed_count: Option<u64>) -> SignalScore {
    let (Some(open), Some(closed)) = (open_count, closed_count) else {
        return SignalScore::unavailable(SignalKind::OpenIssues);
    };

    let total = open + closed;
    if total == 0 {
        return SignalScore::measured(SignalKind::OpenIssues, 0.0, "No issues found");
    }

    let ratio = open as f64 / total as f64;
    let absolute_factor = (open as f64 / 500.0).min(1.0);
    let score = (ratio * 50.0 + absolute_factor * 50.0).min(100.0);

    SignalScore::measured(
        SignalKind::OpenIssues,
        score,
        format!(
            "{} open / {} closed ({:.0}% open)",
            open,
            closed,
            ratio * 100.0
        ),
    )
}

/// Fewer weekly downloads means higher risk.
pub fn score_download_trend(weekly_downloads: Option<u64>) -> SignalScore {
    let Some(downloads) = weekly_downloads else {
        return SignalScore::unavailable(SignalKind::DownloadTrend);
    };

    let score = if downloads < 100 {
        80.0
    } else if downloads <= 1_000 {
        50.0
    } else if downloads <= 100_000 {
        20.0
    } else {
        5.0
    };

    SignalScore::measured(
        SignalKind::DownloadTrend,
        score,
        format!("{} weekly downloads", format_thousands(downloads)),
    )
}

/// `None` means the registry lookup failed; `Some(None)` means the package
/// declares no license.
pub fn score_license(license: Option<Option<&str>>) -> SignalScore {
    let Some(declared) = license else {
        return SignalScore::unavailable(SignalKind::License);
    };

    let Some(license) = declared else {
        return SignalScore::measured(SignalKind::License, 80.0, "No license specified");
    };

    let upper = license.to_uppercase();
    if PERMISSIVE_LICENSES.iter().any(|lic| upper.starts_with(lic)) {
        SignalScore::measured(SignalKind::License, 0.0, format!("Permissive license: {}", license))
    } else if COPYLEFT_LICENSES.iter().any(|lic| upper.starts_with(lic)) {
        SignalScore::measured(SignalKind::License, 60.0, format!("Copyleft license: {}", license))
    } else {
        SignalScore::measured(
            SignalKind::License,
            40.0,
            format!("Non-standard license: {}", license),
        )
    }
}

/// Always available: the declared range is part of the manifest itself.
pub fn score_version_pinning(version: &str) -> SignalScore {
    let (score, detail) = if version == "*" || version.starts_with('>') {
        (90.0, format!("Wide range: {}", version))
    } else if version.starts_with('^') {
        (20.0, format!("Caret range: {}", version))
    } else if version.starts_with('~') {
        (10.0, format!("Tilde range: {}", version))
    } else {
        (0.0, format!("Exact version: {}", version))
    };

    SignalScore::measured(SignalKind::VersionPinning, score, detail)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
