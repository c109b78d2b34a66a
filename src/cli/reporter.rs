use crate::cli::args::Cli;
use crate::error::DepScanError;
use crate::models::{AnalysisResult, DependencyResult, Grade, RiskLevel};

const NAME_WIDTH: usize = 32;
const VERSION_WIDTH: usize = 14;

pub struct ReportFormatter {
    use_colors: bool,
    verbose: bool,
}

impl ReportFormatter {
    pub fn new(cli: &Cli) -> Self {
        Self {
            use_colors: cli.should_use_color(),
            verbose: cli.is_verbose(),
        }
    }

    pub fn plain(verbose: bool) -> Self {
        Self {
            use_colors: false,
            verbose,
        }
    }

    pub fn format_analysis_report(&self, result: &AnalysisResult) -> String {
        let mut output = String::new();

        output.push_str(&self.format_header(result));
        output.push_str("\n\n");

        output.push_str(&self.format_grade(result));
        output.push_str("\n\n");

        output.push_str(&self.format_section("Risk breakdown", &self.format_risk_counts(result)));
        output.push_str("\n\n");

        output.push_str(&self.format_section("Dependencies", &self.format_dependency_table(result)));
        output.push_str("\n\n");

        if self.verbose {
            for dep in result.dependencies.iter().filter(|d| d.is_high_risk()) {
                output.push_str(&self.format_section(
                    &format!("{} {}", dep.name, dep.version),
                    &self.format_signal_details(dep),
                ));
                output.push_str("\n\n");
            }
        }

        output.push_str(&self.format_section("Recommendations", &result.ai_recommendation));
        output
    }

    pub fn format_json(&self, result: &AnalysisResult) -> Result<String, DepScanError> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    fn format_header(&self, result: &AnalysisResult) -> String {
        let mut header = if self.use_colors {
            "\x1b[1m\x1b[36m═══ DEPENDENCY RISK REPORT ═══\x1b[0m".to_string()
        } else {
            "=== DEPENDENCY RISK REPORT ===".to_string()
        };

        header.push_str(&format!(
            "\nAnalyzed {} of {} dependencies",
            result.analyzed_count, result.total_dependencies
        ));

        if result.was_truncated {
            header.push_str(&format!(
                " (only the first {} are analyzed)",
                result.analyzed_count
            ));
        }

        let partial = result.partial_data_count();
        if partial > 0 {
            header.push_str(&format!(
                "\n{} dependenc{} had incomplete upstream data (marked *)",
                partial,
                if partial == 1 { "y" } else { "ies" }
            ));
        }

        header
    }

    fn format_grade(&self, result: &AnalysisResult) -> String {
        let color_code = if self.use_colors {
            match result.grade {
                Grade::A => "\x1b[1m\x1b[32m", // Bold green
                Grade::B => "\x1b[1m\x1b[36m", // Bold cyan
                Grade::C => "\x1b[1m\x1b[33m", // Bold yellow
                Grade::D => "\x1b[1m\x1b[35m", // Bold magenta
                Grade::F => "\x1b[1m\x1b[31m", // Bold red
            }
        } else {
            ""
        };
        let reset = if self.use_colors { "\x1b[0m" } else { "" };

        format!(
            "{}Grade: {}  Risk score: {:.2}/100{}\n{}",
            color_code,
            result.grade.as_str(),
            result.overall_score,
            reset,
            result.grade.description()
        )
    }

    fn format_risk_counts(&self, result: &AnalysisResult) -> String {
        RiskLevel::ALL
            .iter()
            .map(|level| {
                format!(
                    "{} {:<9}{}",
                    level.as_emoji(),
                    self.colorize_level(*level, level.as_str()),
                    result.risk_counts.get(*level)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_dependency_table(&self, result: &AnalysisResult) -> String {
        let mut lines = vec![format!(
            "{:<name$} {:<version$} {:>6}  {}",
            "PACKAGE",
            "VERSION",
            "SCORE",
            "LEVEL",
            name = NAME_WIDTH,
            version = VERSION_WIDTH
        )];

        for dep in &result.dependencies {
            let marker = if dep.has_partial_data { "*" } else { "" };
            let name = format!("{}{}", truncate(&dep.name, NAME_WIDTH - 1), marker);
            lines.push(format!(
                "{:<name_w$} {:<version_w$} {:>6.2}  {}",
                name,
                truncate(&dep.version, VERSION_WIDTH),
                dep.risk_score,
                self.colorize_level(dep.risk_level, dep.risk_level.as_str()),
                name_w = NAME_WIDTH,
                version_w = VERSION_WIDTH
            ));
        }

        lines.join("\n")
    }

    fn format_signal_details(&self, dep: &DependencyResult) -> String {
        let mut lines: Vec<String> = dep
            .top_signals(3)
            .into_iter()
            .map(|signal| format!("{:<16} {:>3}  {}", signal.signal.label(), signal.score, signal.detail))
            .collect();

        let unavailable = dep.signals.iter().filter(|s| !s.available).count();
        if unavailable > 0 {
            lines.push(format!("{} signal(s) unavailable", unavailable));
        }

        lines.join("\n")
    }

    fn format_section(&self, title: &str, content: &str) -> String {
        if self.use_colors {
            format!("\x1b[1m\x1b[37m{}\x1b[0m\n{}", title, content)
        } else {
            format!("{}\n{}\n{}", title, "─".repeat(title.chars().count()), content)
        }
    }

    fn colorize_level(&self, level: RiskLevel, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        let color_code = match level {
            RiskLevel::Critical => "\x1b[1m\x1b[31m",
            RiskLevel::High => "\x1b[1m\x1b[33m",
            RiskLevel::Medium => "\x1b[1m\x1b[35m",
            RiskLevel::Low => "\x1b[1m\x1b[32m",
        };
        format!("{}{}\x1b[0m", color_code, text)
    }

    pub fn format_error(&self, error: &DepScanError) -> String {
        let (color_code, reset) = if self.use_colors {
            ("\x1b[1m\x1b[31m", "\x1b[0m")
        } else {
            ("", "")
        };

        format!("{}🚨 Analysis failed{}\n\n{}", color_code, reset, error)
    }

    pub fn format_progress(&self, message: &str) -> String {
        if self.use_colors {
            format!("\x1b[36m🔍 {}\x1b[0m", message)
        } else {
            format!("🔍 {}", message)
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
