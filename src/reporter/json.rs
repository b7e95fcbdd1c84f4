//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::{FileReport, RiskLevel};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report any serializable result (a DetectionResult, FileReport or HumanizeReport)
    pub fn report<T: Serialize + ?Sized>(&self, value: &T) -> String {
        self.render(value, "{}")
    }

    /// Report multiple file reports as a JSON array
    pub fn report_many(&self, reports: &[FileReport]) -> String {
        self.render(reports, "[]")
    }

    /// Report with summary
    pub fn report_with_summary(&self, reports: &[FileReport], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results: reports,
            summary: JsonSummary {
                files_scored: stats.files_scored,
                average_risk: stats.average_risk,
                average_level: stats.average_level,
                passed: stats.passed,
                total_flags: stats.total_flags,
            },
        };
        self.render(&output, "{}")
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [FileReport],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    files_scored: usize,
    average_risk: u8,
    average_level: RiskLevel,
    passed: usize,
    total_flags: usize,
}
