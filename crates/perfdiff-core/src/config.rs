use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compare::Metric;

pub const DEFAULT_BASE_DIR: &str = ".";
pub const DEFAULT_TEST_NAME: &str = "DefaultTestName";

pub const HTML_REPORT_FILE: &str = "comparison_report.html";
pub const LOG_FILE: &str = "compare_reports.log";

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Maximum tolerated absolute deviation per metric before it is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Thresholds {
    /// Average response time tolerance (ms).
    pub response_time_ms: f64,
    /// Error rate tolerance as a fraction (0.01 = 1%).
    pub error_rate: f64,
    /// Throughput tolerance (requests per second).
    pub throughput_rps: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            response_time_ms: 10.0,
            error_rate: 0.01,
            throughput_rps: 5.0,
        }
    }
}

impl Thresholds {
    pub fn threshold_for(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ResponseTime => self.response_time_ms,
            Metric::ErrorRate => self.error_rate,
            Metric::Throughput => self.throughput_rps,
        }
    }
}

// ---------------------------------------------------------------------------
// ReportPaths
// ---------------------------------------------------------------------------

/// File locations for one performance test, derived from a build directory
/// and a test name.
///
/// Layout under `{base_dir}/{test_name}Test`:
/// - `json/baseline.json`
/// - `charts/Dashboard/statistics.json`
/// - `charts/` (chart output and `compare_reports.log`)
/// - `comparison_report.html`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub base_dir: PathBuf,
    pub test_name: String,
    pub test_dir: PathBuf,
    pub baseline_file: PathBuf,
    pub latest_file: PathBuf,
    pub charts_dir: PathBuf,
    pub html_report: PathBuf,
    pub log_file: PathBuf,
}

impl ReportPaths {
    /// Build the path layout. Surrounding double quotes are stripped from both
    /// inputs, since CI agents often pass them through verbatim.
    pub fn new(base_dir: impl AsRef<str>, test_name: impl AsRef<str>) -> Self {
        let base_dir = PathBuf::from(strip_quotes(base_dir.as_ref()));
        let test_name = strip_quotes(test_name.as_ref()).to_string();

        let test_dir = base_dir.join(format!("{test_name}Test"));
        let charts_dir = test_dir.join("charts");

        Self {
            baseline_file: test_dir.join("json").join("baseline.json"),
            latest_file: charts_dir.join("Dashboard").join("statistics.json"),
            html_report: test_dir.join(HTML_REPORT_FILE),
            log_file: charts_dir.join(LOG_FILE),
            charts_dir,
            test_dir,
            base_dir,
            test_name,
        }
    }

    pub fn with_baseline_file(mut self, path: impl AsRef<Path>) -> Self {
        self.baseline_file = path.as_ref().to_path_buf();
        self
    }

    pub fn with_latest_file(mut self, path: impl AsRef<Path>) -> Self {
        self.latest_file = path.as_ref().to_path_buf();
        self
    }
}

impl Default for ReportPaths {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR, DEFAULT_TEST_NAME)
    }
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}
