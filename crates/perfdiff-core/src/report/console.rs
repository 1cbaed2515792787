use std::fmt::Write;

use crate::compare::ComparisonReport;
use crate::config::ReportPaths;

pub const ALL_WITHIN_THRESHOLDS: &str = "All metrics are within acceptable thresholds.";

/// Resolved locations, one per line, as printed before a comparison runs.
pub fn render_paths(paths: &ReportPaths) -> String {
    format!(
        "Base directory: {}\n\
         Performance test name: {}\n\
         Test directory: {}\n\
         Baseline file: {}\n\
         Latest file: {}\n",
        paths.base_dir.display(),
        paths.test_name,
        paths.test_dir.display(),
        paths.baseline_file.display(),
        paths.latest_file.display(),
    )
}

/// The issue list, or a single line saying everything is within thresholds.
pub fn render_issues(report: &ComparisonReport) -> String {
    if !report.has_issues() {
        return format!("{ALL_WITHIN_THRESHOLDS}\n");
    }

    let mut out = String::from("Comparison Issues Found:\n");
    for issue in &report.issues {
        // Writing into a String cannot fail.
        let _ = writeln!(out, " - {issue}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare_documents;
    use crate::config::Thresholds;
    use crate::metrics::{MetricRecord, MetricsDocument};

    fn doc(label: &str, rt: f64) -> MetricsDocument {
        MetricsDocument::new(vec![MetricRecord {
            label: label.to_string(),
            average_response_time: rt,
            error_rate: 0.0,
            throughput: 10.0,
        }])
    }

    #[test]
    fn render_issues_when_clean() {
        let report = compare_documents(&doc("A", 10.0), &doc("A", 10.0), &Thresholds::default());
        assert_eq!(render_issues(&report), "All metrics are within acceptable thresholds.\n");
    }

    #[test]
    fn render_issues_lists_each_issue() {
        let report = compare_documents(&doc("A", 10.0), &doc("B", 10.0), &Thresholds::default());
        assert_eq!(
            render_issues(&report),
            "Comparison Issues Found:\n - A: Missing in latest results.\n"
        );
    }

    #[test]
    fn render_paths_lists_locations() {
        let text = render_paths(&ReportPaths::new("/build", "Orders"));
        assert!(text.contains("Base directory: /build\n"));
        assert!(text.contains("Performance test name: Orders\n"));
        assert!(text.contains("Baseline file: /build/OrdersTest/json/baseline.json\n"));
        assert!(text.contains("Latest file: /build/OrdersTest/charts/Dashboard/statistics.json\n"));
    }
}
