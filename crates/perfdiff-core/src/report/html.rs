use chrono::NaiveDateTime;

use super::html_escape;
use crate::compare::ComparisonReport;

/// Render a standalone HTML comparison report with inline CSS.
///
/// One table row per (label, metric) pair, classed `better`, `worse` or
/// `neutral`, followed by the identified issues when there are any.
pub fn render(report: &ComparisonReport, generated_at: NaiveDateTime) -> String {
    let rows: String = report
        .rows
        .iter()
        .map(|row| {
            format!(
                "<tr class=\"{}\">\n<td>{}</td>\n<td>{}</td>\n<td>{:.2}</td>\n<td>{:.2}</td>\n<td>{:+.2}</td>\n</tr>",
                row.status,
                html_escape(&row.label),
                row.metric.report_name(),
                row.baseline,
                row.latest,
                row.difference,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let issues = if report.has_issues() {
        let items: String = report
            .issues
            .iter()
            .map(|issue| format!("<li>{}</li>", html_escape(&issue.to_string())))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "<div class=\"issues\">\n<h2>Identified Issues</h2>\n<ul>\n{items}\n</ul>\n</div>\n"
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Performance Comparison Report</title>
<style>
  body {{ font-family: Arial, sans-serif; margin: 20px; }}
  .better {{ color: green; background-color: #e6ffe6; }}
  .worse {{ color: red; background-color: #ffe6e6; }}
  .neutral {{ color: black; background-color: #f2f2f2; }}
  table {{ border-collapse: collapse; width: 100%; margin-bottom: 20px; }}
  th, td {{ border: 1px solid #ddd; padding: 12px; text-align: left; }}
  th {{ background-color: #4CAF50; color: white; }}
  .issues {{ margin-top: 20px; padding: 10px; border: 1px solid #ddd; }}
  .timestamp {{ color: #666; font-size: 0.9em; margin-bottom: 20px; }}
</style>
</head>
<body>
<h1>Performance Comparison Report</h1>
<div class="timestamp">Generated on: {timestamp}</div>
<h2>Metrics Comparison</h2>
<table>
<tr>
<th>Label</th>
<th>Metric</th>
<th>Baseline</th>
<th>Latest</th>
<th>Difference</th>
</tr>
{rows}
</table>
{issues}</body>
</html>
"#,
        timestamp = generated_at.format("%Y-%m-%d %H:%M:%S"),
        rows = rows,
        issues = issues,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::compare::compare_documents;
    use crate::config::Thresholds;
    use crate::metrics::{MetricRecord, MetricsDocument};

    fn record(label: &str, rt: f64, err: f64, tput: f64) -> MetricRecord {
        MetricRecord {
            label: label.to_string(),
            average_response_time: rt,
            error_rate: err,
            throughput: tput,
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .and_then(|d| d.and_hms_opt(15, 17, 53))
            .expect("valid timestamp")
    }

    fn render_pair(baseline: Vec<MetricRecord>, latest: Vec<MetricRecord>) -> String {
        let report = compare_documents(
            &MetricsDocument::new(baseline),
            &MetricsDocument::new(latest),
            &Thresholds::default(),
        );
        render(&report, generated_at())
    }

    #[test]
    fn html_is_a_complete_document() {
        let html = render_pair(vec![record("Svc", 100.0, 0.0, 50.0)], vec![record("Svc", 100.0, 0.0, 50.0)]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Performance Comparison Report"));
        assert!(html.contains("Generated on: 2025-01-02 15:17:53"));
    }

    #[test]
    fn one_row_per_label_and_metric() {
        let html = render_pair(
            vec![record("A", 100.0, 0.0, 50.0), record("B", 100.0, 0.0, 50.0)],
            vec![record("A", 100.0, 0.0, 50.0), record("B", 100.0, 0.0, 50.0)],
        );
        assert_eq!(html.matches("<tr class=").count(), 6);
        assert!(html.contains("<td>Response Time (ms)</td>"));
        assert!(html.contains("<td>Error Rate</td>"));
        assert!(html.contains("<td>Throughput (rps)</td>"));
    }

    #[test]
    fn rows_use_status_classes_and_signed_difference() {
        let html = render_pair(vec![record("Svc", 100.0, 0.02, 50.0)], vec![record("Svc", 115.0, 0.02, 60.0)]);
        assert!(html.contains("<tr class=\"worse\">\n<td>Svc</td>\n<td>Response Time (ms)</td>\n<td>100.00</td>\n<td>115.00</td>\n<td>+15.00</td>"));
        assert!(html.contains("<tr class=\"neutral\">\n<td>Svc</td>\n<td>Error Rate</td>"));
        assert!(html.contains("<tr class=\"better\">\n<td>Svc</td>\n<td>Throughput (rps)</td>"));
    }

    #[test]
    fn negative_difference_has_minus_sign() {
        let html = render_pair(vec![record("Svc", 100.0, 0.0, 50.0)], vec![record("Svc", 80.0, 0.0, 50.0)]);
        assert!(html.contains("<td>-20.00</td>"));
    }

    #[test]
    fn issues_section_only_when_issues_exist() {
        let clean = render_pair(vec![record("Svc", 100.0, 0.0, 50.0)], vec![record("Svc", 100.0, 0.0, 50.0)]);
        assert!(!clean.contains("Identified Issues"));

        let dirty = render_pair(vec![record("Svc", 100.0, 0.0, 50.0)], Vec::new());
        assert!(dirty.contains("Identified Issues"));
        assert!(dirty.contains("<li>Svc: Missing in latest results.</li>"));
    }

    #[test]
    fn labels_are_escaped() {
        let html = render_pair(vec![record("<script>", 1.0, 0.0, 1.0)], vec![record("<script>", 1.0, 0.0, 1.0)]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<td><script></td>"));
    }
}
