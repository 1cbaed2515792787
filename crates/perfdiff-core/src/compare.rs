use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::metrics::{MetricRecord, MetricsDocument};

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// One of the three compared measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ResponseTime,
    ErrorRate,
    Throughput,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::ResponseTime, Metric::ErrorRate, Metric::Throughput];

    /// Key of this metric in the JSON document.
    pub fn key(self) -> &'static str {
        match self {
            Metric::ResponseTime => "averageResponseTime",
            Metric::ErrorRate => "errorRate",
            Metric::Throughput => "throughput",
        }
    }

    /// Name used in the HTML report table.
    pub fn report_name(self) -> &'static str {
        match self {
            Metric::ResponseTime => "Response Time (ms)",
            Metric::ErrorRate => "Error Rate",
            Metric::Throughput => "Throughput (rps)",
        }
    }

    /// Name used for chart titles, axes and file names.
    pub fn chart_name(self) -> &'static str {
        match self {
            Metric::ResponseTime => "Average Response Time (ms)",
            Metric::ErrorRate => "Error Rate (%)",
            Metric::Throughput => "Throughput (req/sec)",
        }
    }

    /// Factor applied to raw values when charting (error rate is shown in %).
    pub fn chart_scale(self) -> f64 {
        match self {
            Metric::ErrorRate => 100.0,
            _ => 1.0,
        }
    }

    /// Whether a decrease counts as an improvement.
    pub fn lower_is_better(self) -> bool {
        !matches!(self, Metric::Throughput)
    }

    pub fn value(self, record: &MetricRecord) -> f64 {
        match self {
            Metric::ResponseTime => record.average_response_time,
            Metric::ErrorRate => record.error_rate,
            Metric::Throughput => record.throughput,
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Direction of a change relative to its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Better,
    Worse,
    Neutral,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Better => "better",
            Status::Worse => "worse",
            Status::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a change from `baseline` to `latest`.
///
/// A change whose magnitude is at or below `threshold` is neutral.
pub fn classify(baseline: f64, latest: f64, threshold: f64, lower_is_better: bool) -> Status {
    let diff = latest - baseline;
    if diff.abs() <= threshold {
        return Status::Neutral;
    }
    let decreased = diff < 0.0;
    if decreased == lower_is_better {
        Status::Better
    } else {
        Status::Worse
    }
}

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

/// A finding worth reporting: an out-of-threshold deviation or a baseline
/// label that the latest run did not produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    Deviation {
        label: String,
        metric: Metric,
        baseline: f64,
        latest: f64,
    },
    MissingInLatest {
        label: String,
    },
}

impl Issue {
    pub fn label(&self) -> &str {
        match self {
            Issue::Deviation { label, .. } | Issue::MissingInLatest { label } => label,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Deviation {
                label,
                metric: Metric::ResponseTime,
                baseline,
                latest,
            } => write!(
                f,
                "{label}: Response time deviation too high ({latest} ms vs {baseline} ms)."
            ),
            Issue::Deviation {
                label,
                metric: Metric::ErrorRate,
                baseline,
                latest,
            } => write!(f, "{label}: Error rate deviation too high ({latest} vs {baseline})."),
            Issue::Deviation {
                label,
                metric: Metric::Throughput,
                baseline,
                latest,
            } => write!(
                f,
                "{label}: Throughput deviation too high ({latest} rps vs {baseline} rps)."
            ),
            Issue::MissingInLatest { label } => write!(f, "{label}: Missing in latest results."),
        }
    }
}

// ---------------------------------------------------------------------------
// ComparisonReport
// ---------------------------------------------------------------------------

/// One (label, metric) pair present in both documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricComparison {
    pub label: String,
    pub metric: Metric,
    pub baseline: f64,
    pub latest: f64,
    /// Signed `latest - baseline`.
    pub difference: f64,
    pub status: Status,
}

/// Full result of comparing a baseline document against a latest one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComparisonReport {
    pub thresholds: Thresholds,
    /// Rows in baseline order, three per matched label.
    pub rows: Vec<MetricComparison>,
    pub issues: Vec<Issue>,
    /// Labels only present in the latest document. Never compared.
    pub ignored_labels: Vec<String>,
}

impl ComparisonReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn issue_messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    pub fn count_status(&self, status: Status) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    /// Number of labels that matched in both documents.
    pub fn matched_labels(&self) -> usize {
        self.rows.len() / Metric::ALL.len()
    }
}

/// Compare `latest` against `baseline`, producing table rows and issues.
pub fn compare_documents(
    baseline: &MetricsDocument,
    latest: &MetricsDocument,
    thresholds: &Thresholds,
) -> ComparisonReport {
    let baseline_index = baseline.index();
    let latest_index = latest.index();

    for (name, index) in [("baseline", &baseline_index), ("latest", &latest_index)] {
        if !index.duplicate_labels().is_empty() {
            tracing::warn!(
                document = name,
                labels = ?index.duplicate_labels(),
                "duplicate labels; the last record for each label is used"
            );
        }
    }

    let mut rows = Vec::with_capacity(baseline_index.len() * Metric::ALL.len());
    let mut issues = Vec::new();

    for (label, base) in baseline_index.iter() {
        let Some(current) = latest_index.get(label) else {
            issues.push(Issue::MissingInLatest {
                label: label.to_string(),
            });
            continue;
        };

        for metric in Metric::ALL {
            let threshold = thresholds.threshold_for(metric);
            let baseline_value = metric.value(base);
            let latest_value = metric.value(current);
            let difference = latest_value - baseline_value;

            if difference.abs() > threshold {
                issues.push(Issue::Deviation {
                    label: label.to_string(),
                    metric,
                    baseline: baseline_value,
                    latest: latest_value,
                });
            }

            rows.push(MetricComparison {
                label: label.to_string(),
                metric,
                baseline: baseline_value,
                latest: latest_value,
                difference,
                status: classify(baseline_value, latest_value, threshold, metric.lower_is_better()),
            });
        }
    }

    let ignored_labels: Vec<String> = latest_index
        .labels()
        .filter(|label| !baseline_index.contains(label))
        .map(str::to_string)
        .collect();

    tracing::debug!(
        matched = rows.len() / Metric::ALL.len(),
        issues = issues.len(),
        ignored = ignored_labels.len(),
        "comparison complete"
    );

    ComparisonReport {
        thresholds: *thresholds,
        rows,
        issues,
        ignored_labels,
    }
}

/// Compare two documents and return only the human-readable issue lines.
///
/// An empty result means every metric is within its threshold.
pub fn compare_metrics(
    baseline: &MetricsDocument,
    latest: &MetricsDocument,
    thresholds: &Thresholds,
) -> Vec<String> {
    compare_documents(baseline, latest, thresholds).issue_messages()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
