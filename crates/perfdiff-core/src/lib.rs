pub mod compare;
pub mod config;
pub mod error;
pub mod metrics;
pub mod report;

pub use compare::{compare_documents, compare_metrics, ComparisonReport, Issue, Metric, Status};
pub use config::{ReportPaths, Thresholds};
pub use error::PerfDiffError;
pub use metrics::{load_document, LabelIndex, MetricRecord, MetricsDocument};
