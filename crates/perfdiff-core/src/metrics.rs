use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PerfDiffError;

// ---------------------------------------------------------------------------
// MetricRecord / MetricsDocument
// ---------------------------------------------------------------------------

/// Aggregated measurements for one labelled service or endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub label: String,
    /// Mean response time (ms).
    pub average_response_time: f64,
    /// Fraction of failed requests, 0..1.
    pub error_rate: f64,
    /// Requests per second.
    pub throughput: f64,
}

/// A metrics snapshot as written by the load-test dashboard.
///
/// Only the `metrics` array is interpreted; a document without it is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsDocument {
    #[serde(default)]
    pub metrics: Vec<MetricRecord>,
}

impl MetricsDocument {
    pub fn new(metrics: Vec<MetricRecord>) -> Self {
        Self { metrics }
    }

    /// Parse and validate a document. `source_name` is only used in errors.
    ///
    /// Every record must carry all four fields; a missing one is reported as
    /// [`PerfDiffError::InvalidFormat`] naming the field.
    pub fn from_json_str(content: &str, source_name: &str) -> Result<Self, PerfDiffError> {
        serde_json::from_str(content)
            .map_err(|e| PerfDiffError::invalid_format(source_name, e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Build the label → record mapping for this document.
    pub fn index(&self) -> LabelIndex<'_> {
        LabelIndex::build(&self.metrics)
    }

    /// Reject documents in which a label appears more than once.
    pub fn ensure_unique_labels(&self, source_name: &str) -> Result<(), PerfDiffError> {
        let index = self.index();
        match index.duplicate_labels() {
            [] => Ok(()),
            dups => Err(PerfDiffError::invalid_format(
                source_name,
                format!("duplicate labels: {}", dups.join(", ")),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// LabelIndex
// ---------------------------------------------------------------------------

/// Ordered label → record mapping over a borrowed document.
///
/// A label keeps the position of its first appearance and the record of its
/// last appearance.
#[derive(Debug)]
pub struct LabelIndex<'a> {
    order: Vec<&'a str>,
    records: HashMap<&'a str, &'a MetricRecord>,
    duplicates: Vec<String>,
}

impl<'a> LabelIndex<'a> {
    fn build(metrics: &'a [MetricRecord]) -> Self {
        let mut order = Vec::with_capacity(metrics.len());
        let mut records = HashMap::with_capacity(metrics.len());
        let mut duplicates = Vec::new();

        for record in metrics {
            let label = record.label.as_str();
            if records.insert(label, record).is_none() {
                order.push(label);
            } else if !duplicates.iter().any(|d| d == label) {
                duplicates.push(label.to_string());
            }
        }

        Self {
            order,
            records,
            duplicates,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&'a MetricRecord> {
        self.records.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.records.contains_key(label)
    }

    /// Iterate `(label, record)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a MetricRecord)> + '_ {
        self.order.iter().map(move |label| (*label, self.records[label]))
    }

    pub fn labels(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.order.iter().copied()
    }

    /// Labels that appeared more than once, in first-duplicate order.
    pub fn duplicate_labels(&self) -> &[String] {
        &self.duplicates
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read a metrics document from disk.
pub async fn load_document(path: impl AsRef<Path>) -> Result<MetricsDocument, PerfDiffError> {
    let path = path.as_ref();
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!("File not found: {}", path.display());
            return Err(PerfDiffError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let doc = MetricsDocument::from_json_str(&content, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), records = doc.len(), "loaded metrics document");
    Ok(doc)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
