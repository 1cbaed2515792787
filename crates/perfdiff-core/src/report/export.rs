use crate::compare::ComparisonReport;
use crate::error::PerfDiffError;

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

/// Export a comparison as pretty-printed JSON.
pub fn export_json(report: &ComparisonReport) -> Result<String, PerfDiffError> {
    Ok(serde_json::to_string_pretty(report)?)
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Export the comparison rows as CSV, one line per (label, metric).
///
/// Columns: `label,metric,baseline,latest,difference,status`. Labels that are
/// missing from the latest run have no rows; they only appear as issues.
pub fn export_csv(report: &ComparisonReport) -> Result<String, PerfDiffError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["label", "metric", "baseline", "latest", "difference", "status"])?;

    for row in &report.rows {
        let baseline = row.baseline.to_string();
        let latest = row.latest.to_string();
        let difference = row.difference.to_string();
        writer.write_record([
            row.label.as_str(),
            row.metric.key(),
            baseline.as_str(),
            latest.as_str(),
            difference.as_str(),
            row.status.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PerfDiffError::Render(format!("Failed to flush CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| PerfDiffError::Render(e.to_string()))
}
