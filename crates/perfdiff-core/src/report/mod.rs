//! Renderers for a [`ComparisonReport`](crate::compare::ComparisonReport):
//! console text, a standalone HTML page, SVG bar charts, and JSON/CSV export.

pub mod chart;
pub mod console;
pub mod export;
pub mod html;

use std::path::{Path, PathBuf};

use crate::error::PerfDiffError;

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Write a rendered artifact, creating parent directories as needed.
pub async fn write_artifact(path: impl AsRef<Path>, content: &str) -> Result<PathBuf, PerfDiffError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    tracing::debug!("Wrote {}", path.display());
    Ok(path.to_path_buf())
}
