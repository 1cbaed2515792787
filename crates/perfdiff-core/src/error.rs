use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum PerfDiffError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid format in {source_name}: {message}")]
    InvalidFormat {
        source_name: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Render error: {0}")]
    Render(String),
}

impl PerfDiffError {
    pub fn invalid_format(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl Serialize for PerfDiffError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
