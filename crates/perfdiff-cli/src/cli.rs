use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use perfdiff_core::config::{DEFAULT_BASE_DIR, DEFAULT_TEST_NAME};
use perfdiff_core::ReportPaths;

#[derive(Debug, Parser)]
#[command(
    name = "perfdiff",
    version,
    about = "Compare a latest performance metrics snapshot against its baseline"
)]
pub struct Cli {
    /// Build directory that contains `<test-name>Test/`
    #[arg(long, env = "AGENT_BUILDDIRECTORY", default_value = DEFAULT_BASE_DIR, global = true)]
    pub base_dir: String,

    /// Performance test name; the test directory is `<base-dir>/<test-name>Test`
    #[arg(long, env = "PerformanceTestName", default_value = DEFAULT_TEST_NAME, global = true)]
    pub test_name: String,

    /// Override the baseline document (default: `json/baseline.json`)
    #[arg(long, global = true)]
    pub baseline: Option<PathBuf>,

    /// Override the latest document (default: `charts/Dashboard/statistics.json`)
    #[arg(long, global = true)]
    pub latest: Option<PathBuf>,

    /// Reject documents that repeat a label instead of keeping the last record
    #[arg(long, global = true)]
    pub strict_labels: bool,

    /// Exit with status 1 when any issue is found
    #[arg(long, global = true)]
    pub fail_on_issues: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the issue list to the console (default)
    Check,
    /// Write `comparison_report.html` into the test directory
    Html,
    /// Write one SVG bar chart per metric into the charts directory
    Charts,
    /// Print or write the comparison as JSON or CSV
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Check)
    }

    pub fn report_paths(&self) -> ReportPaths {
        let mut paths = ReportPaths::new(&self.base_dir, &self.test_name);
        if let Some(baseline) = &self.baseline {
            paths = paths.with_baseline_file(baseline);
        }
        if let Some(latest) = &self.latest {
            paths = paths.with_latest_file(latest);
        }
        paths
    }
}
