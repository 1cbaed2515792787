use std::path::Path;

use chrono::Local;

use perfdiff_core::report::{chart, console, export, html, write_artifact};
use perfdiff_core::{
    compare_documents, load_document, ComparisonReport, MetricsDocument, PerfDiffError, ReportPaths,
    Thresholds,
};

use crate::cli::{Cli, Command, ExportFormat};

/// Result of a successful run, used to pick the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub has_issues: bool,
}

pub async fn run(cli: &Cli, paths: &ReportPaths) -> Result<Outcome, PerfDiffError> {
    match cli.command() {
        Command::Check => check(cli, paths).await,
        Command::Html => write_html(cli, paths).await,
        Command::Charts => write_charts(cli, paths).await,
        Command::Export { format, output } => export_report(cli, paths, format, output.as_deref()).await,
    }
}

async fn load_pair(
    paths: &ReportPaths,
    strict_labels: bool,
) -> Result<(MetricsDocument, MetricsDocument), PerfDiffError> {
    tracing::info!("Loading baseline and latest data");
    let baseline = load_document(&paths.baseline_file).await?;
    let latest = load_document(&paths.latest_file).await?;

    if strict_labels {
        baseline.ensure_unique_labels(&paths.baseline_file.display().to_string())?;
        latest.ensure_unique_labels(&paths.latest_file.display().to_string())?;
    }
    Ok((baseline, latest))
}

async fn compare(cli: &Cli, paths: &ReportPaths) -> Result<ComparisonReport, PerfDiffError> {
    let (baseline, latest) = load_pair(paths, cli.strict_labels).await?;
    let report = compare_documents(&baseline, &latest, &Thresholds::default());
    if !report.ignored_labels.is_empty() {
        tracing::info!(
            labels = ?report.ignored_labels,
            "labels only present in the latest results are not compared"
        );
    }
    Ok(report)
}

async fn check(cli: &Cli, paths: &ReportPaths) -> Result<Outcome, PerfDiffError> {
    print!("{}", console::render_paths(paths));

    let report = compare(cli, paths).await?;
    print!("{}", console::render_issues(&report));

    Ok(Outcome {
        has_issues: report.has_issues(),
    })
}

async fn write_html(cli: &Cli, paths: &ReportPaths) -> Result<Outcome, PerfDiffError> {
    print!("{}", console::render_paths(paths));
    println!("HTML Report: {}", paths.html_report.display());

    let report = compare(cli, paths).await?;
    let page = html::render(&report, Local::now().naive_local());
    let written = write_artifact(&paths.html_report, &page).await?;
    println!("HTML report generated: {}", written.display());

    print!("{}", console::render_issues(&report));

    Ok(Outcome {
        has_issues: report.has_issues(),
    })
}

async fn write_charts(cli: &Cli, paths: &ReportPaths) -> Result<Outcome, PerfDiffError> {
    tracing::info!("Starting performance comparison");
    tracing::info!("Base directory: {}", paths.base_dir.display());
    tracing::info!("Performance test name: {}", paths.test_name);
    tracing::info!("Test directory: {}", paths.test_dir.display());
    tracing::info!("Charts directory: {}", paths.charts_dir.display());
    tracing::info!("Baseline file: {}", paths.baseline_file.display());
    tracing::info!("Latest file: {}", paths.latest_file.display());

    let report = compare(cli, paths).await?;

    tracing::info!("Preparing comparison data");
    if chart::build_series(&report).is_empty() {
        tracing::warn!("No data available for comparison");
    } else {
        tracing::info!("Generating comparison charts");
        chart::write_charts(&report, &paths.charts_dir).await?;
        tracing::info!("Charts have been generated in: {}", paths.charts_dir.display());
    }

    Ok(Outcome {
        has_issues: report.has_issues(),
    })
}

async fn export_report(
    cli: &Cli,
    paths: &ReportPaths,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<Outcome, PerfDiffError> {
    let report = compare(cli, paths).await?;
    let content = match format {
        ExportFormat::Json => export::export_json(&report)?,
        ExportFormat::Csv => export::export_csv(&report)?,
    };

    match output {
        Some(path) => {
            let written = write_artifact(path, &content).await?;
            tracing::info!("Exported comparison to {}", written.display());
        }
        None => print!("{content}"),
    }

    Ok(Outcome {
        has_issues: report.has_issues(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const BASELINE: &str = r#"{"metrics":[
        {"label":"Svc","averageResponseTime":100,"errorRate":0.02,"throughput":50},
        {"label":"Gone","averageResponseTime":10,"errorRate":0.0,"throughput":5}
    ]}"#;
    const LATEST: &str = r#"{"metrics":[
        {"label":"Svc","averageResponseTime":115,"errorRate":0.02,"throughput":50}
    ]}"#;

    /// Lay out `<dir>/PerfTest/...` with the given documents.
    async fn setup(dir: &Path, baseline: &str, latest: &str) -> ReportPaths {
        let paths = ReportPaths::new(dir.display().to_string(), "Perf");
        write_artifact(&paths.baseline_file, baseline)
            .await
            .expect("baseline should be written");
        write_artifact(&paths.latest_file, latest)
            .await
            .expect("latest should be written");
        paths
    }

    fn cli_for(paths: &ReportPaths, extra: &[&str]) -> Cli {
        let base = paths.base_dir.display().to_string();
        let mut args = vec!["perfdiff", "--base-dir", base.as_str(), "--test-name", "Perf"];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[tokio::test]
    async fn check_reports_issues() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let paths = setup(dir.path(), BASELINE, LATEST).await;
        let cli = cli_for(&paths, &["check"]);
        let outcome = run(&cli, &cli.report_paths()).await.expect("check should succeed");
        assert!(outcome.has_issues);
    }

    #[tokio::test]
    async fn check_clean_when_identical() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let paths = setup(dir.path(), BASELINE, BASELINE).await;
        let cli = cli_for(&paths, &[]);
        let outcome = run(&cli, &cli.report_paths()).await.expect("check should succeed");
        assert!(!outcome.has_issues);
    }

    #[tokio::test]
    async fn missing_baseline_is_file_not_found() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let paths = ReportPaths::new(dir.path().display().to_string(), "Perf");
        let cli = cli_for(&paths, &["check"]);
        let err = run(&cli, &cli.report_paths()).await.unwrap_err();
        assert!(matches!(err, PerfDiffError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn html_writes_report_file() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let paths = setup(dir.path(), BASELINE, LATEST).await;
        let cli = cli_for(&paths, &["html"]);
        run(&cli, &cli.report_paths()).await.expect("html should succeed");

        let page = tokio::fs::read_to_string(&paths.html_report)
            .await
            .expect("report should exist");
        assert!(page.contains("<tr class=\"worse\">"));
        assert!(page.contains("Gone: Missing in latest results."));
    }

    #[tokio::test]
    async fn charts_writes_svg_files() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let paths = setup(dir.path(), BASELINE, LATEST).await;
        let cli = cli_for(&paths, &["charts"]);
        run(&cli, &cli.report_paths()).await.expect("charts should succeed");
        assert!(paths.charts_dir.join("average_response_time_(ms).svg").exists());
        assert!(paths.charts_dir.join("error_rate_(%).svg").exists());
        assert!(paths.charts_dir.join("throughput_(req_sec).svg").exists());
    }

    #[tokio::test]
    async fn charts_with_no_matches_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let paths = setup(dir.path(), BASELINE, r#"{"metrics":[]}"#).await;
        let cli = cli_for(&paths, &["charts"]);
        let outcome = run(&cli, &cli.report_paths()).await.expect("charts should succeed");
        assert!(outcome.has_issues);
        assert!(!paths.charts_dir.join("average_response_time_(ms).svg").exists());
    }

    #[tokio::test]
    async fn export_csv_to_file() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let paths = setup(dir.path(), BASELINE, LATEST).await;
        let out = dir.path().join("out").join("cmp.csv");
        let out_str = out.display().to_string();
        let cli = cli_for(&paths, &["export", "--format", "csv", "--output", out_str.as_str()]);
        run(&cli, &cli.report_paths()).await.expect("export should succeed");

        let csv = tokio::fs::read_to_string(&out).await.expect("csv should exist");
        assert!(csv.starts_with("label,metric,baseline,latest,difference,status"));
        assert_eq!(csv.lines().count(), 1 + 3);
    }

    #[tokio::test]
    async fn strict_labels_rejects_duplicates() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let dup = r#"{"metrics":[
            {"label":"Svc","averageResponseTime":1,"errorRate":0,"throughput":1},
            {"label":"Svc","averageResponseTime":2,"errorRate":0,"throughput":1}
        ]}"#;
        let paths = setup(dir.path(), dup, LATEST).await;

        let lenient = cli_for(&paths, &["check"]);
        assert!(run(&lenient, &lenient.report_paths()).await.is_ok());

        let strict = cli_for(&paths, &["check", "--strict-labels"]);
        let err = run(&strict, &strict.report_paths()).await.unwrap_err();
        assert!(matches!(err, PerfDiffError::InvalidFormat { .. }));
    }

    #[tokio::test]
    async fn missing_field_is_invalid_format() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let bad = r#"{"metrics":[{"label":"Svc","averageResponseTime":1,"errorRate":0}]}"#;
        let paths = setup(dir.path(), BASELINE, bad).await;
        let cli = cli_for(&paths, &[]);
        let err = run(&cli, &cli.report_paths()).await.unwrap_err();
        assert!(err.to_string().contains("throughput"));
    }
}
