use std::fmt::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{html_escape, write_artifact};
use crate::compare::{ComparisonReport, Metric};
use crate::error::PerfDiffError;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 170.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 150.0;
const GRID_LINES: usize = 5;

const BASELINE_COLOR: &str = "#414487";
const LATEST_COLOR: &str = "#7ad151";

/// Baseline and latest value for one label, already in chart units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub baseline: f64,
    pub latest: f64,
}

/// All points of one metric category; rendered as one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub metric: Metric,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn title(&self) -> String {
        format!("Comparison of {}", self.metric.chart_name())
    }

    fn max_value(&self) -> f64 {
        self.points
            .iter()
            .flat_map(|p| [p.baseline, p.latest])
            .fold(0.0_f64, f64::max)
    }
}

/// Group comparison rows by metric, in report row order.
///
/// Metrics without any matched label are left out.
pub fn build_series(report: &ComparisonReport) -> Vec<ChartSeries> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let scale = metric.chart_scale();
            let points = report
                .rows
                .iter()
                .filter(|row| row.metric == metric)
                .map(|row| ChartPoint {
                    label: row.label.clone(),
                    baseline: row.baseline * scale,
                    latest: row.latest * scale,
                })
                .collect::<Vec<_>>();
            ChartSeries { metric, points }
        })
        .filter(|series| !series.points.is_empty())
        .collect()
}

/// File name for a metric's chart, e.g. `throughput_(req/sec)` becomes
/// `throughput_(req_sec).svg`.
pub fn file_name(metric: Metric) -> String {
    let stem = metric
        .chart_name()
        .replace(' ', "_")
        .replace('/', "_")
        .to_lowercase();
    format!("{stem}.svg")
}

/// Render a grouped bar chart (baseline vs latest per label) as SVG.
pub fn render_svg(series: &ChartSeries) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let axis_y = MARGIN_TOP + plot_h;

    let y_max = nice_ceiling(series.max_value());
    let scale_y = |v: f64| v.max(0.0) / y_max * plot_h;

    let mut body = String::new();

    // Horizontal grid with tick labels.
    for i in 0..=GRID_LINES {
        let value = y_max * i as f64 / GRID_LINES as f64;
        let y = axis_y - scale_y(value);
        let _ = writeln!(
            body,
            r##"  <line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#e5e5e5"/>
  <text x="{tx:.1}" y="{ty:.1}" text-anchor="end" font-size="12">{label}</text>"##,
            x2 = MARGIN_LEFT + plot_w,
            tx = MARGIN_LEFT - 8.0,
            ty = y + 4.0,
            label = format_tick(value),
        );
    }

    let groups = series.points.len().max(1) as f64;
    let group_w = plot_w / groups;
    let bar_w = group_w * 0.8 / 2.0;

    for (i, point) in series.points.iter().enumerate() {
        let group_x = MARGIN_LEFT + group_w * i as f64 + group_w * 0.1;
        for (j, (value, color)) in [(point.baseline, BASELINE_COLOR), (point.latest, LATEST_COLOR)]
            .into_iter()
            .enumerate()
        {
            let h = scale_y(value);
            let _ = writeln!(
                body,
                r#"  <rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{color}"><title>{value}</title></rect>"#,
                x = group_x + bar_w * j as f64,
                y = axis_y - h,
            );
        }

        let label_x = MARGIN_LEFT + group_w * (i as f64 + 0.5);
        let label_y = axis_y + 16.0;
        let _ = writeln!(
            body,
            r#"  <text x="{label_x:.1}" y="{label_y:.1}" text-anchor="end" font-size="12" transform="rotate(-45 {label_x:.1} {label_y:.1})">{label}</text>"#,
            label = html_escape(&point.label),
        );
    }

    let legend_x = WIDTH - MARGIN_RIGHT + 20.0;
    let metric_name = html_escape(series.metric.chart_name());

    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="Arial, sans-serif">
  <rect width="100%" height="100%" fill="#ffffff"/>
  <text x="{title_x:.1}" y="32" text-anchor="middle" font-size="16">{title}</text>
{body}  <line x1="{MARGIN_LEFT}" y1="{axis_y:.1}" x2="{axis_x2:.1}" y2="{axis_y:.1}" stroke="#333333"/>
  <text x="{title_x:.1}" y="{xlabel_y:.1}" text-anchor="middle" font-size="12">Service</text>
  <text x="24" y="{ylabel_y:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 24 {ylabel_y:.1})">{metric_name}</text>
  <text x="{legend_x:.1}" y="{legend_title_y:.1}" font-size="12">Report Type</text>
  <rect x="{legend_x:.1}" y="{legend_base_y:.1}" width="12" height="12" fill="{BASELINE_COLOR}"/>
  <text x="{legend_text_x:.1}" y="{legend_base_text_y:.1}" font-size="12">Baseline</text>
  <rect x="{legend_x:.1}" y="{legend_latest_y:.1}" width="12" height="12" fill="{LATEST_COLOR}"/>
  <text x="{legend_text_x:.1}" y="{legend_latest_text_y:.1}" font-size="12">Latest</text>
</svg>
"##,
        title_x = MARGIN_LEFT + plot_w / 2.0,
        title = html_escape(&series.title()),
        axis_x2 = MARGIN_LEFT + plot_w,
        xlabel_y = HEIGHT - 16.0,
        ylabel_y = MARGIN_TOP + plot_h / 2.0,
        legend_title_y = MARGIN_TOP,
        legend_base_y = MARGIN_TOP + 10.0,
        legend_base_text_y = MARGIN_TOP + 21.0,
        legend_latest_y = MARGIN_TOP + 30.0,
        legend_latest_text_y = MARGIN_TOP + 41.0,
        legend_text_x = legend_x + 18.0,
    )
}

/// Render every series into `dir`, returning the written paths.
pub async fn write_charts(
    report: &ComparisonReport,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, PerfDiffError> {
    let dir = dir.as_ref();
    let mut written = Vec::new();
    for series in build_series(report) {
        let path = write_artifact(dir.join(file_name(series.metric)), &render_svg(&series)).await?;
        tracing::info!("Generated chart: {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Round up to 1, 2 or 5 times a power of ten, leaving headroom above `max`.
fn nice_ceiling(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let target = max * 1.05;
    let magnitude = 10f64.powf(target.log10().floor());
    let normalized = target / magnitude;
    let step = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
