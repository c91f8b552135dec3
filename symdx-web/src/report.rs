//! Startup report: label distribution bar chart
//!
//! Rendered once before the listener starts, as SVG, to
//! `<static_dir>/chart.svg`. Each startup overwrites the previous chart.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use symdx_common::{Metrics, Result};
use tracing::{info, warn};

/// Chart file name inside the static directory
pub const CHART_FILE: &str = "chart.svg";

pub const CHART_TITLE: &str = "Diagnosis Label Distribution";

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const BAR_COLOR: &str = "teal";
/// Rough glyph advance at 12px, used to size the rotated label band
const LABEL_CHAR_WIDTH: f64 = 6.5;

/// One bar of the chart
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub count: i64,
}

/// Vertical bar chart with rotated category labels
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Chart of the label distribution; `None` when it is absent or empty
    pub fn from_metrics(metrics: &Metrics) -> Option<Self> {
        let distribution = metrics.label_distribution.as_ref()?;
        if distribution.is_empty() {
            return None;
        }

        Some(Self {
            title: CHART_TITLE.to_string(),
            bars: distribution
                .iter()
                .map(|(label, count)| Bar {
                    label: label.clone(),
                    count: *count,
                })
                .collect(),
        })
    }

    pub fn render_svg(&self) -> String {
        let longest = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0) as f64;
        // Labels run down-left at 45°, so their vertical extent is len·sin(45°)
        let margin_bottom = (longest * LABEL_CHAR_WIDTH * std::f64::consts::FRAC_1_SQRT_2 + 30.0)
            .clamp(60.0, HEIGHT / 2.0);

        let plot_left = MARGIN_LEFT;
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_bottom = HEIGHT - margin_bottom;
        let plot_height = plot_bottom - MARGIN_TOP;

        // Axis math stays in f64 so counts near i64::MAX cannot overflow
        let max_count = self
            .bars
            .iter()
            .map(|b| b.count.max(0) as f64)
            .fold(1.0, f64::max);
        let step = tick_step(max_count);
        let intervals = (max_count / step).ceil().max(1.0);
        let scale = plot_height / (intervals * step);

        let slot = plot_width / self.bars.len().max(1) as f64;
        let bar_width = slot * 0.8;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = WIDTH,
            h = HEIGHT
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text class="title" x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{}</text>"#,
            WIDTH / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            escape_xml(&self.title)
        );

        // Y axis with gridlines
        for i in 0..=(intervals as usize) {
            let tick = i as f64 * step;
            let y = plot_bottom - tick * scale;
            let _ = writeln!(
                svg,
                "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e0e0e0\"/>",
                plot_left,
                plot_left + plot_width,
                y = y
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{}</text>"#,
                plot_left - 8.0,
                y + 4.0,
                tick
            );
        }

        for (i, bar) in self.bars.iter().enumerate() {
            let center = plot_left + slot * (i as f64 + 0.5);
            let height = bar.count.max(0) as f64 * scale;
            let _ = writeln!(
                svg,
                r#"<rect class="bar" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"#,
                center - bar_width / 2.0,
                plot_bottom - height,
                bar_width,
                height,
                BAR_COLOR,
                escape_xml(&bar.label),
                bar.count
            );
            // Anchored at the end so rotated labels right-align under the bar
            let label_y = plot_bottom + 14.0;
            let _ = writeln!(
                svg,
                r#"<text class="label" x="{x:.1}" y="{y:.1}" text-anchor="end" font-size="12" transform="rotate(-45 {x:.1} {y:.1})">{}</text>"#,
                escape_xml(&bar.label),
                x = center,
                y = label_y
            );
        }

        let _ = writeln!(
            svg,
            r#"<line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/>"#,
            l = plot_left,
            r = plot_left + plot_width,
            b = plot_bottom
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/>"#,
            l = plot_left,
            t = MARGIN_TOP,
            b = plot_bottom
        );
        svg.push_str("</svg>\n");
        svg
    }
}

/// Render the label distribution chart into `static_dir`
///
/// Returns `Ok(None)` without touching the filesystem when the metrics
/// carry no label distribution.
pub fn generate_chart(metrics: &Metrics, static_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(chart) = BarChart::from_metrics(metrics) else {
        warn!("No label_distribution found in metrics. Skipping chart generation.");
        return Ok(None);
    };

    if !static_dir.exists() {
        std::fs::create_dir_all(static_dir)?;
    }

    let chart_path = static_dir.join(CHART_FILE);
    std::fs::write(&chart_path, chart.render_svg())?;
    info!(
        "✓ Chart saved at: {} ({} labels)",
        chart_path.display(),
        chart.bars.len()
    );
    Ok(Some(chart_path))
}

/// 1, 2 or 5 × 10ⁿ so the axis has at most five intervals
fn tick_step(max: f64) -> f64 {
    let raw = (max / 5.0).max(1.0);
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);
    step.max(1.0)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
