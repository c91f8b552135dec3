//! Dashboard page
//!
//! GET /dashboard shows model accuracy, the per-label example counts and
//! the chart generated at startup.

use axum::{extract::State, response::Html};
use rand::Rng;
use symdx_common::Metrics;

use crate::AppState;

/// Values rendered on the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Accuracy percentage rounded to two decimals
    pub accuracy: f64,
    /// Label → count in file order
    pub label_counts: Vec<(String, i64)>,
    /// Chart image URL; may point at a file that was never generated
    pub chart_url: String,
    /// Random query value so browsers refetch a regenerated chart
    pub cache_bust: u32,
}

impl DashboardView {
    pub fn new(metrics: &Metrics, chart_url: String, rng: &mut impl Rng) -> Self {
        Self {
            accuracy: metrics.accuracy_percent(),
            label_counts: metrics.label_counts().to_vec(),
            chart_url,
            cache_bust: rng.gen(),
        }
    }

    /// Chart URL with the cache-busting query
    pub fn chart_src(&self) -> String {
        format!("{}?v={}", self.chart_url, self.cache_bust)
    }

    pub fn render(&self) -> String {
        let rows = if self.label_counts.is_empty() {
            r#"<tr><td colspan="2" class="empty">No label distribution available</td></tr>"#
                .to_string()
        } else {
            self.label_counts
                .iter()
                .map(|(label, count)| {
                    format!(
                        "<tr><td>{}</td><td class=\"count\">{}</td></tr>",
                        escape_html(label),
                        count
                    )
                })
                .collect::<Vec<_>>()
                .join("\n            ")
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Symptom Diagnosis - Dashboard</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #f4f7f7;
            color: #1f2d2d;
            margin: 0;
            padding: 30px;
        }}
        .container {{
            max-width: 1000px;
            margin: 0 auto;
        }}
        .accuracy {{
            font-size: 42px;
            font-weight: 600;
            color: #008080;
        }}
        table {{
            border-collapse: collapse;
            margin-top: 20px;
        }}
        td {{
            padding: 6px 16px;
            border-bottom: 1px solid #d0dede;
        }}
        td.count {{
            text-align: right;
        }}
        td.empty {{
            color: #7a8a8a;
        }}
        img {{
            max-width: 100%;
            margin-top: 20px;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Model Dashboard</h1>
        <p><a href="/">&larr; Back to diagnosis</a></p>
        <h2>Accuracy</h2>
        <div class="accuracy" id="accuracy">{accuracy}%</div>
        <h2>Label Distribution</h2>
        <img src="{chart_src}" alt="Diagnosis Label Distribution">
        <table id="label-counts">
            {rows}
        </table>
    </div>
</body>
</html>
"#,
            accuracy = self.accuracy,
            chart_src = escape_html(&self.chart_src()),
            rows = rows,
        )
    }
}

/// GET /dashboard
pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let view = DashboardView::new(&state.metrics, state.chart_url(), &mut rand::thread_rng());
    Html(view.render())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
