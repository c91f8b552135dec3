//! Evaluation metrics record
//!
//! Loaded once at startup from the training job's `metrics.json`:
//!
//! ```json
//! {"accuracy": 0.8734, "label_distribution": {"flu": 10, "cold": 5}}
//! ```
//!
//! Nothing here fails the caller. A missing or malformed file yields an
//! empty record, and individual fields that cannot be read are dropped with
//! a warning.

use serde_json::Value;
use std::path::Path;
use tracing::{error, info, warn};

use crate::Result;

/// Accuracy and per-label example counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    /// Fraction in `[0, 1]`
    pub accuracy: Option<f64>,
    /// Label → count, in file order
    pub label_distribution: Option<Vec<(String, i64)>>,
}

impl Metrics {
    /// Load metrics from a JSON file, degrading to an empty record
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(metrics) => {
                info!("✓ Metrics loaded from {}", path.display());
                metrics
            }
            Err(e) => {
                error!("Error loading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse metrics JSON text
    ///
    /// Only invalid JSON is an error; unexpected shapes degrade.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Ok(Self::from_value(&value))
    }

    /// Extract metrics from an already parsed JSON value
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            warn!("Metrics document is not a JSON object, ignoring it");
            return Self::default();
        };

        let accuracy = match object.get("accuracy") {
            None => None,
            Some(v) => {
                let accuracy = coerce_float(v);
                if accuracy.is_none() {
                    warn!("Ignoring non-numeric accuracy value: {}", v);
                }
                accuracy
            }
        };

        let label_distribution = match object.get("label_distribution") {
            None => None,
            Some(Value::Object(map)) => Some(
                map.iter()
                    .filter_map(|(label, count)| match coerce_count(count) {
                        Some(n) => Some((label.clone(), n)),
                        None => {
                            warn!("Dropping label '{}' with non-integer count {}", label, count);
                            None
                        }
                    })
                    .collect(),
            ),
            Some(other) => {
                warn!("Ignoring label_distribution that is not an object: {}", other);
                None
            }
        };

        Self {
            accuracy,
            label_distribution,
        }
    }

    /// Accuracy × 100 rounded to two decimals; 0 when absent
    pub fn accuracy_percent(&self) -> f64 {
        let percent = self.accuracy.unwrap_or(0.0) * 100.0;
        (percent * 100.0).round() / 100.0
    }

    /// Label counts, empty when absent
    pub fn label_counts(&self) -> &[(String, i64)] {
        self.label_distribution.as_deref().unwrap_or(&[])
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Integer coercion: floats truncate toward zero, numeric strings parse,
/// booleans map to 0/1
fn coerce_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
