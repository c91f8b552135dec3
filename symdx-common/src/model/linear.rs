use serde::Deserialize;

use super::{Artifact, Classifier, FeatureVector};
use crate::{Error, Result};

/// Linear one-vs-rest classifier artifact
///
/// `coef` holds one weight row per class. A single row is a binary model:
/// a positive score selects `classes[1]`, otherwise `classes[0]`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    /// Label ids emitted by the model; defaults to `0..n_classes`
    #[serde(default)]
    pub classes: Vec<usize>,
}

impl LinearClassifier {
    pub fn new(coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> Self {
        Self {
            coef,
            intercept,
            classes: Vec::new(),
        }
    }

    /// Width of the feature vectors this model accepts
    pub fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    fn n_classes(&self) -> usize {
        if self.coef.len() == 1 {
            2
        } else {
            self.coef.len()
        }
    }

    fn class_id(&self, index: usize) -> usize {
        self.classes.get(index).copied().unwrap_or(index)
    }

    fn decision(&self, x: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<usize>> {
        let expected = self.n_features();
        features
            .iter()
            .map(|x| {
                if x.len() != expected {
                    return Err(Error::Inference(format!(
                        "X has {} features, but LinearClassifier is expecting {} features as input",
                        x.len(),
                        expected
                    )));
                }

                let scores = self.decision(x);
                let index = if scores.len() == 1 {
                    usize::from(scores[0] > 0.0)
                } else {
                    // First maximum wins on ties
                    scores
                        .iter()
                        .enumerate()
                        .fold((0, f64::NEG_INFINITY), |best, (i, s)| {
                            if *s > best.1 {
                                (i, *s)
                            } else {
                                best
                            }
                        })
                        .0
                };
                Ok(self.class_id(index))
            })
            .collect()
    }
}

impl Artifact for LinearClassifier {
    fn validate(&self) -> Result<()> {
        if self.coef.is_empty() {
            return Err(Error::Artifact("classifier has no coefficients".to_string()));
        }
        let width = self.n_features();
        if self.coef.iter().any(|row| row.len() != width) {
            return Err(Error::Artifact(
                "classifier coefficient rows differ in length".to_string(),
            ));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(Error::Artifact(format!(
                "classifier has {} intercepts for {} coefficient rows",
                self.intercept.len(),
                self.coef.len()
            )));
        }
        if !self.classes.is_empty() && self.classes.len() != self.n_classes() {
            return Err(Error::Artifact(format!(
                "classifier lists {} classes, expected {}",
                self.classes.len(),
                self.n_classes()
            )));
        }
        Ok(())
    }
}
