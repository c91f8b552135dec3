use serde::Deserialize;
use std::collections::HashMap;

use super::{Artifact, FeatureVector, Vectorizer};
use crate::{Error, Result};

/// Row normalization applied after idf weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    #[serde(rename = "none")]
    Off,
}

/// TF-IDF vectorizer artifact
///
/// Tokens are runs of two or more word characters (alphanumeric or `_`).
/// Terms outside `vocabulary` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    /// Term → feature column
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
    /// Inclusive word n-gram range
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

impl TfidfVectorizer {
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            lowercase: true,
            sublinear_tf: false,
            norm: Norm::L2,
            ngram_range: default_ngram_range(),
        }
    }

    /// Width of the produced feature vectors
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    fn tokenize(&self, document: &str) -> Vec<String> {
        let text = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };

        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .map(str::to_string)
            .collect()
    }

    fn terms(&self, tokens: &[String]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n {
            if n == 1 {
                terms.extend(tokens.iter().cloned());
            } else {
                terms.extend(tokens.windows(n).map(|w| w.join(" ")));
            }
        }
        terms
    }

    fn vectorize(&self, document: &str) -> FeatureVector {
        let mut row: FeatureVector = vec![0.0f64; self.n_features()];
        for term in self.terms(&self.tokenize(document)) {
            if let Some(&column) = self.vocabulary.get(&term) {
                row[column] += 1.0;
            }
        }

        for (column, value) in row.iter_mut().enumerate() {
            if *value > 0.0 {
                let tf = if self.sublinear_tf {
                    1.0 + value.ln()
                } else {
                    *value
                };
                *value = tf * self.idf[column];
            }
        }

        if self.norm == Norm::L2 {
            let length = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            if length > 0.0 {
                row.iter_mut().for_each(|v| *v /= length);
            }
        }
        row
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, documents: &[&str]) -> Result<Vec<FeatureVector>> {
        Ok(documents.iter().map(|doc| self.vectorize(doc)).collect())
    }
}

impl Artifact for TfidfVectorizer {
    fn validate(&self) -> Result<()> {
        if let Some((term, column)) = self
            .vocabulary
            .iter()
            .find(|(_, column)| **column >= self.idf.len())
        {
            return Err(Error::Artifact(format!(
                "vocabulary term '{}' maps to column {} but idf has {} entries",
                term,
                column,
                self.idf.len()
            )));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::Artifact(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }
        Ok(())
    }
}
