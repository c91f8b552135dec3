//! Model capability traits
//!
//! The service only ever talks to these three traits. The concrete types in
//! the submodules are the JSON artifact formats produced by the offline
//! training job; tests substitute their own implementations.

mod label_encoder;
mod linear;
mod tfidf;

pub use label_encoder::IndexLabelEncoder;
pub use linear::LinearClassifier;
pub use tfidf::{Norm, TfidfVectorizer};

use crate::Result;

/// Dense numeric representation of one document
pub type FeatureVector = Vec<f64>;

/// Maps raw text to feature vectors using a vocabulary fixed at training time
pub trait Vectorizer: Send + Sync {
    fn transform(&self, documents: &[&str]) -> Result<Vec<FeatureVector>>;
}

/// Maps feature vectors to numeric label ids
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<usize>>;
}

/// Maps numeric label ids back to label strings
pub trait LabelEncoder: Send + Sync {
    fn inverse_transform(&self, ids: &[usize]) -> Result<Vec<String>>;
}

/// Structural check run once after an artifact is decoded
pub trait Artifact {
    fn validate(&self) -> Result<()>;
}
