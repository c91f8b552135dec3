//! Startup artifact loading
//!
//! Each of the three model artifacts is loaded independently. A failed load
//! is logged and recorded; it never stops the others or the process. Only a
//! complete set yields [`ModelComponents`] for the prediction route.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::ArtifactPaths;
use crate::model::{
    Artifact, Classifier, IndexLabelEncoder, LabelEncoder, LinearClassifier, TfidfVectorizer,
    Vectorizer,
};
use crate::{Error, Result};

/// Failure to load one artifact
#[derive(Debug, Error)]
#[error("{component} ({}): {source}", path.display())]
pub struct LoadError {
    pub component: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: Error,
}

/// Outcome of loading one artifact
pub type LoadResult<T> = std::result::Result<Arc<T>, LoadError>;

/// Read, decode and validate a JSON artifact
pub fn read_artifact<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Artifact,
{
    let bytes = std::fs::read(path)?;
    let artifact: T = serde_json::from_slice(&bytes)?;
    artifact.validate()?;
    Ok(artifact)
}

fn load_logged<T, D>(
    component: &'static str,
    path: &Path,
    erase: fn(T) -> Arc<D>,
) -> LoadResult<D>
where
    T: DeserializeOwned + Artifact,
    D: ?Sized,
{
    info!("Loading {}...", component);
    debug!("{} path: {}", component, path.display());

    match read_artifact::<T>(path) {
        Ok(artifact) => {
            info!("✓ {} loaded", component);
            Ok(erase(artifact))
        }
        Err(source) => {
            let err = LoadError {
                component,
                path: path.to_path_buf(),
                source,
            };
            error!("Error loading {}: {}", component, err);
            Err(err)
        }
    }
}

/// Load the classifier artifact
pub fn load_classifier(path: &Path) -> LoadResult<dyn Classifier> {
    load_logged("model", path, |c: LinearClassifier| -> Arc<dyn Classifier> {
        Arc::new(c)
    })
}

/// Load the vectorizer artifact
pub fn load_vectorizer(path: &Path) -> LoadResult<dyn Vectorizer> {
    load_logged("vectorizer", path, |v: TfidfVectorizer| -> Arc<dyn Vectorizer> {
        Arc::new(v)
    })
}

/// Load the label encoder artifact
pub fn load_label_encoder(path: &Path) -> LoadResult<dyn LabelEncoder> {
    load_logged("label_encoder", path, |e: IndexLabelEncoder| -> Arc<dyn LabelEncoder> {
        Arc::new(e)
    })
}

/// Per-component load outcomes
pub struct ArtifactSet {
    pub classifier: LoadResult<dyn Classifier>,
    pub vectorizer: LoadResult<dyn Vectorizer>,
    pub label_encoder: LoadResult<dyn LabelEncoder>,
}

impl ArtifactSet {
    /// Load all three artifacts, each independently of the others
    pub fn load(paths: &ArtifactPaths) -> Self {
        Self {
            classifier: load_classifier(&paths.classifier),
            vectorizer: load_vectorizer(&paths.vectorizer),
            label_encoder: load_label_encoder(&paths.label_encoder),
        }
    }

    /// The complete triple, or `None` if any component failed to load
    pub fn components(&self) -> Option<ModelComponents> {
        match (&self.classifier, &self.vectorizer, &self.label_encoder) {
            (Ok(classifier), Ok(vectorizer), Ok(label_encoder)) => Some(ModelComponents {
                classifier: Arc::clone(classifier),
                vectorizer: Arc::clone(vectorizer),
                label_encoder: Arc::clone(label_encoder),
            }),
            _ => None,
        }
    }

    /// Names of components that failed to load
    pub fn missing(&self) -> Vec<&'static str> {
        [
            self.classifier.as_ref().err(),
            self.vectorizer.as_ref().err(),
            self.label_encoder.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .map(|e| e.component)
        .collect()
    }
}

/// A complete, loaded model: vectorizer → classifier → label encoder
#[derive(Clone)]
pub struct ModelComponents {
    pub classifier: Arc<dyn Classifier>,
    pub vectorizer: Arc<dyn Vectorizer>,
    pub label_encoder: Arc<dyn LabelEncoder>,
}

impl ModelComponents {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        vectorizer: Arc<dyn Vectorizer>,
        label_encoder: Arc<dyn LabelEncoder>,
    ) -> Self {
        Self {
            classifier,
            vectorizer,
            label_encoder,
        }
    }

    /// Predict the diagnosis label for one free-text symptom description
    ///
    /// Errors from any stage surface as [`Error::Inference`].
    pub fn diagnose(&self, symptoms: &str) -> Result<String> {
        let features = self.vectorizer.transform(&[symptoms]).map_err(into_inference)?;
        let ids = self.classifier.predict(&features).map_err(into_inference)?;
        let labels = self
            .label_encoder
            .inverse_transform(&ids)
            .map_err(into_inference)?;

        labels
            .into_iter()
            .next()
            .ok_or_else(|| Error::Inference("label encoder returned no labels".to_string()))
    }
}

fn into_inference(err: Error) -> Error {
    match err {
        Error::Inference(_) => err,
        other => Error::Inference(other.to_string()),
    }
}
