use serde::Deserialize;

use super::{Artifact, LabelEncoder};
use crate::{Error, Result};

/// Label encoder artifact: label id `i` decodes to `classes[i]`
#[derive(Debug, Clone, Deserialize)]
pub struct IndexLabelEncoder {
    pub classes: Vec<String>,
}

impl IndexLabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }
}

impl LabelEncoder for IndexLabelEncoder {
    fn inverse_transform(&self, ids: &[usize]) -> Result<Vec<String>> {
        let unseen: Vec<String> = ids
            .iter()
            .filter(|id| **id >= self.classes.len())
            .map(|id| id.to_string())
            .collect();
        if !unseen.is_empty() {
            return Err(Error::Inference(format!(
                "y contains previously unseen labels: [{}]",
                unseen.join(", ")
            )));
        }

        Ok(ids.iter().map(|id| self.classes[*id].clone()).collect())
    }
}

impl Artifact for IndexLabelEncoder {
    fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(Error::Artifact("label encoder has no classes".to_string()));
        }
        Ok(())
    }
}
