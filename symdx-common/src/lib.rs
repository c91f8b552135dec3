//! # symdx Common Library
//!
//! Shared code for the symptom diagnosis service:
//! - Error types
//! - Configuration loading
//! - Model capability traits and their JSON artifact formats
//! - Startup artifact loading
//! - Evaluation metrics record

pub mod artifacts;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;

pub use artifacts::{ArtifactSet, LoadError, ModelComponents};
pub use error::{Error, Result};
pub use metrics::Metrics;
