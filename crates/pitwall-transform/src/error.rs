//! Error type for the feature pipeline.

use pitwall_model::{ConfigError, SchemaError};
use thiserror::Error;

/// Fatal pipeline errors. Per-record parse problems are not errors here; they
/// are collected as [`pitwall_model::ParseIssue`]s.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
