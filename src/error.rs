//! Unified error handling for the fieldplan crate
//!
//! This module provides a unified error type that consolidates the
//! pipeline-specific errors into a single `Error` enum, while keeping the
//! sampling module usable on its own with its local [`SamplerError`].

use std::io;
use thiserror::Error;

// Re-export the domain-specific error for convenience
pub use crate::sampling::error::SamplerError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Configuration and validation errors
    Config,
    /// Storage and I/O errors
    Storage,
    /// Serialization errors
    Serialization,
}

/// Unified error type for the fieldplan crate
///
/// Wraps the sampling-pipeline errors and the I/O and serialization errors
/// of the export layer, providing a single error type across module
/// boundaries while preserving the detailed error information.
#[derive(Error, Debug)]
pub enum Error {
    /// Sampling pipeline errors (calendar, sizing policy, hour domain)
    #[error("Sampler error: {0}")]
    Sampler(#[from] SamplerError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error category for handling strategies
    ///
    /// Every [`SamplerError`] is a configuration problem: the pipeline
    /// itself never performs I/O or serialization.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Sampler(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) | Self::Csv(_) => ErrorCategory::Serialization,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
