//! Error types for medusa.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MedusaError`].
pub type Result<T> = std::result::Result<T, MedusaError>;

/// Errors that can occur while generating, validating or exporting a creature.
#[derive(Error, Debug)]
pub enum MedusaError {
    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// A linear remap was requested over an input range of zero width.
    #[error("cannot remap from degenerate range [{start}, {end}]")]
    DegenerateRange {
        /// Start of the input range.
        start: f64,
        /// End of the input range.
        end: f64,
    },

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The triangle index.
        triangle: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// The index buffer does not hold whole triangles.
    #[error("index buffer length {len} is not a multiple of 3")]
    IncompleteTriangle {
        /// Length of the index buffer.
        len: usize,
    },

    /// A per-vertex attribute buffer does not match the vertex count.
    #[error("{attribute} buffer has {found} entries, expected {expected}")]
    AttributeMismatch {
        /// Attribute name.
        attribute: &'static str,
        /// Number of vertices.
        expected: usize,
        /// Number of attribute entries.
        found: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Error reading or writing a configuration file.
    #[error("configuration error in {path}: {message}")]
    Config {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl MedusaError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MedusaError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
