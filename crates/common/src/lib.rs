//! Common types and utilities for apigen
//!
//! This crate contains the API model shared by the parser, analyzer and
//! generator crates, the `google.api.http` path template grammar, the
//! generator configuration, and the shared error type.

pub mod config;
mod model;
pub mod naming;
mod path_template;

pub use model::*;
pub use path_template::{PathSegment, PathTemplate, PathVariable};

use thiserror::Error;

/// Errors that can occur while parsing, loading configuration, or generating
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown specification format: {0}")]
    UnknownFormat(String),

    #[error("Invalid path template {template:?}: {reason}")]
    PathTemplate { template: String, reason: String },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_template() {
        let err = GeneratorError::PathTemplate {
            template: "/v1/{name".to_string(),
            reason: "unterminated variable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid path template \"/v1/{name\": unterminated variable"
        );
    }
}
