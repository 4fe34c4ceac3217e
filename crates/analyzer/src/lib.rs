//! API model analysis for apigen
//!
//! Turns the preliminary model produced by a raw parser into the fully
//! resolved model the generators consume.
//!
//! # Examples
//!
//! ```no_run
//! use apigen_analyzer::ModelBuilder;
//! use apigen_common::config::GeneratorConfig;
//! use apigen_parser::parser_for;
//! use std::path::Path;
//!
//! let config = GeneratorConfig::load(Path::new("apigen.yaml")).expect("config");
//! let parser = parser_for(&config).expect("parser");
//! let api = ModelBuilder::new(&config).build(parser.as_ref()).expect("model");
//!
//! for service in &api.services {
//!     println!("{service}");
//! }
//! ```

mod analyzer;
mod cross_reference;
mod filters;
mod pagination;
mod recursive;
mod resource_names;
mod samples;
mod standard_methods;
mod validate;

pub use analyzer::{create_model, ModelBuilder};
pub use cross_reference::cross_reference;
pub use filters::{apply_api_overrides, apply_documentation_overrides, apply_filters};
pub use pagination::update_method_pagination;
pub use recursive::label_recursive_fields;
pub use resource_names::{identify_target_resources, is_heuristic_eligible};
pub use validate::validate;

use apigen_common::GeneratorError;
use thiserror::Error;

/// Fatal consistency and configuration errors raised while building a model
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("cannot find message type {type_id} referenced by field {field_id}")]
    MissingMessageType { field_id: String, type_id: String },

    #[error("cannot find enum type {type_id} referenced by field {field_id}")]
    MissingEnumType { field_id: String, type_id: String },

    #[error("cannot find input type {type_id} for method {method_id}")]
    MissingInputType { method_id: String, type_id: String },

    #[error("cannot find output type {type_id} for method {method_id}")]
    MissingOutputType { method_id: String, type_id: String },

    #[error("cannot find field {field_id} of oneof {one_of_id}")]
    MissingOneOfField { one_of_id: String, field_id: String },

    #[error("cannot find {kind} {id}")]
    MissingElement { kind: &'static str, id: String },

    #[error("cannot find field {field:?} in message {message_id} while resolving a path of method {method_id}")]
    MissingField {
        method_id: String,
        message_id: String,
        field: String,
    },

    #[error("field {field_id} has no message type, needed to resolve field path {field_path:?}")]
    MissingFieldMessageType { field_id: String, field_path: String },

    #[error("cannot determine the host for service {service_id}: no default host and no API name")]
    MissingHost { service_id: String },

    #[error("{kind} {id} is in package {package:?}, expected {expected:?}")]
    PackageMismatch {
        kind: &'static str,
        id: String,
        package: String,
        expected: String,
    },

    #[error("invalid documentation override for {id}: {reason}")]
    DocumentationOverride { id: String, reason: String },

    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
