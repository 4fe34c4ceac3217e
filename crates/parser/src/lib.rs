//! Raw specification parsing for apigen
//!
//! A raw parser turns a specification source into a preliminary [`Api`]:
//! every element is registered in `ApiState` by ID and every reference is
//! still a plain ID string. The analyzer resolves those references.
//!
//! ## Formats
//! - **protobuf**: a compiled `FileDescriptorSet` (`protoc --include_imports
//!   --include_source_info -o api.pb ...`)
//!
//! ## Example
//! ```rust,ignore
//! use apigen_parser::{ProtobufParser, RawParser};
//!
//! let parser = ProtobufParser::from_file("secretmanager.pb")?;
//! let api = parser.parse()?;
//! ```

mod protobuf;
mod service_config;

pub use protobuf::ProtobufParser;
pub use service_config::ServiceConfig;

use apigen_common::config::GeneratorConfig;
use apigen_common::{Api, GeneratorError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Produces a preliminary, not yet cross-referenced model
pub trait RawParser {
    fn parse(&self) -> Result<Api>;
}

/// Supported specification formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecificationFormat {
    Protobuf,
}

impl FromStr for SpecificationFormat {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "protobuf" => Ok(SpecificationFormat::Protobuf),
            other => Err(GeneratorError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for SpecificationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecificationFormat::Protobuf => write!(f, "protobuf"),
        }
    }
}

/// Create the raw parser for a configuration
pub fn parser_for(config: &GeneratorConfig) -> Result<Box<dyn RawParser>> {
    let format: SpecificationFormat = config.specification_format.parse()?;
    tracing::debug!(%format, source = %config.specification_source, "selected raw parser");

    match format {
        SpecificationFormat::Protobuf => {
            let mut parser = ProtobufParser::from_file(&config.specification_source)?;
            if let Some(path) = &config.service_config {
                parser = parser.with_service_config(ServiceConfig::load(Path::new(path))?);
            }
            Ok(Box::new(parser))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specification_format_from_str() {
        assert_eq!(
            "protobuf".parse::<SpecificationFormat>().unwrap(),
            SpecificationFormat::Protobuf
        );
        assert_eq!(SpecificationFormat::Protobuf.to_string(), "protobuf");

        let err = "openapi".parse::<SpecificationFormat>().unwrap_err();
        assert!(matches!(err, GeneratorError::UnknownFormat(ref f) if f == "openapi"));
    }

    #[test]
    fn test_parser_for_unknown_format() {
        let config = GeneratorConfig {
            specification_format: "discovery".to_string(),
            specification_source: "compute.json".to_string(),
            ..Default::default()
        };
        let err = parser_for(&config).err().unwrap();
        assert!(matches!(err, GeneratorError::UnknownFormat(_)));
    }

    #[test]
    fn test_parser_for_missing_source() {
        let config = GeneratorConfig {
            specification_format: "protobuf".to_string(),
            specification_source: "/nonexistent/api.pb".to_string(),
            ..Default::default()
        };
        let err = parser_for(&config).err().unwrap();
        assert!(matches!(err, GeneratorError::Parse(_)));
    }
}
