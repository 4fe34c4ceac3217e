//! Protobuf FileDescriptorSet parser

use crate::{RawParser, ServiceConfig};
use apigen_common::{Api, GeneratorError, Result};
use prost_reflect::DescriptorPool;
use std::fs;
use std::path::Path;

/// Protobuf raw parser
///
/// The model covers one package. Unless set with [`with_package`], it is
/// the package of the set's source files, i.e. files no other file imports.
///
/// [`with_package`]: ProtobufParser::with_package
pub struct ProtobufParser {
    /// Descriptor pool for reflection
    pool: DescriptorPool,

    /// Package to model (e.g. "google.cloud.secretmanager.v1")
    package: Option<String>,

    service_config: Option<ServiceConfig>,
}

impl ProtobufParser {
    /// Load FileDescriptorSet from binary file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_file_descriptor_set(&bytes)
    }

    /// Parse FileDescriptorSet from bytes
    ///
    /// Decoding the raw bytes (rather than a `prost_types` value) keeps
    /// extension options such as `google.api.http` readable.
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self> {
        let pool = DescriptorPool::decode(bytes).map_err(|e| {
            GeneratorError::Parse(format!("Failed to decode FileDescriptorSet: {}", e))
        })?;

        Ok(Self {
            pool,
            package: None,
            service_config: None,
        })
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_service_config(mut self, service_config: ServiceConfig) -> Self {
        self.service_config = Some(service_config);
        self
    }
}

impl RawParser for ProtobufParser {
    fn parse(&self) -> Result<Api> {
        let mut api = super::converter::convert(&self.pool, self.package.as_deref())?;
        if let Some(service_config) = &self.service_config {
            service_config.apply(&mut api);
        }
        tracing::debug!(
            files = self.pool.files().count(),
            messages = api.state.message_by_id.len(),
            services = api.services.len(),
            "converted descriptor set for {}",
            api.package_name
        );
        Ok(api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use prost_types::FileDescriptorSet;

    #[test]
    fn test_parse_empty_descriptor_set() {
        let file_descriptor_set = FileDescriptorSet { file: vec![] };
        let bytes = file_descriptor_set.encode_to_vec();

        let parser = ProtobufParser::from_file_descriptor_set(&bytes).unwrap();
        let api = parser.parse().unwrap();
        assert!(api.package_name.is_empty());
        assert!(api.services.is_empty());
    }

    #[test]
    fn test_invalid_bytes() {
        let err = ProtobufParser::from_file_descriptor_set(&[0xff, 0xff, 0xff]).err().unwrap();
        assert!(matches!(err, GeneratorError::Parse(_)));
    }
}
