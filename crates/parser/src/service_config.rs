//! `google.api.Service` configuration (the `*_v1.yaml` next to the protos)
//!
//! Only the naming and documentation entries are used; everything else in
//! the file is ignored.

use apigen_common::{Api, GeneratorError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Service configuration entries that affect the model
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceConfig {
    /// Service name, e.g. "secretmanager.googleapis.com"
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub documentation: ServiceDocumentation,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceDocumentation {
    #[serde(default)]
    pub summary: String,
}

impl ServiceConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read service config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Fill the API name, title and description from this configuration
    pub fn apply(&self, api: &mut Api) {
        if !self.name.is_empty() {
            api.name = self
                .name
                .strip_suffix(".googleapis.com")
                .unwrap_or(&self.name)
                .to_string();
        }
        if !self.title.is_empty() {
            api.title = self.title.clone();
        }
        if !self.documentation.summary.is_empty() {
            api.description = self.documentation.summary.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE_YAML: &str = r#"
type: google.api.Service
config_version: 3
name: secretmanager.googleapis.com
title: Secret Manager API

apis:
- name: google.cloud.secretmanager.v1.SecretManagerService

documentation:
  summary: |-
    Stores sensitive data such as API keys, passwords, and certificates.
"#;

    #[test]
    fn test_apply_service_config() {
        let config = ServiceConfig::from_yaml(SERVICE_YAML).unwrap();
        let mut api = Api::new("", "google.cloud.secretmanager.v1");
        config.apply(&mut api);

        assert_eq!(api.name, "secretmanager");
        assert_eq!(api.title, "Secret Manager API");
        assert!(api.description.starts_with("Stores sensitive data"));
    }

    #[test]
    fn test_empty_entries_keep_model_values() {
        let config = ServiceConfig::from_yaml("title: Only Title").unwrap();
        let mut api = Api::new("secretmanager", "google.cloud.secretmanager.v1");
        config.apply(&mut api);

        assert_eq!(api.name, "secretmanager");
        assert_eq!(api.title, "Only Title");
        assert!(api.description.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ServiceConfig::load(Path::new("/nonexistent/service.yaml")).unwrap_err();
        assert!(matches!(err, GeneratorError::Parse(_)));
    }
}
