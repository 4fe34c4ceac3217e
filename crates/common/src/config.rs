//! Generator configuration loaded from YAML
//!
//! ```yaml
//! specification_format: protobuf
//! specification_source: secretmanager.pb
//! pagination_overrides:
//!   - id: .google.cloud.secretmanager.v1.SecretManagerService.ListSecrets
//!     item_field: secrets
//! documentation_overrides:
//!   - id: .google.cloud.secretmanager.v1.Secret
//!     match: "[Secret][]"
//!     replace: "`Secret`"
//! skipped_ids:
//!   - .google.cloud.secretmanager.v1.SecretManagerService.TestIamPermissions
//! ```

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for one generation run
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Format of the specification source (e.g. "protobuf")
    pub specification_format: String,
    /// Path to the specification source
    pub specification_source: String,
    /// Optional service configuration (title, documentation)
    #[serde(default)]
    pub service_config: Option<String>,
    /// Replaces the API name
    #[serde(default)]
    pub name_override: Option<String>,
    /// Replaces the API title
    #[serde(default)]
    pub title_override: Option<String>,
    /// Replaces the API description
    #[serde(default)]
    pub description_override: Option<String>,
    #[serde(default)]
    pub pagination_overrides: Vec<PaginationOverride>,
    #[serde(default)]
    pub documentation_overrides: Vec<DocumentationOverride>,
    /// Element IDs removed from the model
    #[serde(default)]
    pub skipped_ids: Vec<String>,
    /// When non-empty, only these element IDs are kept
    #[serde(default)]
    pub included_ids: Vec<String>,
}

/// Names the pageable item field of a list method explicitly
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaginationOverride {
    /// Method ID
    pub id: String,
    /// Name of the response field holding the page items
    pub item_field: String,
}

/// Rewrites part of an element's documentation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentationOverride {
    /// Element ID
    pub id: String,
    /// Text to replace
    #[serde(rename = "match")]
    pub match_: String,
    /// Replacement text
    pub replace: String,
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            GeneratorError::Parse(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}
