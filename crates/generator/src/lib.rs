//! Artifact generation for apigen models
//!
//! This crate renders a fully resolved [`Api`] into:
//! - `manifest.yaml`: services, methods, HTTP bindings, pagination,
//!   AIP classification and target resources
//! - `src/lib.rs`: a client-binding skeleton with one request description
//!   per RPC
//! - `model.json`: the view the templates render, for external tooling

mod templates;
mod views;

pub use views::{ApiView, BindingView, MethodView, ServiceView};

use apigen_common::{Api, GeneratorError, Result};
use std::fs;
use std::path::Path;
use tera::Tera;

/// Model generator
pub struct ModelGenerator {
    model: ApiView,
    tera: Tera,
}

impl ModelGenerator {
    /// Create a new generator from a resolved model
    pub fn new(api: &Api) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self {
            model: ApiView::new(api),
            tera,
        })
    }

    /// View of the model the templates render
    pub fn model(&self) -> &ApiView {
        &self.model
    }

    /// Render one template by name ("manifest.yaml" or "lib.rs")
    pub fn render(&self, template: &str) -> Result<String> {
        self.tera
            .render(template, &self.create_context())
            .map_err(|e| GeneratorError::Generation(format!("Template error: {:?}", e)))
    }

    /// Generate all artifacts to a directory
    ///
    /// Returns the written paths, relative to `output_dir`.
    pub fn generate_to_directory(&self, output_dir: &Path) -> Result<Vec<String>> {
        fs::create_dir_all(output_dir.join("src")).map_err(|e| {
            GeneratorError::Generation(format!("Failed to create output directory: {}", e))
        })?;

        let mut written = Vec::new();
        for (template, relative_path, _) in templates::TEMPLATES {
            let rendered = self.render(template)?;
            fs::write(output_dir.join(relative_path), rendered).map_err(|e| {
                GeneratorError::Generation(format!("Failed to write {}: {}", relative_path, e))
            })?;
            tracing::debug!(template, "wrote {}", relative_path);
            written.push(relative_path.to_string());
        }

        let json = serde_json::to_string_pretty(&self.model)?;
        fs::write(output_dir.join("model.json"), json).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write model.json: {}", e))
        })?;
        written.push("model.json".to_string());

        Ok(written)
    }

    fn create_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("api", &self.model);
        context
    }
}
