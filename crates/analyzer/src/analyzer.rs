//! Model construction pipeline

use crate::{
    cross_reference, filters, label_recursive_fields, resource_names, update_method_pagination,
    validate, Result,
};
use apigen_common::config::GeneratorConfig;
use apigen_common::Api;
use apigen_parser::RawParser;

/// Builds a fully resolved model from a raw parser's output
pub struct ModelBuilder<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline
    ///
    /// Any consistency error aborts the build; there is no partially
    /// resolved result.
    pub fn build(&self, parser: &dyn RawParser) -> Result<Api> {
        let config = self.config;

        // Phase 1: Preliminary model
        let mut api = parser.parse()?;
        tracing::debug!(
            messages = api.state.message_by_id.len(),
            services = api.state.service_by_id.len(),
            "parsed {} from {}",
            api.package_name,
            config.specification_source
        );

        // Phase 2: Resolve references
        cross_reference(&mut api)?;

        // Phase 3: Shape analysis
        update_method_pagination(&config.pagination_overrides, &mut api);
        label_recursive_fields(&mut api);

        // Phase 4: Filtering, then resolve again so enrichment sees the
        // pagination results and the pruned model is re-checked
        filters::apply_filters(&mut api, &config.skipped_ids, &config.included_ids);
        cross_reference(&mut api)?;

        // Phase 5: Documentation and validation
        filters::apply_documentation_overrides(&mut api, &config.documentation_overrides)?;
        validate(&api)?;

        // Phase 6: Resource names
        resource_names::identify_target_resources(&mut api)?;

        filters::apply_api_overrides(&mut api, config);
        tracing::debug!(
            services = api.services.len(),
            messages = api.messages.len(),
            enums = api.enums.len(),
            "built model {}",
            api.name
        );
        Ok(api)
    }
}

/// Parse and resolve a model in one call
pub fn create_model(config: &GeneratorConfig, parser: &dyn RawParser) -> Result<Api> {
    ModelBuilder::new(config).build(parser)
}
