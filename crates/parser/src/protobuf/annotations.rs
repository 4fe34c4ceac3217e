//! Google API annotations carried as extension options

use apigen_common::{
    FieldBehavior, OperationInfo, PathTemplate, Resource, ResourcePattern, ResourceReference,
};
use prost_reflect::{DescriptorPool, DynamicMessage, ExtensionDescriptor, Value};
use std::borrow::Cow;

/// Extension descriptors found in the pool; absent ones are never read
pub(super) struct Annotations {
    http: Option<ExtensionDescriptor>,
    default_host: Option<ExtensionDescriptor>,
    resource: Option<ExtensionDescriptor>,
    resource_definition: Option<ExtensionDescriptor>,
    resource_reference: Option<ExtensionDescriptor>,
    field_behavior: Option<ExtensionDescriptor>,
    operation_info: Option<ExtensionDescriptor>,
}

impl Annotations {
    pub fn new(pool: &DescriptorPool) -> Self {
        Self {
            http: pool.get_extension_by_name("google.api.http"),
            default_host: pool.get_extension_by_name("google.api.default_host"),
            resource: pool.get_extension_by_name("google.api.resource"),
            resource_definition: pool.get_extension_by_name("google.api.resource_definition"),
            resource_reference: pool.get_extension_by_name("google.api.resource_reference"),
            field_behavior: pool.get_extension_by_name("google.api.field_behavior"),
            operation_info: pool.get_extension_by_name("google.longrunning.operation_info"),
        }
    }

    fn get<'a>(
        options: &'a DynamicMessage,
        extension: &Option<ExtensionDescriptor>,
    ) -> Option<Cow<'a, Value>> {
        let extension = extension.as_ref()?;
        options
            .has_extension(extension)
            .then(|| options.get_extension(extension))
    }

    /// `google.api.http` rule of a method
    pub fn http_rule(&self, options: &DynamicMessage) -> Option<DynamicMessage> {
        Self::get(options, &self.http).and_then(|v| v.as_message().cloned())
    }

    /// `google.api.default_host` of a service, empty when absent
    pub fn default_host(&self, options: &DynamicMessage) -> String {
        Self::get(options, &self.default_host)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// `google.api.resource` of a message
    pub fn resource(&self, options: &DynamicMessage) -> Option<Resource> {
        let value = Self::get(options, &self.resource)?;
        resource_descriptor(value.as_message()?)
    }

    /// `google.api.resource_definition` entries of a file
    pub fn resource_definitions(&self, options: &DynamicMessage) -> Vec<Resource> {
        let Some(value) = Self::get(options, &self.resource_definition) else {
            return Vec::new();
        };
        value
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_message)
            .filter_map(resource_descriptor)
            .collect()
    }

    /// `google.api.resource_reference` of a field
    pub fn resource_reference(&self, options: &DynamicMessage) -> Option<ResourceReference> {
        let value = Self::get(options, &self.resource_reference)?;
        let reference = value.as_message()?;
        Some(ResourceReference {
            type_: string_field(reference, "type"),
            child_type: string_field(reference, "child_type"),
        })
    }

    /// `google.api.field_behavior` of a field; unknown values are dropped
    pub fn field_behavior(&self, options: &DynamicMessage) -> Vec<FieldBehavior> {
        let Some(value) = Self::get(options, &self.field_behavior) else {
            return Vec::new();
        };
        value
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_enum_number)
            .filter_map(FieldBehavior::from_number)
            .collect()
    }

    /// `google.longrunning.operation_info` of a method, with type names
    /// qualified relative to `package`
    pub fn operation_info(&self, options: &DynamicMessage, package: &str) -> Option<OperationInfo> {
        let value = Self::get(options, &self.operation_info)?;
        let info = value.as_message()?;
        Some(OperationInfo {
            response_type_id: qualify_type(&string_field(info, "response_type"), package),
            metadata_type_id: qualify_type(&string_field(info, "metadata_type"), package),
            method_id: None,
        })
    }
}

/// A `google.api.ResourceDescriptor`; descriptors without a type are ignored
fn resource_descriptor(descriptor: &DynamicMessage) -> Option<Resource> {
    let type_ = string_field(descriptor, "type");
    if type_.is_empty() {
        return None;
    }

    let patterns: Vec<ResourcePattern> = descriptor
        .get_field_by_name("pattern")
        .map(|value| {
            value
                .as_list()
                .unwrap_or_default()
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|pattern| match PathTemplate::parse_pattern(pattern) {
                    Ok(segments) => Some(segments),
                    Err(e) => {
                        tracing::warn!(resource = %type_, "skipping resource pattern: {}", e);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Some(Resource {
        patterns,
        plural: string_field(descriptor, "plural"),
        singular: string_field(descriptor, "singular"),
        type_,
    })
}

/// String field of a dynamic message, empty when unset
pub(super) fn string_field(message: &DynamicMessage, name: &str) -> String {
    message
        .get_field_by_name(name)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Option `deprecated = true`
pub(super) fn deprecated(options: &DynamicMessage) -> bool {
    options
        .get_field_by_name("deprecated")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// Type names in `operation_info` may be relative to the method's package
fn qualify_type(name: &str, package: &str) -> String {
    if name.is_empty() || name.starts_with('.') {
        name.to_string()
    } else if name.contains('.') || package.is_empty() {
        format!(".{}", name)
    } else {
        format!(".{}.{}", package, name)
    }
}
