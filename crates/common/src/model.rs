//! In-memory API model
//!
//! The model is an arena: every message, enum, service and method lives in
//! [`ApiState`] keyed by its dotted, package-qualified ID. Containment is
//! expressed with ordered ID lists, and all cross references (field to
//! type, method to input/output, field to oneof, ...) are non-owning IDs
//! that the analyzer resolves and verifies against the state maps.

use crate::PathTemplate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ID of `google.protobuf.Empty`
pub const EMPTY_MESSAGE_ID: &str = ".google.protobuf.Empty";

/// ID of `google.protobuf.FieldMask`
pub const FIELD_MASK_ID: &str = ".google.protobuf.FieldMask";

/// ID of `google.protobuf.Int32Value`
pub const INT32_VALUE_ID: &str = ".google.protobuf.Int32Value";

/// ID of `google.protobuf.UInt32Value`
pub const UINT32_VALUE_ID: &str = ".google.protobuf.UInt32Value";

/// Root of the model produced for a single generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Api {
    /// Short API name (e.g. "secretmanager")
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// API description
    pub description: String,
    /// Package the generated library covers (e.g. "google.cloud.secretmanager.v1")
    pub package_name: String,
    /// Top-level messages, in declaration order
    pub messages: Vec<String>,
    /// Top-level enums, in declaration order
    pub enums: Vec<String>,
    /// Services, in declaration order
    pub services: Vec<String>,
    /// File-level `google.api.resource_definition` annotations
    pub resource_definitions: Vec<Resource>,
    /// ID indexes for every element, including dependencies
    pub state: ApiState,
}

/// ID indexes over every element known to the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiState {
    pub message_by_id: BTreeMap<String, Message>,
    pub enum_by_id: BTreeMap<String, Enum>,
    pub service_by_id: BTreeMap<String, Service>,
    pub method_by_id: BTreeMap<String, Method>,
    pub resource_by_type: BTreeMap<String, Resource>,
}

impl Api {
    /// Create an empty model for `package_name`
    pub fn new(name: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package_name: package_name.into(),
            ..Default::default()
        }
    }

    /// Register a message. Messages without a parent are listed as top-level
    /// messages, nested messages are appended to their parent.
    pub fn add_message(&mut self, message: Message) {
        let id = message.id.clone();
        match message.parent.clone() {
            Some(parent) => {
                if let Some(parent) = self.state.message_by_id.get_mut(&parent) {
                    parent.messages.push(id.clone());
                }
            }
            None => self.messages.push(id.clone()),
        }
        if let Some(resource) = &message.resource {
            self.state
                .resource_by_type
                .insert(resource.type_.clone(), resource.clone());
        }
        self.state.message_by_id.insert(id, message);
    }

    /// Register a message that only exists to resolve references, such as a
    /// well-known type from a dependency. It is not listed as top-level.
    pub fn add_dependency_message(&mut self, message: Message) {
        if let Some(resource) = &message.resource {
            self.state
                .resource_by_type
                .insert(resource.type_.clone(), resource.clone());
        }
        self.state.message_by_id.insert(message.id.clone(), message);
    }

    /// Register an enum, following the same containment rules as messages
    pub fn add_enum(&mut self, enumeration: Enum) {
        let id = enumeration.id.clone();
        match enumeration.parent.clone() {
            Some(parent) => {
                if let Some(parent) = self.state.message_by_id.get_mut(&parent) {
                    parent.enums.push(id.clone());
                }
            }
            None => self.enums.push(id.clone()),
        }
        self.state.enum_by_id.insert(id, enumeration);
    }

    /// Register an enum from a dependency without listing it
    pub fn add_dependency_enum(&mut self, enumeration: Enum) {
        self.state.enum_by_id.insert(enumeration.id.clone(), enumeration);
    }

    /// Register a service together with its methods
    pub fn add_service(&mut self, mut service: Service, methods: Vec<Method>) {
        service.methods = methods.iter().map(|m| m.id.clone()).collect();
        for method in methods {
            self.state.method_by_id.insert(method.id.clone(), method);
        }
        self.services.push(service.id.clone());
        self.state.service_by_id.insert(service.id.clone(), service);
    }

    /// Register a file-level resource definition
    pub fn add_resource_definition(&mut self, resource: Resource) {
        self.state
            .resource_by_type
            .insert(resource.type_.clone(), resource.clone());
        self.resource_definitions.push(resource);
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.state.message_by_id.get(id)
    }

    pub fn message_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.state.message_by_id.get_mut(id)
    }

    pub fn enumeration(&self, id: &str) -> Option<&Enum> {
        self.state.enum_by_id.get(id)
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.state.service_by_id.get(id)
    }

    pub fn method(&self, id: &str) -> Option<&Method> {
        self.state.method_by_id.get(id)
    }

    pub fn method_mut(&mut self, id: &str) -> Option<&mut Method> {
        self.state.method_by_id.get_mut(id)
    }

    /// Resource annotation registered for a resource type
    pub fn resource(&self, resource_type: &str) -> Option<&Resource> {
        self.state.resource_by_type.get(resource_type)
    }

    /// Message a field refers to, once cross-referenced
    pub fn field_message_type(&self, field: &Field) -> Option<&Message> {
        field.message_type.as_deref().and_then(|id| self.message(id))
    }

    /// Enum a field refers to, once cross-referenced
    pub fn field_enum_type(&self, field: &Field) -> Option<&Enum> {
        field.enum_type.as_deref().and_then(|id| self.enumeration(id))
    }

    pub fn input_type(&self, method: &Method) -> Option<&Message> {
        method.input_type.as_deref().and_then(|id| self.message(id))
    }

    pub fn output_type(&self, method: &Method) -> Option<&Message> {
        method.output_type.as_deref().and_then(|id| self.message(id))
    }

    /// Page token field of a paginated method
    pub fn pagination_field(&self, method: &Method) -> Option<&Field> {
        let name = method.pagination.as_deref()?;
        self.input_type(method)?.field(name)
    }

    /// Pageable item field of a paginated method's response
    pub fn pageable_item(&self, method: &Method) -> Option<&Field> {
        let output = self.output_type(method)?;
        let pagination = output.pagination.as_ref()?;
        output.field(&pagination.pageable_item)
    }

    /// Methods of a service, in declaration order
    pub fn service_methods<'a>(&'a self, service: &'a Service) -> impl Iterator<Item = &'a Method> {
        service.methods.iter().filter_map(|id| self.method(id))
    }
}

/// Scalar, message and enum kind tags, as in `descriptor.proto`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Typez {
    #[default]
    Undefined,
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

/// `google.api.field_behavior` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldBehavior {
    Optional,
    Required,
    OutputOnly,
    InputOnly,
    Immutable,
    UnorderedList,
    NonEmptyDefault,
    Identifier,
}

impl FieldBehavior {
    pub fn from_number(number: i32) -> Option<Self> {
        Some(match number {
            1 => FieldBehavior::Optional,
            2 => FieldBehavior::Required,
            3 => FieldBehavior::OutputOnly,
            4 => FieldBehavior::InputOnly,
            5 => FieldBehavior::Immutable,
            6 => FieldBehavior::UnorderedList,
            7 => FieldBehavior::NonEmptyDefault,
            8 => FieldBehavior::Identifier,
            _ => return None,
        })
    }
}

/// A message (a.k.a. schema) in the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub name: String,
    /// Dotted, package-qualified ID (e.g. ".google.cloud.secretmanager.v1.Secret")
    pub id: String,
    pub package: String,
    pub documentation: String,
    pub deprecated: bool,
    /// Fields in declaration order, including oneof members
    pub fields: Vec<Field>,
    /// IDs of nested messages
    pub messages: Vec<String>,
    /// IDs of nested enums
    pub enums: Vec<String>,
    pub one_ofs: Vec<OneOf>,
    /// ID of the enclosing message for nested messages
    pub parent: Option<String>,
    /// Set when the message is annotated with `google.api.resource`
    pub resource: Option<Resource>,
    /// Set by the pagination analyzer on list responses
    pub pagination: Option<PaginationInfo>,
    /// Synthetic map-entry message
    pub is_map: bool,
}

impl Message {
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        parent: Option<&Message>,
    ) -> Self {
        let name = name.into();
        let package = package.into();
        let id = match parent {
            Some(parent) => format!("{}.{}", parent.id, name),
            None if package.is_empty() => format!(".{}", name),
            None => format!(".{}.{}", package, name),
        };
        Self {
            name,
            id,
            package,
            parent: parent.map(|p| p.id.clone()),
            ..Default::default()
        }
    }

    /// Append a field, filling in its ID from this message
    pub fn with_field(mut self, mut field: Field) -> Self {
        if field.id.is_empty() {
            field.id = format!("{}.{}", self.id, field.name);
        }
        self.fields.push(field);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

/// A field of a message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub json_name: String,
    pub id: String,
    pub documentation: String,
    pub typez: Typez,
    /// Target type ID when `typez` is `Message` or `Enum`
    pub typez_id: String,
    pub repeated: bool,
    pub map: bool,
    pub optional: bool,
    pub deprecated: bool,
    pub behavior: Vec<FieldBehavior>,
    pub resource_reference: Option<ResourceReference>,
    /// The field's type transitively contains the field's message
    pub recursive: bool,
    /// ID of the containing message
    pub parent: Option<String>,
    /// ID of the referenced message, once resolved
    pub message_type: Option<String>,
    /// ID of the referenced enum, once resolved
    pub enum_type: Option<String>,
    /// ID of the oneof this field belongs to
    pub group: Option<String>,
}

impl Field {
    /// A scalar field; the JSON name is derived from the proto name
    pub fn new(name: impl Into<String>, typez: Typez) -> Self {
        let name = name.into();
        Self {
            json_name: json_name(&name),
            name,
            typez,
            ..Default::default()
        }
    }

    /// A message-typed field
    pub fn message(name: impl Into<String>, typez_id: impl Into<String>) -> Self {
        Self {
            typez_id: typez_id.into(),
            ..Self::new(name, Typez::Message)
        }
    }

    /// An enum-typed field
    pub fn enumeration(name: impl Into<String>, typez_id: impl Into<String>) -> Self {
        Self {
            typez_id: typez_id.into(),
            ..Self::new(name, Typez::Enum)
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    pub fn map(mut self) -> Self {
        self.map = true;
        self
    }

    pub fn with_resource_reference(mut self, reference: ResourceReference) -> Self {
        self.resource_reference = Some(reference);
        self
    }
}

/// Convert a proto field name to its lowerCamelCase JSON name
pub fn json_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            result.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

/// A group of fields of which at most one is set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneOf {
    pub name: String,
    pub id: String,
    pub documentation: String,
    /// IDs of the member fields, which also appear in `Message.fields`
    pub fields: Vec<String>,
    /// Member field chosen to appear in generated samples
    pub example_field: Option<String>,
}

/// An enumeration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub id: String,
    pub package: String,
    pub documentation: String,
    pub deprecated: bool,
    pub values: Vec<EnumValue>,
    /// First value for each distinct number
    pub unique_number_values: Vec<String>,
    /// Names of the values used in generated samples
    pub values_for_examples: Vec<String>,
    pub parent: Option<String>,
}

impl Enum {
    pub fn new(name: impl Into<String>, package: impl Into<String>, parent: Option<&Message>) -> Self {
        let name = name.into();
        let package = package.into();
        let id = match parent {
            Some(parent) => format!("{}.{}", parent.id, name),
            None if package.is_empty() => format!(".{}", name),
            None => format!(".{}.{}", package, name),
        };
        Self {
            name,
            id,
            package,
            parent: parent.map(|p| p.id.clone()),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        let name = name.into();
        self.values.push(EnumValue {
            id: format!("{}.{}", self.id, name),
            name,
            number,
            ..Default::default()
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub id: String,
    pub documentation: String,
    pub number: i32,
    pub deprecated: bool,
    /// ID of the owning enum
    pub parent: Option<String>,
}

/// A service and the IDs of its methods
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub id: String,
    pub package: String,
    pub documentation: String,
    pub deprecated: bool,
    /// `google.api.default_host`, e.g. "secretmanager.googleapis.com"
    pub default_host: String,
    pub methods: Vec<String>,
    /// Name of the model this service belongs to, set by cross-referencing
    pub model: Option<String>,
}

impl Service {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        let name = name.into();
        let package = package.into();
        Self {
            id: format!(".{}.{}", package, name),
            name,
            package,
            ..Default::default()
        }
    }

    pub fn with_default_host(mut self, host: impl Into<String>) -> Self {
        self.default_host = host.into();
        self
    }
}

/// An RPC
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub id: String,
    pub documentation: String,
    pub deprecated: bool,
    pub input_type_id: String,
    pub output_type_id: String,
    pub path_info: PathInfo,
    pub operation_info: Option<OperationInfo>,
    pub discovery_lro: Option<DiscoveryLro>,
    pub client_side_streaming: bool,
    pub server_side_streaming: bool,
    /// Service that originally declared a mixin method
    pub source_service_id: String,

    // Resolved by cross-referencing.
    pub input_type: Option<String>,
    pub output_type: Option<String>,
    pub service: Option<String>,
    pub source_service: Option<String>,
    pub model: Option<String>,

    /// Name of the request's page token field, set on paginated methods
    pub pagination: Option<String>,

    // Derived once by enrichment.
    pub is_simple: bool,
    pub is_lro: bool,
    pub is_list: bool,
    pub is_streaming: bool,
    pub is_aip_standard: bool,
    pub aip_standard_get_info: Option<AipStandardGetInfo>,
    pub aip_standard_delete_info: Option<AipStandardDeleteInfo>,
    pub aip_standard_undelete_info: Option<AipStandardUndeleteInfo>,
    pub aip_standard_create_info: Option<AipStandardCreateInfo>,
    pub aip_standard_update_info: Option<AipStandardUpdateInfo>,
    pub aip_standard_list_info: Option<AipStandardListInfo>,
}

impl Method {
    pub fn new(
        service: &Service,
        name: impl Into<String>,
        input_type_id: impl Into<String>,
        output_type_id: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: format!("{}.{}", service.id, name),
            name,
            input_type_id: input_type_id.into(),
            output_type_id: output_type_id.into(),
            ..Default::default()
        }
    }

    pub fn with_binding(mut self, binding: PathBinding) -> Self {
        self.path_info.bindings.push(binding);
        self
    }

    pub fn with_body(mut self, body_field_path: impl Into<String>) -> Self {
        self.path_info.body_field_path = Some(body_field_path.into());
        self
    }

    pub fn with_operation_info(mut self, info: OperationInfo) -> Self {
        self.operation_info = Some(info);
        self
    }

    /// The method returns `google.protobuf.Empty`
    pub fn returns_empty(&self) -> bool {
        self.output_type_id == EMPTY_MESSAGE_ID
    }
}

/// HTTP bindings of a method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathInfo {
    pub bindings: Vec<PathBinding>,
    /// Request field sent as the HTTP body; "*" means the whole request
    pub body_field_path: Option<String>,
}

/// One HTTP verb and path for a method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathBinding {
    /// HTTP verb, e.g. "GET"
    pub verb: String,
    pub path_template: PathTemplate,
    /// Request fields sent as query parameters
    pub query_parameters: Vec<String>,
    /// Set by resource-name identification
    pub target_resource: Option<TargetResource>,
}

impl PathBinding {
    pub fn new(verb: impl Into<String>, path_template: PathTemplate) -> Self {
        Self {
            verb: verb.into(),
            path_template,
            ..Default::default()
        }
    }
}

/// Request fields that compose the resource name of a binding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResource {
    /// One field path (e.g. `["parent", "project"]`) per resource-name variable
    pub field_paths: Vec<Vec<String>>,
    /// Canonical resource name template, e.g. `//compute.googleapis.com/projects/{project}`
    pub template: String,
}

/// `google.longrunning.operation_info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationInfo {
    pub response_type_id: String,
    pub metadata_type_id: String,
    /// ID of the method that returns this operation
    pub method_id: Option<String>,
}

/// Long-running operation polling information for Discovery-based APIs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryLro {
    pub polling_path_parameters: Vec<String>,
}

/// `google.api.resource` / `google.api.resource_definition`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource type, e.g. "secretmanager.googleapis.com/Secret"
    pub type_: String,
    pub patterns: Vec<ResourcePattern>,
    pub plural: String,
    pub singular: String,
}

impl Resource {
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            ..Default::default()
        }
    }

    pub fn with_pattern(mut self, pattern: ResourcePattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn with_names(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.singular = singular.into();
        self.plural = plural.into();
        self
    }

    /// Type name after the service prefix, e.g. "Secret"
    pub fn type_name(&self) -> &str {
        type_name(&self.type_)
    }
}

/// Type name after the service prefix of a resource type
pub fn type_name(resource_type: &str) -> &str {
    resource_type
        .rsplit_once('/')
        .map(|(_, name)| name)
        .unwrap_or(resource_type)
}

/// Ordered segments of one resource name pattern
pub type ResourcePattern = Vec<crate::PathSegment>;

/// `google.api.resource_reference`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReference {
    pub type_: String,
    pub child_type: String,
}

impl ResourceReference {
    pub fn to_type(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            child_type: String::new(),
        }
    }

    pub fn to_child_type(child_type: impl Into<String>) -> Self {
        Self {
            type_: String::new(),
            child_type: child_type.into(),
        }
    }
}

/// Pagination shape of a list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Name of the `next_page_token` field
    pub next_page_token: String,
    /// Name of the field holding the page items
    pub pageable_item: String,
}

/// AIP-131 Get
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AipStandardGetInfo {
    pub resource_name_request_field: String,
}

/// AIP-135 Delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AipStandardDeleteInfo {
    pub resource_name_request_field: String,
}

/// AIP-164 Undelete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AipStandardUndeleteInfo {
    pub resource_name_request_field: String,
}

/// AIP-133 Create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AipStandardCreateInfo {
    pub parent_request_field: String,
    pub resource_id_request_field: Option<String>,
    pub resource_request_field: String,
}

/// AIP-134 Update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AipStandardUpdateInfo {
    pub resource_request_field: String,
    pub update_mask_request_field: String,
}

/// AIP-132 List
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AipStandardListInfo {
    pub parent_request_field: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_name() {
        assert_eq!(json_name("page_token"), "pageToken");
        assert_eq!(json_name("next_page_token"), "nextPageToken");
        assert_eq!(json_name("name"), "name");
    }

    #[test]
    fn test_message_ids() {
        let parent = Message::new("Secret", "google.cloud.secretmanager.v1", None);
        assert_eq!(parent.id, ".google.cloud.secretmanager.v1.Secret");

        let nested = Message::new("LabelsEntry", "google.cloud.secretmanager.v1", Some(&parent));
        assert_eq!(nested.id, ".google.cloud.secretmanager.v1.Secret.LabelsEntry");
        assert_eq!(nested.parent.as_deref(), Some(parent.id.as_str()));

        let with_field = parent.with_field(Field::new("name", Typez::String));
        assert_eq!(
            with_field.fields[0].id,
            ".google.cloud.secretmanager.v1.Secret.name"
        );
    }

    #[test]
    fn test_add_nested_message() {
        let mut api = Api::new("test", "test.v1");
        let outer = Message::new("Outer", "test.v1", None);
        let inner = Message::new("Inner", "test.v1", Some(&outer));
        api.add_message(outer);
        api.add_message(inner);

        assert_eq!(api.messages, vec![".test.v1.Outer".to_string()]);
        assert_eq!(
            api.message(".test.v1.Outer").unwrap().messages,
            vec![".test.v1.Outer.Inner".to_string()]
        );
    }

    #[test]
    fn test_resource_type_name() {
        let resource = Resource::new("secretmanager.googleapis.com/SecretVersion");
        assert_eq!(resource.type_name(), "SecretVersion");
        assert_eq!(type_name("Plain"), "Plain");
    }
}
