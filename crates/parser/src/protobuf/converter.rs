//! Converts protobuf descriptors into the preliminary model

use super::annotations::{deprecated, string_field, Annotations};
use apigen_common::{
    Api, Enum, EnumValue, Field, Message, Method, OneOf, PathBinding, PathInfo, PathTemplate,
    Result, Service, Typez,
};
use prost_reflect::{
    DescriptorPool, DynamicMessage, EnumDescriptor, FieldDescriptor, FileDescriptor, Kind,
    MessageDescriptor, MethodDescriptor, ServiceDescriptor,
};
use std::collections::{BTreeSet, HashMap};

const HTTP_VERBS: &[&str] = &["get", "put", "post", "delete", "patch"];

/// Convert a descriptor pool into a preliminary model of `package`
pub(super) fn convert(pool: &DescriptorPool, package: Option<&str>) -> Result<Api> {
    let package = match package {
        Some(package) => package.to_string(),
        None => source_package(pool),
    };
    let annotations = Annotations::new(pool);
    let mut api = Api::new(api_name(pool, &annotations, &package), package.clone());

    for file in pool.files() {
        let target = file.package_name() == package;
        let docs = Documentation::new(&file);
        let converter = Converter {
            annotations: &annotations,
            docs: &docs,
            target,
        };

        for resource in annotations.resource_definitions(&file.options()) {
            if target {
                api.add_resource_definition(resource);
            } else {
                api.state
                    .resource_by_type
                    .insert(resource.type_.clone(), resource);
            }
        }
        for message in file.messages() {
            converter.add_message(&mut api, &message);
        }
        for enumeration in file.enums() {
            converter.add_enum(&mut api, &enumeration);
        }
        if target {
            for service in file.services() {
                converter.add_service(&mut api, &service)?;
            }
        }
    }
    Ok(api)
}

struct Converter<'a> {
    annotations: &'a Annotations,
    docs: &'a Documentation,
    /// The file belongs to the modeled package
    target: bool,
}

impl Converter<'_> {
    /// Add a message and, after it, its nested messages and enums
    fn add_message(&self, api: &mut Api, descriptor: &MessageDescriptor) {
        let options = descriptor.options();
        let mut message = Message {
            name: descriptor.name().to_string(),
            id: qualified(descriptor.full_name()),
            package: descriptor.package_name().to_string(),
            documentation: self.docs.get(descriptor.path()),
            deprecated: deprecated(&options),
            parent: descriptor.parent_message().map(|p| qualified(p.full_name())),
            resource: self.annotations.resource(&options),
            is_map: descriptor.is_map_entry(),
            ..Default::default()
        };
        message.fields = descriptor.fields().map(|f| self.field(&f)).collect();
        // proto3 `optional` fields live in synthetic oneofs, which are not groups.
        message.one_ofs = descriptor
            .oneofs()
            .filter(|o| !o.is_synthetic())
            .map(|o| OneOf {
                name: o.name().to_string(),
                id: qualified(o.full_name()),
                documentation: self.docs.get(o.path()),
                fields: o.fields().map(|f| qualified(f.full_name())).collect(),
                example_field: None,
            })
            .collect();

        if self.target {
            api.add_message(message);
        } else {
            api.add_dependency_message(message);
        }
        for child in descriptor.child_messages() {
            self.add_message(api, &child);
        }
        for child in descriptor.child_enums() {
            self.add_enum(api, &child);
        }
    }

    fn field(&self, descriptor: &FieldDescriptor) -> Field {
        let options = descriptor.options();
        let (typez, typez_id) = match descriptor.kind() {
            Kind::Message(message) => (Typez::Message, qualified(message.full_name())),
            Kind::Enum(enumeration) => (Typez::Enum, qualified(enumeration.full_name())),
            kind => (scalar_typez(&kind), String::new()),
        };
        Field {
            name: descriptor.name().to_string(),
            json_name: descriptor.json_name().to_string(),
            id: qualified(descriptor.full_name()),
            documentation: self.docs.get(descriptor.path()),
            typez,
            typez_id,
            repeated: descriptor.is_list(),
            map: descriptor.is_map(),
            optional: descriptor
                .field_descriptor_proto()
                .proto3_optional
                .unwrap_or(false),
            deprecated: deprecated(&options),
            behavior: self.annotations.field_behavior(&options),
            resource_reference: self.annotations.resource_reference(&options),
            ..Default::default()
        }
    }

    fn add_enum(&self, api: &mut Api, descriptor: &EnumDescriptor) {
        let id = qualified(descriptor.full_name());
        let enumeration = Enum {
            name: descriptor.name().to_string(),
            package: descriptor.package_name().to_string(),
            documentation: self.docs.get(descriptor.path()),
            deprecated: deprecated(&descriptor.options()),
            values: descriptor
                .values()
                .map(|v| EnumValue {
                    name: v.name().to_string(),
                    id: format!("{}.{}", id, v.name()),
                    documentation: self.docs.get(v.path()),
                    number: v.number(),
                    deprecated: deprecated(&v.options()),
                    parent: None,
                })
                .collect(),
            parent: descriptor.parent_message().map(|p| qualified(p.full_name())),
            id,
            ..Default::default()
        };
        if self.target {
            api.add_enum(enumeration);
        } else {
            api.add_dependency_enum(enumeration);
        }
    }

    fn add_service(&self, api: &mut Api, descriptor: &ServiceDescriptor) -> Result<()> {
        let options = descriptor.options();
        let service = Service {
            name: descriptor.name().to_string(),
            id: qualified(descriptor.full_name()),
            package: descriptor.package_name().to_string(),
            documentation: self.docs.get(descriptor.path()),
            deprecated: deprecated(&options),
            default_host: self.annotations.default_host(&options),
            ..Default::default()
        };
        let methods = descriptor
            .methods()
            .map(|m| self.method(&m))
            .collect::<Result<Vec<_>>>()?;
        api.add_service(service, methods);
        Ok(())
    }

    fn method(&self, descriptor: &MethodDescriptor) -> Result<Method> {
        let options = descriptor.options();
        let path_info = match self.annotations.http_rule(&options) {
            Some(rule) => path_info(&rule, &descriptor.input())?,
            None => PathInfo::default(),
        };
        let package = descriptor.parent_service().package_name().to_string();
        Ok(Method {
            name: descriptor.name().to_string(),
            id: qualified(descriptor.full_name()),
            documentation: self.docs.get(descriptor.path()),
            deprecated: deprecated(&options),
            input_type_id: qualified(descriptor.input().full_name()),
            output_type_id: qualified(descriptor.output().full_name()),
            path_info,
            operation_info: self.annotations.operation_info(&options, &package),
            client_side_streaming: descriptor.is_client_streaming(),
            server_side_streaming: descriptor.is_server_streaming(),
            ..Default::default()
        })
    }
}

/// Bindings of a `google.api.HttpRule`, including `additional_bindings`
fn path_info(rule: &DynamicMessage, request: &MessageDescriptor) -> Result<PathInfo> {
    let body = string_field(rule, "body");
    let mut bindings = Vec::new();
    bindings.extend(path_binding(rule, request, &body)?);

    if let Some(additional) = rule.get_field_by_name("additional_bindings") {
        for binding in additional.as_list().unwrap_or_default() {
            if let Some(binding) = binding.as_message() {
                let body = string_field(binding, "body");
                bindings.extend(path_binding(binding, request, &body)?);
            }
        }
    }

    Ok(PathInfo {
        bindings,
        body_field_path: (!body.is_empty()).then_some(body),
    })
}

fn path_binding(
    rule: &DynamicMessage,
    request: &MessageDescriptor,
    body: &str,
) -> Result<Option<PathBinding>> {
    let pattern = HTTP_VERBS
        .iter()
        .find_map(|verb| {
            let path = string_field(rule, verb);
            (!path.is_empty()).then(|| (verb.to_uppercase(), path))
        })
        .or_else(|| {
            let custom = rule.get_field_by_name("custom")?;
            let custom = custom.as_message()?;
            let path = string_field(custom, "path");
            (!path.is_empty()).then(|| (string_field(custom, "kind").to_uppercase(), path))
        });
    let Some((verb, path)) = pattern else {
        return Ok(None);
    };

    let path_template = PathTemplate::parse(&path)?;
    let query_parameters = query_parameters(request, &path_template, body);
    Ok(Some(PathBinding {
        verb,
        path_template,
        query_parameters,
        target_resource: None,
    }))
}

/// Request fields that are neither in the path nor the body
fn query_parameters(request: &MessageDescriptor, template: &PathTemplate, body: &str) -> Vec<String> {
    if body == "*" {
        return Vec::new();
    }
    let in_path: BTreeSet<&str> = template
        .variables()
        .filter_map(|v| v.field_path.first().map(String::as_str))
        .collect();
    request
        .fields()
        .map(|f| f.name().to_string())
        .filter(|name| !in_path.contains(name.as_str()) && name != body)
        .collect()
}

fn scalar_typez(kind: &Kind) -> Typez {
    match kind {
        Kind::Double => Typez::Double,
        Kind::Float => Typez::Float,
        Kind::Int64 => Typez::Int64,
        Kind::Uint64 => Typez::Uint64,
        Kind::Int32 => Typez::Int32,
        Kind::Fixed64 => Typez::Fixed64,
        Kind::Fixed32 => Typez::Fixed32,
        Kind::Bool => Typez::Bool,
        Kind::String => Typez::String,
        Kind::Bytes => Typez::Bytes,
        Kind::Uint32 => Typez::Uint32,
        Kind::Sfixed32 => Typez::Sfixed32,
        Kind::Sfixed64 => Typez::Sfixed64,
        Kind::Sint32 => Typez::Sint32,
        Kind::Sint64 => Typez::Sint64,
        Kind::Message(_) => Typez::Message,
        Kind::Enum(_) => Typez::Enum,
    }
}

fn qualified(full_name: &str) -> String {
    format!(".{}", full_name)
}

/// Package of the files no other file imports, preferring one with services
fn source_package(pool: &DescriptorPool) -> String {
    let imported: BTreeSet<String> = pool
        .files()
        .flat_map(|f| f.dependencies().map(|d| d.name().to_string()).collect::<Vec<_>>())
        .collect();
    let sources: Vec<FileDescriptor> = pool
        .files()
        .filter(|f| !imported.contains(f.name()))
        .collect();
    sources
        .iter()
        .find(|f| f.services().next().is_some())
        .or_else(|| sources.first())
        .map(|f| f.package_name().to_string())
        .unwrap_or_default()
}

/// Short API name: the default host's service name, else the last
/// non-version package component
fn api_name(pool: &DescriptorPool, annotations: &Annotations, package: &str) -> String {
    let host = pool
        .services()
        .filter(|s| s.package_name() == package)
        .map(|s| annotations.default_host(&s.options()))
        .find(|h| !h.is_empty());
    if let Some(host) = host {
        let host = host.split(':').next().unwrap_or(&host);
        return host.strip_suffix(".googleapis.com").unwrap_or(host).to_string();
    }
    package
        .split('.')
        .filter(|c| !is_version(c))
        .last()
        .unwrap_or_default()
        .to_string()
}

fn is_version(component: &str) -> bool {
    let mut chars = component.chars();
    chars.next() == Some('v') && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Leading comments of a file, keyed by source path
struct Documentation {
    comments: HashMap<Vec<i32>, String>,
}

impl Documentation {
    fn new(file: &FileDescriptor) -> Self {
        let comments = file
            .file_descriptor_proto()
            .source_code_info
            .iter()
            .flat_map(|info| &info.location)
            .filter_map(|location| {
                let text = location.leading_comments.as_deref()?;
                Some((location.path.clone(), clean_comment(text)))
            })
            .collect();
        Self { comments }
    }

    fn get(&self, path: &[i32]) -> String {
        self.comments.get(path).cloned().unwrap_or_default()
    }
}

/// Drop the single space protoc keeps after `//` and trailing blank lines
fn clean_comment(text: &str) -> String {
    text.lines()
        .map(|line| line.strip_prefix(' ').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_version() {
        assert!(is_version("v1"));
        assert!(is_version("v1beta2"));
        assert!(!is_version("vision"));
        assert!(!is_version("v"));
        assert!(!is_version("secretmanager"));
    }

    #[test]
    fn test_clean_comment() {
        assert_eq!(
            clean_comment(" A secret.\n Second line.\n\n"),
            "A secret.\nSecond line."
        );
        assert_eq!(clean_comment("no space"), "no space");
    }
}
