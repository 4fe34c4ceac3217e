//! Resource-name identification for HTTP bindings
//!
//! For every binding we find the request fields that make up the target
//! resource name:
//! 1. Explicit: every path variable refers to a field annotated with
//!    `google.api.resource_reference`.
//! 2. Heuristic: for a few legacy services without annotations, the longest
//!    run of `collection/{id}` pairs built from known collection names.

use crate::{AnalyzerError, Result};
use apigen_common::{
    Api, Field, Message, Method, PathSegment, PathTemplate, Service, TargetResource,
};
use std::collections::BTreeSet;

/// Service ID prefixes (first four dot-separated components) allowed to use
/// the heuristic
const HEURISTIC_ELIGIBLE_PREFIXES: &[&str] = &[
    ".google.cloud.compute",
    ".google.cloud.sql",
    ".google.cloud.bigquery",
];

/// Collection identifiers recognized in every API
const BASE_VOCABULARY: &[&str] = &[
    "projects",
    "locations",
    "folders",
    "organizations",
    "billingAccounts",
    // Compute
    "zones",
    "regions",
];

/// Words ending in "s" that are not plural collection names. Not exhaustive.
const SINGULAR_EXCEPTIONS: &[&str] = &[
    "access",
    "address",
    "alias",
    "analysis",
    "basis",
    "bus",
    "class",
    "diagnosis",
    "dns",
    "egress",
    "ingress",
    "os",
    "process",
    "progress",
    "status",
    "success",
];

/// The service may fall back to the collection-name heuristic
pub fn is_heuristic_eligible(service_id: &str) -> bool {
    let components: Vec<&str> = service_id.split('.').collect();
    if components.len() < 4 {
        return false;
    }
    let prefix = components[..4].join(".");
    HEURISTIC_ELIGIBLE_PREFIXES.contains(&prefix.as_str())
}

/// Set `PathBinding.target_resource` on every binding of every method
pub fn identify_target_resources(api: &mut Api) -> Result<()> {
    let vocabulary = build_vocabulary(api);
    let mut updates = Vec::new();

    for service in api.state.service_by_id.values() {
        for method in api.service_methods(service) {
            for (index, binding) in method.path_info.bindings.iter().enumerate() {
                let template = &binding.path_template;
                let target = match explicit_target(api, service, method, template)? {
                    Some(target) => Some(target),
                    None => heuristic_target(api, service, method, template, &vocabulary)?,
                };
                updates.push((method.id.clone(), index, target));
            }
        }
    }

    tracing::debug!(
        identified = updates.iter().filter(|(_, _, t)| t.is_some()).count(),
        bindings = updates.len(),
        "identified target resources"
    );
    for (method_id, index, target) in updates {
        if let Some(binding) = api
            .state
            .method_by_id
            .get_mut(&method_id)
            .and_then(|m| m.path_info.bindings.get_mut(index))
        {
            binding.target_resource = target;
        }
    }
    Ok(())
}

fn explicit_target(
    api: &Api,
    service: &Service,
    method: &Method,
    template: &PathTemplate,
) -> Result<Option<TargetResource>> {
    let input = request_message(api, method)?;
    let mut field_paths = Vec::new();
    let mut annotated = true;
    for variable in template.variables() {
        let field = resolve_field_path(api, method, input, &variable.field_path)?;
        annotated &= field.resource_reference.is_some();
        field_paths.push(variable.field_path.clone());
    }
    if field_paths.is_empty() || !annotated {
        return Ok(None);
    }

    let segments = &template.segments;
    let Some(first) = segments
        .iter()
        .position(|s| matches!(s, PathSegment::Variable(_)))
    else {
        return Ok(None);
    };
    let last = segments
        .iter()
        .rposition(|s| matches!(s, PathSegment::Variable(_)))
        .unwrap_or(first);
    // `projects/{project}` keeps its collection literal; `{name=projects/*}`
    // already spans it.
    let start = match (first.checked_sub(1).map(|i| &segments[i]), &segments[first]) {
        (Some(PathSegment::Literal(_)), PathSegment::Variable(v)) if v.is_single_segment() => {
            first - 1
        }
        _ => first,
    };

    Ok(Some(TargetResource {
        field_paths,
        template: construct_template(api, service, &segments[start..=last])?,
    }))
}

fn heuristic_target(
    api: &Api,
    service: &Service,
    method: &Method,
    template: &PathTemplate,
    vocabulary: &BTreeSet<String>,
) -> Result<Option<TargetResource>> {
    if !is_heuristic_eligible(&service.id) {
        return Ok(None);
    }
    let segments = &template.segments;
    let is_pair = |i: usize| {
        i < segments.len() && collection_pair(&segments[i - 1], &segments[i], vocabulary).is_some()
    };
    // Only leading literals such as `compute/v1` may precede the resource
    // name; a variable before the first pair means that pair failed.
    let Some(start) = (1..segments.len()).find(|&i| is_pair(i)) else {
        tracing::debug!(method = %method.id, "no collection prefix in {}", template);
        return Ok(None);
    };
    if segments[..start - 1]
        .iter()
        .any(|s| matches!(s, PathSegment::Variable(_)))
    {
        tracing::debug!(method = %method.id, "unrecognized collection before {}", template);
        return Ok(None);
    }

    let input = request_message(api, method)?;
    let mut field_paths = Vec::new();
    let mut end = start;
    let mut i = start;
    while is_pair(i) {
        if let PathSegment::Variable(variable) = &segments[i] {
            resolve_field_path(api, method, input, &variable.field_path)?;
            field_paths.push(variable.field_path.clone());
        }
        end = i;
        i += 2;
    }

    Ok(Some(TargetResource {
        field_paths,
        template: construct_template(api, service, &segments[start - 1..=end])?,
    }))
}

/// A `collection/{id}` pair; returns the collection literal
fn collection_pair<'a>(
    literal: &'a PathSegment,
    variable: &PathSegment,
    vocabulary: &BTreeSet<String>,
) -> Option<&'a str> {
    match (literal, variable) {
        (PathSegment::Literal(literal), PathSegment::Variable(variable))
            if variable.is_single_segment() && is_collection_identifier(literal, vocabulary) =>
        {
            Some(literal)
        }
        _ => None,
    }
}

fn is_collection_identifier(literal: &str, vocabulary: &BTreeSet<String>) -> bool {
    if vocabulary.contains(literal) {
        return true;
    }
    literal.len() > 1
        && literal.ends_with('s')
        && literal.starts_with(|c: char| c.is_ascii_lowercase())
        && literal.chars().all(|c| c.is_ascii_alphanumeric())
        && !SINGULAR_EXCEPTIONS.contains(&literal)
}

/// Known collection names: the base vocabulary, resource plurals, and the
/// collection literals used by standard methods anywhere in the model
fn build_vocabulary(api: &Api) -> BTreeSet<String> {
    let mut vocabulary: BTreeSet<String> = BASE_VOCABULARY.iter().map(|s| s.to_string()).collect();
    vocabulary.extend(
        api.state
            .resource_by_type
            .values()
            .map(|r| r.plural.clone())
            .filter(|p| !p.is_empty()),
    );

    for method in api.state.method_by_id.values().filter(|m| m.is_aip_standard) {
        for binding in &method.path_info.bindings {
            let segments = &binding.path_template.segments;
            for pair in segments.windows(2) {
                if let [PathSegment::Literal(literal), PathSegment::Variable(_)] = pair {
                    vocabulary.insert(literal.clone());
                }
            }
            for variable in binding.path_template.variables() {
                for pair in variable.segments.windows(2) {
                    if pair[1] == "*" && pair[0] != "*" && pair[0] != "**" {
                        vocabulary.insert(pair[0].clone());
                    }
                }
            }
        }
    }
    vocabulary
}

fn request_message<'a>(api: &'a Api, method: &Method) -> Result<&'a Message> {
    api.message(&method.input_type_id)
        .ok_or_else(|| AnalyzerError::MissingInputType {
            method_id: method.id.clone(),
            type_id: method.input_type_id.clone(),
        })
}

/// Resolve a possibly nested field path (`parent.project`) in `message`
fn resolve_field_path<'a>(
    api: &'a Api,
    method: &Method,
    message: &'a Message,
    field_path: &[String],
) -> Result<&'a Field> {
    let missing = |message: &Message, field: &str| AnalyzerError::MissingField {
        method_id: method.id.clone(),
        message_id: message.id.clone(),
        field: field.to_string(),
    };
    let (last, intermediate) = field_path
        .split_last()
        .ok_or_else(|| missing(message, ""))?;

    let mut current = message;
    for name in intermediate {
        let field = current
            .field(name)
            .ok_or_else(|| missing(current, name.as_str()))?;
        current = api
            .field_message_type(field)
            .ok_or_else(|| AnalyzerError::MissingFieldMessageType {
                field_id: field.id.clone(),
                field_path: field_path.join("."),
            })?;
    }
    current
        .field(last)
        .ok_or_else(|| missing(current, last.as_str()))
}

/// `//{host}/{segment-or-{field.path}}...`
fn construct_template(api: &Api, service: &Service, segments: &[PathSegment]) -> Result<String> {
    let host = if !service.default_host.is_empty() {
        service.default_host.clone()
    } else if !api.name.is_empty() {
        format!("{}.googleapis.com", api.name)
    } else {
        return Err(AnalyzerError::MissingHost {
            service_id: service.id.clone(),
        });
    };

    let mut template = format!("//{}", host);
    for segment in segments {
        template.push('/');
        match segment {
            PathSegment::Literal(literal) => template.push_str(literal),
            PathSegment::Variable(variable) => {
                template.push('{');
                template.push_str(&variable.field_name());
                template.push('}');
            }
        }
    }
    Ok(template)
}
