//! Configuration-driven model edits: skipped/included IDs, documentation
//! overrides and API name overrides

use crate::{AnalyzerError, Result};
use apigen_common::config::{DocumentationOverride, GeneratorConfig};
use apigen_common::{Api, ApiState};
use std::collections::BTreeSet;

/// Prune the model by element ID
///
/// Skipped services and methods leave the model entirely. Skipped messages
/// and enums are only unlisted, so fields that still use them resolve.
/// A non-empty `included` list keeps only the listed top-level elements, and
/// inside a kept service only the listed methods if any of them is listed.
pub fn apply_filters(api: &mut Api, skipped: &[String], included: &[String]) {
    let skipped: BTreeSet<&str> = skipped.iter().map(String::as_str).collect();
    let included: BTreeSet<&str> = included.iter().map(String::as_str).collect();

    let dropped_services: Vec<String> = api
        .services
        .iter()
        .filter(|id| {
            skipped.contains(id.as_str()) || (!included.is_empty() && !included.contains(id.as_str()))
        })
        .cloned()
        .collect();
    for id in &dropped_services {
        remove_service(api, id);
    }

    let mut dropped_methods = Vec::new();
    for service in api.state.service_by_id.values_mut() {
        let restrict = service.methods.iter().any(|id| included.contains(id.as_str()));
        service.methods.retain(|id| {
            let keep = !skipped.contains(id.as_str()) && (!restrict || included.contains(id.as_str()));
            if !keep {
                dropped_methods.push(id.clone());
            }
            keep
        });
    }
    for id in &dropped_methods {
        api.state.method_by_id.remove(id);
    }

    let listed = |id: &String| !skipped.contains(id.as_str());
    let top_level = |id: &String| listed(id) && (included.is_empty() || included.contains(id.as_str()));
    api.messages.retain(top_level);
    api.enums.retain(top_level);
    for message in api.state.message_by_id.values_mut() {
        message.messages.retain(listed);
        message.enums.retain(listed);
    }

    tracing::debug!(
        services = dropped_services.len(),
        methods = dropped_methods.len(),
        "applied filters to model {}",
        api.name
    );
}

fn remove_service(api: &mut Api, id: &str) {
    api.services.retain(|s| s != id);
    if let Some(service) = api.state.service_by_id.remove(id) {
        for method_id in &service.methods {
            api.state.method_by_id.remove(method_id);
        }
    }
}

/// Replace the first occurrence of `match` in the documentation of each
/// overridden element
pub fn apply_documentation_overrides(
    api: &mut Api,
    overrides: &[DocumentationOverride],
) -> Result<()> {
    for doc_override in overrides {
        let error = |reason: &str| AnalyzerError::DocumentationOverride {
            id: doc_override.id.clone(),
            reason: reason.to_string(),
        };
        let documentation = documentation_mut(&mut api.state, &doc_override.id)
            .ok_or_else(|| error("no element with this ID"))?;
        if !documentation.contains(&doc_override.match_) {
            return Err(error(&format!(
                "documentation does not contain {:?}",
                doc_override.match_
            )));
        }
        *documentation = documentation.replacen(&doc_override.match_, &doc_override.replace, 1);
    }
    if !overrides.is_empty() {
        tracing::debug!(overrides = overrides.len(), "applied documentation overrides");
    }
    Ok(())
}

/// Documentation of the message, enum, service, method, field or enum value
/// with this ID
fn documentation_mut<'a>(state: &'a mut ApiState, id: &str) -> Option<&'a mut String> {
    if state.message_by_id.contains_key(id) {
        return state.message_by_id.get_mut(id).map(|m| &mut m.documentation);
    }
    if state.enum_by_id.contains_key(id) {
        return state.enum_by_id.get_mut(id).map(|e| &mut e.documentation);
    }
    if let Some(service) = state.service_by_id.get_mut(id) {
        return Some(&mut service.documentation);
    }
    if let Some(method) = state.method_by_id.get_mut(id) {
        return Some(&mut method.documentation);
    }

    let (parent, _) = id.rsplit_once('.')?;
    if state.message_by_id.contains_key(parent) {
        return state
            .message_by_id
            .get_mut(parent)?
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .map(|f| &mut f.documentation);
    }
    state
        .enum_by_id
        .get_mut(parent)?
        .values
        .iter_mut()
        .find(|v| v.id == id)
        .map(|v| &mut v.documentation)
}

/// Name, title and description overrides
pub fn apply_api_overrides(api: &mut Api, config: &GeneratorConfig) {
    if let Some(name) = &config.name_override {
        api.name = name.clone();
        for service in api.state.service_by_id.values_mut() {
            service.model = Some(name.clone());
        }
        for method in api.state.method_by_id.values_mut() {
            method.model = Some(name.clone());
        }
    }
    if let Some(title) = &config.title_override {
        api.title = title.clone();
    }
    if let Some(description) = &config.description_override {
        api.description = description.clone();
    }
}
