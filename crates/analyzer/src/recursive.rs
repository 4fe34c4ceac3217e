//! Recursive field labeling

use apigen_common::{Api, Typez};
use std::collections::BTreeSet;

/// Mark fields whose type transitively contains the field's own message
pub fn label_recursive_fields(api: &mut Api) {
    let mut recursive = BTreeSet::new();
    for message in api.state.message_by_id.values() {
        for field in &message.fields {
            if field.typez == Typez::Message
                && contains_message(api, &field.typez_id, &message.id, &mut BTreeSet::new())
            {
                recursive.insert(field.id.clone());
            }
        }
    }

    tracing::debug!(recursive = recursive.len(), "labeled recursive fields");
    for message in api.state.message_by_id.values_mut() {
        for field in &mut message.fields {
            field.recursive = recursive.contains(&field.id);
        }
    }
}

fn contains_message<'a>(
    api: &'a Api,
    candidate: &'a str,
    target: &str,
    visited: &mut BTreeSet<&'a str>,
) -> bool {
    if candidate == target {
        return true;
    }
    if !visited.insert(candidate) {
        return false;
    }
    let Some(message) = api.message(candidate) else {
        return false;
    };
    message
        .fields
        .iter()
        .filter(|f| f.typez == Typez::Message)
        .any(|f| contains_message(api, &f.typez_id, target, visited))
}
