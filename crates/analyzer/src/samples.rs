//! Sample enrichment: representative enum values, oneof example fields and
//! per-method AIP classification

use crate::standard_methods;
use apigen_common::{Api, Enum, Field, OneOf, Typez};
use std::collections::BTreeSet;

/// Runs as the last step of cross-referencing
pub(crate) fn enrich_samples(api: &mut Api) {
    for enumeration in api.state.enum_by_id.values_mut() {
        enrich_enum(enumeration);
    }
    for message in api.state.message_by_id.values_mut() {
        let fields = &message.fields;
        for one_of in &mut message.one_ofs {
            one_of.example_field = example_field(one_of, fields).map(|f| f.id.clone());
        }
    }

    let classified: Vec<_> = api
        .state
        .method_by_id
        .values()
        .map(|method| (method.id.clone(), standard_methods::classify(api, method)))
        .collect();
    for (method_id, classification) in classified {
        if let Some(method) = api.state.method_by_id.get_mut(&method_id) {
            classification.apply(method);
        }
    }
}

fn enrich_enum(enumeration: &mut Enum) {
    let mut seen = BTreeSet::new();
    enumeration.unique_number_values = enumeration
        .values
        .iter()
        .filter(|v| seen.insert(v.number))
        .map(|v| v.name.clone())
        .collect();

    let non_default: Vec<_> = enumeration.values.iter().filter(|v| v.number != 0).collect();
    let preferred: Vec<_> = non_default.iter().filter(|v| !v.deprecated).collect();
    enumeration.values_for_examples = if !preferred.is_empty() {
        preferred.iter().map(|v| v.name.clone()).collect()
    } else if !non_default.is_empty() {
        non_default.iter().map(|v| v.name.clone()).collect()
    } else {
        enumeration.values.iter().map(|v| v.name.clone()).collect()
    };
}

/// Simplest member of the oneof; the first declared wins ties
fn example_field<'a>(one_of: &OneOf, fields: &'a [Field]) -> Option<&'a Field> {
    fields
        .iter()
        .filter(|f| one_of.fields.contains(&f.id))
        .min_by_key(|f| (f.deprecated, f.map, f.repeated, f.typez == Typez::Message))
}
