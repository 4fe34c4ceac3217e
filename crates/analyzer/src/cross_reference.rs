//! Resolve every ID-shaped reference in a preliminary model
//!
//! Raw parsers fill `ApiState` and the string IDs (`typez_id`,
//! `input_type_id`, ...). This pass verifies each ID against the state maps
//! and records the resolved back references. Assignments overwrite, so the
//! pass can run again on an already resolved model.

use crate::{samples, AnalyzerError, Result};
use apigen_common::{Api, ApiState, Typez};
use std::collections::BTreeSet;

/// Resolve all references in `api`, then run sample enrichment
pub fn cross_reference(api: &mut Api) -> Result<()> {
    resolve_fields(&mut api.state)?;
    resolve_enums(&mut api.state);
    resolve_methods(&mut api.state)?;
    resolve_services(api)?;
    samples::enrich_samples(api);

    tracing::debug!(
        messages = api.state.message_by_id.len(),
        enums = api.state.enum_by_id.len(),
        services = api.state.service_by_id.len(),
        methods = api.state.method_by_id.len(),
        "cross-referenced model {}",
        api.name
    );
    Ok(())
}

fn resolve_fields(state: &mut ApiState) -> Result<()> {
    let message_ids: BTreeSet<String> = state.message_by_id.keys().cloned().collect();
    let enum_ids: BTreeSet<String> = state.enum_by_id.keys().cloned().collect();

    for message in state.message_by_id.values_mut() {
        let message_id = message.id.clone();
        for field in &mut message.fields {
            field.parent = Some(message_id.clone());
            match field.typez {
                Typez::Message => {
                    if !message_ids.contains(&field.typez_id) {
                        return Err(AnalyzerError::MissingMessageType {
                            field_id: field.id.clone(),
                            type_id: field.typez_id.clone(),
                        });
                    }
                    field.message_type = Some(field.typez_id.clone());
                }
                Typez::Enum => {
                    if !enum_ids.contains(&field.typez_id) {
                        return Err(AnalyzerError::MissingEnumType {
                            field_id: field.id.clone(),
                            type_id: field.typez_id.clone(),
                        });
                    }
                    field.enum_type = Some(field.typez_id.clone());
                }
                _ => {}
            }
        }

        let fields = &mut message.fields;
        for one_of in &message.one_ofs {
            for field_id in &one_of.fields {
                let field = fields
                    .iter_mut()
                    .find(|f| &f.id == field_id)
                    .ok_or_else(|| AnalyzerError::MissingOneOfField {
                        one_of_id: one_of.id.clone(),
                        field_id: field_id.clone(),
                    })?;
                field.group = Some(one_of.id.clone());
                field.parent = Some(message_id.clone());
            }
        }
    }
    Ok(())
}

fn resolve_enums(state: &mut ApiState) {
    for enumeration in state.enum_by_id.values_mut() {
        for value in &mut enumeration.values {
            value.parent = Some(enumeration.id.clone());
        }
    }
}

fn resolve_methods(state: &mut ApiState) -> Result<()> {
    let ApiState {
        message_by_id,
        method_by_id,
        ..
    } = state;

    for method in method_by_id.values_mut() {
        if !message_by_id.contains_key(&method.input_type_id) {
            return Err(AnalyzerError::MissingInputType {
                method_id: method.id.clone(),
                type_id: method.input_type_id.clone(),
            });
        }
        if !message_by_id.contains_key(&method.output_type_id) {
            return Err(AnalyzerError::MissingOutputType {
                method_id: method.id.clone(),
                type_id: method.output_type_id.clone(),
            });
        }
        method.input_type = Some(method.input_type_id.clone());
        method.output_type = Some(method.output_type_id.clone());
        if let Some(info) = &mut method.operation_info {
            info.method_id = Some(method.id.clone());
        }
    }
    Ok(())
}

fn resolve_services(api: &mut Api) -> Result<()> {
    let model_name = api.name.clone();
    let ApiState {
        service_by_id,
        method_by_id,
        ..
    } = &mut api.state;
    let service_ids: BTreeSet<String> = service_by_id.keys().cloned().collect();

    for service in service_by_id.values_mut() {
        service.model = Some(model_name.clone());
        for method_id in &service.methods {
            let method =
                method_by_id
                    .get_mut(method_id)
                    .ok_or_else(|| AnalyzerError::MissingElement {
                        kind: "method",
                        id: method_id.clone(),
                    })?;
            method.model = Some(model_name.clone());
            method.service = Some(service.id.clone());
            // Mixins from sources without explicit mixin services belong to
            // the service that lists them.
            method.source_service = if service_ids.contains(&method.source_service_id) {
                Some(method.source_service_id.clone())
            } else {
                Some(service.id.clone())
            };
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_common::{Enum, EnumValue, Field, Message, Method, OneOf, OperationInfo, Service};

    fn sample_api() -> Api {
        let mut api = Api::new("test", "test.v1");
        let color = Enum::new("Color", "test.v1", None)
            .with_value("COLOR_UNSPECIFIED", 0)
            .with_value("RED", 1);
        let inner =
            Message::new("Inner", "test.v1", None).with_field(Field::new("id", Typez::String));
        let mut outer = Message::new("Outer", "test.v1", None)
            .with_field(Field::message("inner", ".test.v1.Inner"))
            .with_field(Field::enumeration("color", ".test.v1.Color"))
            .with_field(Field::new("a", Typez::String))
            .with_field(Field::new("b", Typez::Int32));
        outer.one_ofs.push(OneOf {
            name: "choice".to_string(),
            id: ".test.v1.Outer.choice".to_string(),
            fields: vec![".test.v1.Outer.a".to_string(), ".test.v1.Outer.b".to_string()],
            ..Default::default()
        });
        api.add_enum(color);
        api.add_message(inner);
        api.add_message(outer);

        let service = Service::new("Things", "test.v1");
        let method = Method::new(&service, "GetOuter", ".test.v1.Inner", ".test.v1.Outer")
            .with_operation_info(OperationInfo {
                response_type_id: ".test.v1.Outer".to_string(),
                metadata_type_id: ".test.v1.Inner".to_string(),
                method_id: None,
            });
        api.add_service(service, vec![method]);
        api
    }

    #[test]
    fn test_resolves_field_types() {
        let mut api = sample_api();
        cross_reference(&mut api).unwrap();

        let outer = api.message(".test.v1.Outer").unwrap();
        for field in &outer.fields {
            assert_eq!(field.parent.as_deref(), Some(".test.v1.Outer"));
        }
        let inner = outer.field("inner").unwrap();
        assert_eq!(inner.message_type.as_deref(), Some(inner.typez_id.as_str()));
        assert_eq!(api.field_message_type(inner).unwrap().name, "Inner");
        let color = outer.field("color").unwrap();
        assert_eq!(api.field_enum_type(color).unwrap().name, "Color");
    }

    #[test]
    fn test_resolves_one_of_groups() {
        let mut api = sample_api();
        cross_reference(&mut api).unwrap();

        let outer = api.message(".test.v1.Outer").unwrap();
        assert_eq!(
            outer.field("a").unwrap().group.as_deref(),
            Some(".test.v1.Outer.choice")
        );
        assert_eq!(
            outer.field("b").unwrap().group.as_deref(),
            Some(".test.v1.Outer.choice")
        );
        assert_eq!(outer.field("inner").unwrap().group, None);
    }

    #[test]
    fn test_resolves_methods_and_services() {
        let mut api = sample_api();
        cross_reference(&mut api).unwrap();

        let method = api.method(".test.v1.Things.GetOuter").unwrap();
        assert_eq!(api.input_type(method).unwrap().name, "Inner");
        assert_eq!(api.output_type(method).unwrap().name, "Outer");
        assert_eq!(method.service.as_deref(), Some(".test.v1.Things"));
        assert_eq!(method.source_service.as_deref(), Some(".test.v1.Things"));
        assert_eq!(method.model.as_deref(), Some("test"));
        assert_eq!(
            method.operation_info.as_ref().unwrap().method_id.as_deref(),
            Some(".test.v1.Things.GetOuter")
        );
        let service = api.service(".test.v1.Things").unwrap();
        assert_eq!(service.model.as_deref(), Some("test"));

        let color = api.enumeration(".test.v1.Color").unwrap();
        assert!(color
            .values
            .iter()
            .all(|v: &EnumValue| v.parent.as_deref() == Some(".test.v1.Color")));
    }

    #[test]
    fn test_source_service_for_mixins() {
        let mut api = sample_api();
        let mixin = Service::new("Locations", "google.cloud.location");
        api.add_service(mixin, vec![]);
        api.method_mut(".test.v1.Things.GetOuter").unwrap().source_service_id =
            ".google.cloud.location.Locations".to_string();
        cross_reference(&mut api).unwrap();

        let method = api.method(".test.v1.Things.GetOuter").unwrap();
        assert_eq!(
            method.source_service.as_deref(),
            Some(".google.cloud.location.Locations")
        );
        assert_eq!(method.service.as_deref(), Some(".test.v1.Things"));
    }

    #[test]
    fn test_is_idempotent() {
        let mut api = sample_api();
        cross_reference(&mut api).unwrap();
        let first = api.clone();
        cross_reference(&mut api).unwrap();
        assert_eq!(first, api);
    }

    #[test]
    fn test_missing_message_type() {
        let mut api = sample_api();
        api.message_mut(".test.v1.Outer")
            .unwrap()
            .fields
            .push(Field::message("ghost", ".test.v1.Ghost"));
        let err = cross_reference(&mut api).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::MissingMessageType { ref type_id, .. } if type_id == ".test.v1.Ghost"
        ));
    }

    #[test]
    fn test_missing_enum_type() {
        let mut api = sample_api();
        api.message_mut(".test.v1.Inner")
            .unwrap()
            .fields
            .push(Field::enumeration("shade", ".test.v1.Shade"));
        let err = cross_reference(&mut api).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingEnumType { .. }));
    }

    #[test]
    fn test_missing_method_types() {
        let mut api = sample_api();
        api.method_mut(".test.v1.Things.GetOuter").unwrap().input_type_id =
            ".test.v1.Missing".to_string();
        let err = cross_reference(&mut api).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingInputType { .. }));

        let mut api = sample_api();
        api.method_mut(".test.v1.Things.GetOuter").unwrap().output_type_id =
            ".test.v1.Missing".to_string();
        let err = cross_reference(&mut api).unwrap_err();
        assert!(err.to_string().contains(".test.v1.Missing"));
    }
}
