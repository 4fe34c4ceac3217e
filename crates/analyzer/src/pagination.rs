//! AIP-4233 pagination detection
//!
//! A method is paginated when its request has a page size and a page token,
//! and its response has a next page token and a field holding the items.

use apigen_common::config::PaginationOverride;
use apigen_common::{
    Api, Field, Message, PaginationInfo, Typez, INT32_VALUE_ID, UINT32_VALUE_ID,
};

/// Mark paginated methods and their response messages
///
/// Sets `Method.pagination` to the request's page token field and
/// `Message.pagination` on the response. Methods that do not have the full
/// shape are left untouched.
pub fn update_method_pagination(overrides: &[PaginationOverride], api: &mut Api) {
    let mut updates = Vec::new();
    for method in api.state.method_by_id.values() {
        let (Some(request), Some(response)) = (
            api.message(&method.input_type_id),
            api.message(&method.output_type_id),
        ) else {
            continue;
        };
        let item_override = overrides
            .iter()
            .find(|o| o.id == method.id)
            .map(|o| o.item_field.as_str());
        if let Some((page_token, info)) = pagination_shape(request, response, item_override) {
            updates.push((method.id.clone(), response.id.clone(), page_token, info));
        } else if let Some(item_field) = item_override {
            if response.field(item_field).is_none() {
                tracing::warn!(
                    method = %method.id,
                    item_field,
                    "pagination override names a field missing from {}",
                    response.id
                );
            }
        }
    }

    tracing::debug!(paginated = updates.len(), "updated method pagination");
    for (method_id, response_id, page_token, info) in updates {
        if let Some(method) = api.state.method_by_id.get_mut(&method_id) {
            method.pagination = Some(page_token);
        }
        if let Some(response) = api.state.message_by_id.get_mut(&response_id) {
            response.pagination = Some(info);
        }
    }
}

/// Returns the page token field name and the response pagination info
fn pagination_shape(
    request: &Message,
    response: &Message,
    item_override: Option<&str>,
) -> Option<(String, PaginationInfo)> {
    request.fields.iter().find(|f| is_page_size(f))?;
    let page_token = request
        .fields
        .iter()
        .find(|f| f.json_name == "pageToken" && f.typez == Typez::String)?;
    let pageable_item = match item_override {
        Some(name) => response.field(name)?,
        None => pageable_item(response)?,
    };
    let next_page_token = response
        .fields
        .iter()
        .find(|f| f.json_name == "nextPageToken" && f.typez == Typez::String)?;

    Some((
        page_token.name.clone(),
        PaginationInfo {
            next_page_token: next_page_token.name.clone(),
            pageable_item: pageable_item.name.clone(),
        },
    ))
}

fn is_page_size(field: &Field) -> bool {
    let integer = matches!(field.typez, Typez::Int32 | Typez::Uint32);
    match field.json_name.as_str() {
        "pageSize" => integer,
        // Older APIs use `maxResults`, sometimes as a wrapper type.
        "maxResults" => {
            integer
                || (field.typez == Typez::Message
                    && (field.typez_id == INT32_VALUE_ID || field.typez_id == UINT32_VALUE_ID))
        }
        _ => false,
    }
}

/// First repeated message field, or else the first map field
fn pageable_item(response: &Message) -> Option<&Field> {
    response
        .fields
        .iter()
        .find(|f| f.repeated && !f.map && f.typez == Typez::Message)
        .or_else(|| response.fields.iter().find(|f| f.map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_common::{Method, Service};

    const REQUEST: &str = ".test.v1.ListThingsRequest";
    const RESPONSE: &str = ".test.v1.ListThingsResponse";
    const METHOD: &str = ".test.v1.Things.ListThings";

    fn api_with(request: Message, response: Message) -> Api {
        let mut api = Api::new("test", "test.v1");
        api.add_message(Message::new("Thing", "test.v1", None));
        api.add_message(request);
        api.add_message(response);
        let service = Service::new("Things", "test.v1");
        let method = Method::new(&service, "ListThings", REQUEST, RESPONSE);
        api.add_service(service, vec![method]);
        api
    }

    fn request_fields() -> Vec<Field> {
        vec![
            Field::new("parent", Typez::String),
            Field::new("page_token", Typez::String),
            Field::new("page_size", Typez::Int32),
        ]
    }

    fn response_fields() -> Vec<Field> {
        vec![
            Field::new("next_page_token", Typez::String),
            Field::message("items", ".test.v1.Thing").repeated(),
        ]
    }

    fn message(name: &str, fields: Vec<Field>) -> Message {
        fields
            .into_iter()
            .fold(Message::new(name, "test.v1", None), |m, f| m.with_field(f))
    }

    fn paginate(request: Vec<Field>, response: Vec<Field>, overrides: &[PaginationOverride]) -> Api {
        let mut api = api_with(
            message("ListThingsRequest", request),
            message("ListThingsResponse", response),
        );
        update_method_pagination(overrides, &mut api);
        api
    }

    #[test]
    fn test_paginated_method() {
        let api = paginate(request_fields(), response_fields(), &[]);

        let method = api.method(METHOD).unwrap();
        let request = api.message(REQUEST).unwrap();
        assert_eq!(method.pagination.as_deref(), Some("page_token"));
        assert_eq!(
            api.message(&method.input_type_id)
                .and_then(|m| m.field(method.pagination.as_deref()?)),
            Some(&request.fields[1])
        );
        assert_eq!(
            api.message(RESPONSE).unwrap().pagination,
            Some(PaginationInfo {
                next_page_token: "next_page_token".to_string(),
                pageable_item: "items".to_string(),
            })
        );
    }

    #[test]
    fn test_each_required_field_is_needed() {
        // `parent` (index 0) is not part of the shape.
        for i in [1, 2] {
            let mut request = request_fields();
            request.remove(i);
            let api = paginate(request, response_fields(), &[]);
            assert_eq!(api.method(METHOD).unwrap().pagination, None, "request {i}");
        }
        for i in 0..2 {
            let mut response = response_fields();
            response.remove(i);
            let api = paginate(request_fields(), response, &[]);
            assert_eq!(api.method(METHOD).unwrap().pagination, None, "response {i}");
            assert_eq!(api.message(RESPONSE).unwrap().pagination, None);
        }
    }

    #[test]
    fn test_wrong_types_are_not_paginated() {
        let mut request = request_fields();
        request[2] = Field::new("page_size", Typez::Int64);
        let api = paginate(request, response_fields(), &[]);
        assert_eq!(api.method(METHOD).unwrap().pagination, None);

        let mut request = request_fields();
        request[1] = Field::new("page_token", Typez::Bytes);
        let api = paginate(request, response_fields(), &[]);
        assert_eq!(api.method(METHOD).unwrap().pagination, None);
    }

    #[test]
    fn test_legacy_max_results() {
        let mut request = request_fields();
        request[2] = Field::new("max_results", Typez::Uint32);
        let api = paginate(request, response_fields(), &[]);
        assert!(api.method(METHOD).unwrap().pagination.is_some());

        let mut request = request_fields();
        request[2] = Field::message("max_results", INT32_VALUE_ID);
        let api = paginate(request, response_fields(), &[]);
        assert!(api.method(METHOD).unwrap().pagination.is_some());

        let mut request = request_fields();
        request[2] = Field::message("max_results", ".google.protobuf.Int64Value");
        let api = paginate(request, response_fields(), &[]);
        assert!(api.method(METHOD).unwrap().pagination.is_none());
    }

    #[test]
    fn test_repeated_preferred_over_map() {
        let map = Field::message("by_name", ".test.v1.ListThingsResponse.ByNameEntry").map();
        let repeated = Field::message("items", ".test.v1.Thing").repeated();
        let token = Field::new("next_page_token", Typez::String);

        for response in [
            vec![token.clone(), map.clone(), repeated.clone()],
            vec![token.clone(), repeated.clone(), map.clone()],
        ] {
            let api = paginate(request_fields(), response, &[]);
            let info = api.message(RESPONSE).unwrap().pagination.clone().unwrap();
            assert_eq!(info.pageable_item, "items");
        }
    }

    #[test]
    fn test_map_used_without_repeated_field() {
        let response = vec![
            Field::new("next_page_token", Typez::String),
            Field::message("by_name", ".test.v1.ListThingsResponse.ByNameEntry").map(),
        ];
        let api = paginate(request_fields(), response, &[]);
        let info = api.message(RESPONSE).unwrap().pagination.clone().unwrap();
        assert_eq!(info.pageable_item, "by_name");
    }

    #[test]
    fn test_item_field_override() {
        let mut response = response_fields();
        response.push(Field::message("other_items", ".test.v1.Thing").repeated());
        let overrides = vec![PaginationOverride {
            id: METHOD.to_string(),
            item_field: "other_items".to_string(),
        }];
        let api = paginate(request_fields(), response, &overrides);
        let info = api.message(RESPONSE).unwrap().pagination.clone().unwrap();
        assert_eq!(info.pageable_item, "other_items");
    }

    #[test]
    fn test_bad_item_field_override() {
        let overrides = vec![PaginationOverride {
            id: METHOD.to_string(),
            item_field: "missing".to_string(),
        }];
        let api = paginate(request_fields(), response_fields(), &overrides);
        assert_eq!(api.method(METHOD).unwrap().pagination, None);
        assert_eq!(api.message(RESPONSE).unwrap().pagination, None);
    }
}
