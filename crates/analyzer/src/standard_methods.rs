//! AIP standard method classification
//!
//! Recognizes Get (AIP-131), List (AIP-132), Create (AIP-133),
//! Update (AIP-134), Delete (AIP-135) and Undelete (AIP-164) methods from
//! their names, request/response messages and resource annotations:
//! - GetSecret(GetSecretRequest) -> Secret
//! - ListSecrets(ListSecretsRequest) -> ListSecretsResponse
//! - CreateSecret(CreateSecretRequest) -> Secret
//!
//! Every check is a pure function of the cross-referenced model.

use apigen_common::naming::to_snake_case;
use apigen_common::{
    type_name, AipStandardCreateInfo, AipStandardDeleteInfo, AipStandardGetInfo,
    AipStandardListInfo, AipStandardUndeleteInfo, AipStandardUpdateInfo, Api, Field, Message,
    Method, Resource, Typez, FIELD_MASK_ID,
};

/// Derived flags and standard method information for one method
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Classification {
    pub is_simple: bool,
    pub is_lro: bool,
    pub is_list: bool,
    pub is_streaming: bool,
    pub get: Option<AipStandardGetInfo>,
    pub delete: Option<AipStandardDeleteInfo>,
    pub undelete: Option<AipStandardUndeleteInfo>,
    pub create: Option<AipStandardCreateInfo>,
    pub update: Option<AipStandardUpdateInfo>,
    pub list: Option<AipStandardListInfo>,
}

impl Classification {
    pub fn is_aip_standard(&self) -> bool {
        self.get.is_some()
            || self.delete.is_some()
            || self.undelete.is_some()
            || self.create.is_some()
            || self.update.is_some()
            || self.list.is_some()
    }

    pub fn apply(self, method: &mut Method) {
        method.is_aip_standard = self.is_aip_standard();
        method.is_simple = self.is_simple;
        method.is_lro = self.is_lro;
        method.is_list = self.is_list;
        method.is_streaming = self.is_streaming;
        method.aip_standard_get_info = self.get;
        method.aip_standard_delete_info = self.delete;
        method.aip_standard_undelete_info = self.undelete;
        method.aip_standard_create_info = self.create;
        method.aip_standard_update_info = self.update;
        method.aip_standard_list_info = self.list;
    }
}

pub(crate) fn classify(api: &Api, method: &Method) -> Classification {
    let is_streaming = method.client_side_streaming || method.server_side_streaming;
    let is_lro = method.operation_info.is_some();
    let is_list = api
        .message(&method.output_type_id)
        .is_some_and(|m| m.pagination.is_some());
    let is_simple = method.pagination.is_none()
        && !is_streaming
        && method.operation_info.is_none()
        && method.discovery_lro.is_none();

    let mut classification = Classification {
        is_simple,
        is_lro,
        is_list,
        is_streaming,
        ..Default::default()
    };
    classification.get = get_info(api, method, &classification);
    classification.delete = delete_info(api, method, &classification);
    classification.undelete = undelete_info(api, method, &classification);
    classification.create = create_info(api, method, &classification);
    classification.update = update_info(api, method, &classification);
    classification.list = list_info(api, method, &classification);
    classification
}

fn get_info(api: &Api, method: &Method, c: &Classification) -> Option<AipStandardGetInfo> {
    if !c.is_simple || method.returns_empty() {
        return None;
    }
    let input = api.message(&method.input_type_id)?;
    let singular = strip_prefix_ignore_case(&method.name, "get")?;
    if !input
        .name
        .eq_ignore_ascii_case(&format!("get{}request", singular))
    {
        return None;
    }
    let resource = standard_output_resource(api, method)?;
    if !singular_matches(resource, singular) {
        return None;
    }
    let field = find_resource_field_by_type(input, &resource.type_)?;
    Some(AipStandardGetInfo {
        resource_name_request_field: field.name.clone(),
    })
}

fn delete_info(api: &Api, method: &Method, c: &Classification) -> Option<AipStandardDeleteInfo> {
    let field = name_only_request_field(api, method, c, "delete")?;
    Some(AipStandardDeleteInfo {
        resource_name_request_field: field.name.clone(),
    })
}

fn undelete_info(
    api: &Api,
    method: &Method,
    c: &Classification,
) -> Option<AipStandardUndeleteInfo> {
    let field = name_only_request_field(api, method, c, "undelete")?;
    Some(AipStandardUndeleteInfo {
        resource_name_request_field: field.name.clone(),
    })
}

/// Shared shape of Delete and Undelete: the request carries the resource
/// name, matched by the singular name of the referenced resource type.
fn name_only_request_field<'a>(
    api: &'a Api,
    method: &Method,
    c: &Classification,
    verb: &str,
) -> Option<&'a Field> {
    if !(c.is_simple || c.is_lro) {
        return None;
    }
    let input = api.message(&method.input_type_id)?;
    let singular = strip_prefix_ignore_case(&method.name, verb)?;
    if !input
        .name
        .eq_ignore_ascii_case(&format!("{}{}request", verb, singular))
    {
        return None;
    }
    find_resource_field_by_singular(api, input, singular)
}

fn create_info(api: &Api, method: &Method, c: &Classification) -> Option<AipStandardCreateInfo> {
    if !(c.is_simple || c.is_lro) || method.returns_empty() {
        return None;
    }
    let input = api.message(&method.input_type_id)?;
    let singular = strip_prefix_ignore_case(&method.name, "create")?;
    if !input
        .name
        .eq_ignore_ascii_case(&format!("create{}request", singular))
    {
        return None;
    }
    let output = standard_output_message(api, method)?;
    let resource = output.resource.as_ref()?;
    let parent = find_parent_field(input, &resource.type_)?;
    let body = find_body_field(input, method, &output.id)?;
    let resource_id = input
        .field(&format!("{}_id", to_snake_case(singular)))
        .filter(|f| f.typez == Typez::String);

    Some(AipStandardCreateInfo {
        parent_request_field: parent.name.clone(),
        resource_id_request_field: resource_id.map(|f| f.name.clone()),
        resource_request_field: body.name.clone(),
    })
}

fn update_info(api: &Api, method: &Method, c: &Classification) -> Option<AipStandardUpdateInfo> {
    if !(c.is_simple || c.is_lro) || method.returns_empty() {
        return None;
    }
    let input = api.message(&method.input_type_id)?;
    let singular = strip_prefix_ignore_case(&method.name, "update")?;
    if !input
        .name
        .eq_ignore_ascii_case(&format!("update{}request", singular))
    {
        return None;
    }
    let output = standard_output_message(api, method)?;
    output.resource.as_ref()?;
    let body = find_body_field(input, method, &output.id)?;
    let is_field_mask = |f: &&Field| f.typez == Typez::Message && f.typez_id == FIELD_MASK_ID;
    let update_mask = input
        .fields
        .iter()
        .filter(is_field_mask)
        .find(|f| f.name == "update_mask")
        .or_else(|| input.fields.iter().find(is_field_mask))?;

    Some(AipStandardUpdateInfo {
        resource_request_field: body.name.clone(),
        update_mask_request_field: update_mask.name.clone(),
    })
}

fn list_info(api: &Api, method: &Method, c: &Classification) -> Option<AipStandardListInfo> {
    if !c.is_list {
        return None;
    }
    let input = api.message(&method.input_type_id)?;
    let output = api.message(&method.output_type_id)?;
    let plural = strip_prefix_ignore_case(&method.name, "list")?;
    if !input
        .name
        .eq_ignore_ascii_case(&format!("list{}request", plural))
        || !output
            .name
            .eq_ignore_ascii_case(&format!("list{}response", plural))
    {
        return None;
    }
    let item = output.field(&output.pagination.as_ref()?.pageable_item)?;
    let resource = api.message(&item.typez_id)?.resource.as_ref()?;
    let parent = find_parent_field(input, &resource.type_)?;
    Some(AipStandardListInfo {
        parent_request_field: parent.name.clone(),
    })
}

/// Strip `prefix` case-insensitively, requiring a non-empty remainder
fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    let rest = name.get(prefix.len()..)?;
    (head.eq_ignore_ascii_case(prefix) && !rest.is_empty()).then_some(rest)
}

fn singular_matches(resource: &Resource, singular: &str) -> bool {
    resource.singular.is_empty() || resource.singular.eq_ignore_ascii_case(singular)
}

/// Message carrying the resource a standard method returns: the output
/// type, or the operation response type for long-running methods
fn standard_output_message<'a>(api: &'a Api, method: &Method) -> Option<&'a Message> {
    match &method.operation_info {
        Some(info) => api.message(&info.response_type_id),
        None => api.message(&method.output_type_id),
    }
}

fn standard_output_resource<'a>(api: &'a Api, method: &Method) -> Option<&'a Resource> {
    standard_output_message(api, method)?.resource.as_ref()
}

fn find_resource_field_by_type<'a>(input: &'a Message, resource_type: &str) -> Option<&'a Field> {
    let references = |f: &&Field| {
        f.resource_reference
            .as_ref()
            .is_some_and(|r| r.type_ == resource_type)
    };
    input
        .fields
        .iter()
        .filter(references)
        .find(|f| f.name == "name")
        .or_else(|| input.fields.iter().find(references))
        .or_else(|| {
            // `name` fields referencing any resource type ("*")
            input.fields.iter().find(|f| {
                f.name == "name" && f.resource_reference.as_ref().is_some_and(|r| r.type_ == "*")
            })
        })
}

fn find_resource_field_by_singular<'a>(
    api: &Api,
    input: &'a Message,
    singular: &str,
) -> Option<&'a Field> {
    let references = |f: &&Field| {
        f.resource_reference.as_ref().is_some_and(|r| {
            let referenced = api
                .resource(&r.type_)
                .map(|resource| resource.singular.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| type_name(&r.type_));
            referenced.eq_ignore_ascii_case(singular)
        })
    };
    input
        .fields
        .iter()
        .filter(references)
        .find(|f| f.name == "name")
        .or_else(|| input.fields.iter().find(references))
}

fn find_parent_field<'a>(input: &'a Message, resource_type: &str) -> Option<&'a Field> {
    input
        .fields
        .iter()
        .find(|f| {
            f.resource_reference
                .as_ref()
                .is_some_and(|r| r.child_type == resource_type)
        })
        .or_else(|| input.field("parent"))
}

fn find_body_field<'a>(input: &'a Message, method: &Method, resource_id: &str) -> Option<&'a Field> {
    input
        .fields
        .iter()
        .find(|f| f.typez == Typez::Message && f.typez_id == resource_id)
        .or_else(|| {
            method
                .path_info
                .body_field_path
                .as_deref()
                .and_then(|body| input.field(body))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_common::{
        Field, Message, OperationInfo, PaginationInfo, ResourceReference, Service, EMPTY_MESSAGE_ID,
    };

    const PKG: &str = "test.v1";
    const SECRET_TYPE: &str = "test.googleapis.com/Secret";

    fn secret() -> Message {
        Message::new("Secret", PKG, None)
            .with_field(Field::new("name", Typez::String))
            .with_resource(Resource::new(SECRET_TYPE).with_names("secret", "secrets"))
    }

    fn name_field() -> Field {
        Field::new("name", Typez::String)
            .with_resource_reference(ResourceReference::to_type(SECRET_TYPE))
    }

    fn parent_field() -> Field {
        Field::new("parent", Typez::String)
            .with_resource_reference(ResourceReference::to_child_type(SECRET_TYPE))
    }

    fn classify_one(messages: Vec<Message>, method: impl FnOnce(&Service) -> Method) -> Classification {
        let mut api = Api::new("test", PKG);
        api.add_message(secret());
        api.add_dependency_message(Message::new("Empty", "google.protobuf", None));
        api.add_dependency_message(Message::new("FieldMask", "google.protobuf", None));
        api.add_dependency_message(Message::new("Operation", "google.longrunning", None));
        for message in messages {
            api.add_message(message);
        }
        let service = Service::new("SecretService", PKG);
        let method = method(&service);
        classify(&api, &method)
    }

    #[test]
    fn test_get() {
        let request = Message::new("GetSecretRequest", PKG, None).with_field(name_field());
        let c = classify_one(vec![request], |s| {
            Method::new(s, "GetSecret", ".test.v1.GetSecretRequest", ".test.v1.Secret")
        });
        assert!(c.is_simple);
        assert_eq!(
            c.get,
            Some(AipStandardGetInfo {
                resource_name_request_field: "name".to_string()
            })
        );
        assert!(c.is_aip_standard());
        assert_eq!(c.delete, None);
    }

    #[test]
    fn test_get_requires_matching_request_name() {
        let request = Message::new("FetchSecretRequest", PKG, None).with_field(name_field());
        let c = classify_one(vec![request], |s| {
            Method::new(s, "GetSecret", ".test.v1.FetchSecretRequest", ".test.v1.Secret")
        });
        assert_eq!(c.get, None);
        assert!(!c.is_aip_standard());
    }

    #[test]
    fn test_get_rejects_mismatched_singular() {
        let request = Message::new("GetSecretDataRequest", PKG, None).with_field(name_field());
        let c = classify_one(vec![request], |s| {
            Method::new(s, "GetSecretData", ".test.v1.GetSecretDataRequest", ".test.v1.Secret")
        });
        assert_eq!(c.get, None);
    }

    #[test]
    fn test_get_prefers_name_field() {
        let request = Message::new("GetSecretRequest", PKG, None)
            .with_field(
                Field::new("secret", Typez::String)
                    .with_resource_reference(ResourceReference::to_type(SECRET_TYPE)),
            )
            .with_field(name_field());
        let c = classify_one(vec![request], |s| {
            Method::new(s, "GetSecret", ".test.v1.GetSecretRequest", ".test.v1.Secret")
        });
        assert_eq!(c.get.unwrap().resource_name_request_field, "name");
    }

    #[test]
    fn test_delete_and_undelete() {
        let delete = Message::new("DeleteSecretRequest", PKG, None).with_field(name_field());
        let c = classify_one(vec![delete], |s| {
            Method::new(s, "DeleteSecret", ".test.v1.DeleteSecretRequest", EMPTY_MESSAGE_ID)
        });
        assert_eq!(
            c.delete,
            Some(AipStandardDeleteInfo {
                resource_name_request_field: "name".to_string()
            })
        );

        let undelete = Message::new("UndeleteSecretRequest", PKG, None).with_field(name_field());
        let c = classify_one(vec![undelete], |s| {
            Method::new(s, "UndeleteSecret", ".test.v1.UndeleteSecretRequest", ".test.v1.Secret")
        });
        assert_eq!(c.delete, None);
        assert_eq!(
            c.undelete.unwrap().resource_name_request_field,
            "name".to_string()
        );
    }

    #[test]
    fn test_delete_matches_by_singular_name() {
        // The referenced type is not registered; its type name is used.
        let request = Message::new("DeleteWidgetRequest", PKG, None).with_field(
            Field::new("widget", Typez::String)
                .with_resource_reference(ResourceReference::to_type("other.googleapis.com/Widget")),
        );
        let c = classify_one(vec![request], |s| {
            Method::new(s, "DeleteWidget", ".test.v1.DeleteWidgetRequest", EMPTY_MESSAGE_ID)
        });
        assert_eq!(c.delete.unwrap().resource_name_request_field, "widget");
    }

    #[test]
    fn test_create() {
        let request = Message::new("CreateSecretRequest", PKG, None)
            .with_field(parent_field())
            .with_field(Field::new("secret_id", Typez::String))
            .with_field(Field::message("secret", ".test.v1.Secret"));
        let c = classify_one(vec![request], |s| {
            Method::new(s, "CreateSecret", ".test.v1.CreateSecretRequest", ".test.v1.Secret")
        });
        assert_eq!(
            c.create,
            Some(AipStandardCreateInfo {
                parent_request_field: "parent".to_string(),
                resource_id_request_field: Some("secret_id".to_string()),
                resource_request_field: "secret".to_string(),
            })
        );
    }

    #[test]
    fn test_create_long_running() {
        let request = Message::new("CreateSecretRequest", PKG, None)
            .with_field(Field::new("parent", Typez::String))
            .with_field(Field::message("secret", ".test.v1.Secret"));
        let c = classify_one(vec![request], |s| {
            Method::new(
                s,
                "CreateSecret",
                ".test.v1.CreateSecretRequest",
                ".google.longrunning.Operation",
            )
            .with_operation_info(OperationInfo {
                response_type_id: ".test.v1.Secret".to_string(),
                metadata_type_id: ".google.protobuf.Empty".to_string(),
                method_id: None,
            })
        });
        assert!(c.is_lro);
        assert!(!c.is_simple);
        let create = c.create.unwrap();
        assert_eq!(create.parent_request_field, "parent");
        assert_eq!(create.resource_id_request_field, None);
    }

    #[test]
    fn test_create_uses_body_field_path() {
        let request = Message::new("CreateSecretRequest", PKG, None)
            .with_field(parent_field())
            .with_field(Field::new("payload", Typez::Bytes));
        let c = classify_one(vec![request], |s| {
            Method::new(s, "CreateSecret", ".test.v1.CreateSecretRequest", ".test.v1.Secret")
                .with_body("payload")
        });
        assert_eq!(c.create.unwrap().resource_request_field, "payload");
    }

    #[test]
    fn test_update() {
        let request = Message::new("UpdateSecretRequest", PKG, None)
            .with_field(Field::message("secret", ".test.v1.Secret"))
            .with_field(Field::message("update_mask", FIELD_MASK_ID));
        let c = classify_one(vec![request], |s| {
            Method::new(s, "UpdateSecret", ".test.v1.UpdateSecretRequest", ".test.v1.Secret")
        });
        assert_eq!(
            c.update,
            Some(AipStandardUpdateInfo {
                resource_request_field: "secret".to_string(),
                update_mask_request_field: "update_mask".to_string(),
            })
        );
    }

    #[test]
    fn test_update_prefers_update_mask_field() {
        let request = Message::new("UpdateSecretRequest", PKG, None)
            .with_field(Field::message("secret", ".test.v1.Secret"))
            .with_field(Field::message("read_mask", FIELD_MASK_ID))
            .with_field(Field::message("update_mask", FIELD_MASK_ID));
        let c = classify_one(vec![request], |s| {
            Method::new(s, "UpdateSecret", ".test.v1.UpdateSecretRequest", ".test.v1.Secret")
        });
        assert_eq!(c.update.unwrap().update_mask_request_field, "update_mask");
    }

    #[test]
    fn test_update_falls_back_to_any_field_mask() {
        let request = Message::new("UpdateSecretRequest", PKG, None)
            .with_field(Field::message("secret", ".test.v1.Secret"))
            .with_field(Field::message("mask", FIELD_MASK_ID));
        let c = classify_one(vec![request], |s| {
            Method::new(s, "UpdateSecret", ".test.v1.UpdateSecretRequest", ".test.v1.Secret")
        });
        assert_eq!(c.update.unwrap().update_mask_request_field, "mask");
    }

    #[test]
    fn test_update_requires_field_mask() {
        let request = Message::new("UpdateSecretRequest", PKG, None)
            .with_field(Field::message("secret", ".test.v1.Secret"));
        let c = classify_one(vec![request], |s| {
            Method::new(s, "UpdateSecret", ".test.v1.UpdateSecretRequest", ".test.v1.Secret")
        });
        assert_eq!(c.update, None);
    }

    #[test]
    fn test_list() {
        let request = Message::new("ListSecretsRequest", PKG, None)
            .with_field(parent_field())
            .with_field(Field::new("page_size", Typez::Int32))
            .with_field(Field::new("page_token", Typez::String));
        let mut response = Message::new("ListSecretsResponse", PKG, None)
            .with_field(Field::message("secrets", ".test.v1.Secret").repeated())
            .with_field(Field::new("next_page_token", Typez::String));
        response.pagination = Some(PaginationInfo {
            next_page_token: "next_page_token".to_string(),
            pageable_item: "secrets".to_string(),
        });
        let c = classify_one(vec![request, response], |s| {
            let mut method = Method::new(
                s,
                "ListSecrets",
                ".test.v1.ListSecretsRequest",
                ".test.v1.ListSecretsResponse",
            );
            method.pagination = Some("page_token".to_string());
            method
        });
        assert!(c.is_list);
        assert!(!c.is_simple);
        assert_eq!(
            c.list,
            Some(AipStandardListInfo {
                parent_request_field: "parent".to_string()
            })
        );
    }

    #[test]
    fn test_streaming_is_not_standard() {
        let request = Message::new("GetSecretRequest", PKG, None).with_field(name_field());
        let c = classify_one(vec![request], |s| {
            let mut method =
                Method::new(s, "GetSecret", ".test.v1.GetSecretRequest", ".test.v1.Secret");
            method.server_side_streaming = true;
            method
        });
        assert!(c.is_streaming);
        assert!(!c.is_simple);
        assert_eq!(c.get, None);
    }

    #[test]
    fn test_strip_prefix_ignore_case() {
        assert_eq!(strip_prefix_ignore_case("GetSecret", "get"), Some("Secret"));
        assert_eq!(strip_prefix_ignore_case("getSecret", "GET"), Some("Secret"));
        assert_eq!(strip_prefix_ignore_case("Get", "get"), None);
        assert_eq!(strip_prefix_ignore_case("Ge", "get"), None);
        assert_eq!(strip_prefix_ignore_case("Forget", "get"), None);
    }
}
