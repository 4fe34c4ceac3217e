//! Serializable views of a resolved model
//!
//! Templates only see these flattened structs; IDs are already resolved to
//! the names and shapes the emitted artifacts need.

use apigen_common::{Api, Method, PathBinding, Resource, Service};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiView {
    pub name: String,
    pub title: String,
    pub description: String,
    pub package_name: String,
    pub services: Vec<ServiceView>,
    pub resources: Vec<ResourceView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub name: String,
    pub id: String,
    pub documentation: String,
    pub default_host: String,
    pub deprecated: bool,
    pub methods: Vec<MethodView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodView {
    pub name: String,
    pub id: String,
    pub documentation: String,
    pub deprecated: bool,
    pub input_type: String,
    pub output_type: String,
    pub body: Option<String>,
    pub bindings: Vec<BindingView>,
    pub is_simple: bool,
    pub is_lro: bool,
    pub is_list: bool,
    pub is_streaming: bool,
    /// AIP standard method kind and the request field it is keyed on
    pub standard: Option<StandardView>,
    pub pagination: Option<PaginationView>,
    pub operation: Option<OperationView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BindingView {
    pub verb: String,
    pub path: String,
    pub query_parameters: Vec<String>,
    /// Canonical resource name template, e.g. `//host/projects/{project}`
    pub target_template: Option<String>,
    /// Dotted request field paths composing the resource name
    pub target_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandardView {
    pub kind: &'static str,
    pub field: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationView {
    pub page_token: String,
    pub next_page_token: String,
    pub item: String,
    pub item_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationView {
    pub response_type: String,
    pub metadata_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceView {
    #[serde(rename = "type")]
    pub type_: String,
    pub singular: String,
    pub plural: String,
    pub patterns: Vec<String>,
}

impl ApiView {
    pub fn new(api: &Api) -> Self {
        let services = api
            .services
            .iter()
            .filter_map(|id| api.service(id))
            .map(|service| ServiceView::new(api, service))
            .collect();
        let resources = api
            .state
            .resource_by_type
            .values()
            .map(ResourceView::new)
            .collect();

        Self {
            name: api.name.clone(),
            title: api.title.clone(),
            description: api.description.clone(),
            package_name: api.package_name.clone(),
            services,
            resources,
        }
    }

    pub fn method_count(&self) -> usize {
        self.services.iter().map(|s| s.methods.len()).sum()
    }
}

impl ServiceView {
    fn new(api: &Api, service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            id: service.id.clone(),
            documentation: service.documentation.clone(),
            default_host: service.default_host.clone(),
            deprecated: service.deprecated,
            methods: api
                .service_methods(service)
                .map(|method| MethodView::new(api, method))
                .collect(),
        }
    }
}

impl MethodView {
    fn new(api: &Api, method: &Method) -> Self {
        let pagination = api.pagination_field(method).and_then(|page_token| {
            let info = api.output_type(method)?.pagination.as_ref()?;
            let item = api.pageable_item(method)?;
            Some(PaginationView {
                page_token: page_token.name.clone(),
                next_page_token: info.next_page_token.clone(),
                item: item.name.clone(),
                item_type: if item.typez_id.is_empty() {
                    format!("{:?}", item.typez).to_lowercase()
                } else {
                    item.typez_id.clone()
                },
            })
        });

        Self {
            name: method.name.clone(),
            id: method.id.clone(),
            documentation: method.documentation.clone(),
            deprecated: method.deprecated,
            input_type: method.input_type_id.clone(),
            output_type: method.output_type_id.clone(),
            body: method.path_info.body_field_path.clone(),
            bindings: method.path_info.bindings.iter().map(BindingView::new).collect(),
            is_simple: method.is_simple,
            is_lro: method.is_lro,
            is_list: method.is_list,
            is_streaming: method.is_streaming,
            standard: standard_view(method),
            pagination,
            operation: method.operation_info.as_ref().map(|info| OperationView {
                response_type: info.response_type_id.clone(),
                metadata_type: info.metadata_type_id.clone(),
            }),
        }
    }
}

fn standard_view(method: &Method) -> Option<StandardView> {
    let view = |kind, field: &String| {
        Some(StandardView {
            kind,
            field: field.clone(),
        })
    };
    if let Some(info) = &method.aip_standard_get_info {
        view("get", &info.resource_name_request_field)
    } else if let Some(info) = &method.aip_standard_list_info {
        view("list", &info.parent_request_field)
    } else if let Some(info) = &method.aip_standard_create_info {
        view("create", &info.parent_request_field)
    } else if let Some(info) = &method.aip_standard_update_info {
        view("update", &info.resource_request_field)
    } else if let Some(info) = &method.aip_standard_delete_info {
        view("delete", &info.resource_name_request_field)
    } else if let Some(info) = &method.aip_standard_undelete_info {
        view("undelete", &info.resource_name_request_field)
    } else {
        None
    }
}

impl BindingView {
    fn new(binding: &PathBinding) -> Self {
        let target = binding.target_resource.as_ref();
        Self {
            verb: binding.verb.clone(),
            path: binding.path_template.to_string(),
            query_parameters: binding.query_parameters.clone(),
            target_template: target.map(|t| t.template.clone()),
            target_fields: target
                .map(|t| t.field_paths.iter().map(|path| path.join(".")).collect())
                .unwrap_or_default(),
        }
    }
}

impl ResourceView {
    fn new(resource: &Resource) -> Self {
        Self {
            type_: resource.type_.clone(),
            singular: resource.singular.clone(),
            plural: resource.plural.clone(),
            patterns: resource
                .patterns
                .iter()
                .map(|segments| {
                    segments
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("/")
                })
                .collect(),
        }
    }
}
