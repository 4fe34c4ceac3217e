//! Package consistency checks run before the model is handed to generators

use crate::{AnalyzerError, Result};
use apigen_common::Api;

/// Check that every listed service, message and enum belongs to the API's
/// package, failing on the first violation
///
/// Models without a package name (e.g. from sources that have no package
/// concept) only get the referential checks.
pub fn validate(api: &Api) -> Result<()> {
    let expected = api.package_name.as_str();
    if expected.is_empty() {
        tracing::warn!("model {} has no package name, skipping package checks", api.name);
    }

    for id in &api.services {
        let service = api.service(id).ok_or_else(|| missing("service", id))?;
        check_package(expected, "service", &service.id, &service.package)?;
        for method_id in &service.methods {
            api.method(method_id).ok_or_else(|| missing("method", method_id))?;
        }
    }

    let mut pending: Vec<&String> = api.messages.iter().rev().collect();
    let mut checked = 0usize;
    while let Some(id) = pending.pop() {
        let message = api.message(id).ok_or_else(|| missing("message", id))?;
        check_package(expected, "message", &message.id, &message.package)?;
        for enum_id in &message.enums {
            check_enum(api, expected, enum_id)?;
        }
        pending.extend(message.messages.iter().rev());
        checked += 1;
    }

    for id in &api.enums {
        check_enum(api, expected, id)?;
    }

    tracing::debug!(
        services = api.services.len(),
        messages = checked,
        enums = api.enums.len(),
        "validated model {}",
        api.name
    );
    Ok(())
}

fn check_enum(api: &Api, expected: &str, id: &str) -> Result<()> {
    let enumeration = api.enumeration(id).ok_or_else(|| missing("enum", id))?;
    check_package(expected, "enum", &enumeration.id, &enumeration.package)
}

fn check_package(expected: &str, kind: &'static str, id: &str, package: &str) -> Result<()> {
    if expected.is_empty() {
        return Ok(());
    }
    let qualified = id
        .strip_prefix('.')
        .and_then(|rest| rest.strip_prefix(expected))
        .is_some_and(|rest| rest.starts_with('.'));
    if package != expected || !qualified {
        return Err(AnalyzerError::PackageMismatch {
            kind,
            id: id.to_string(),
            package: package.to_string(),
            expected: expected.to_string(),
        });
    }
    Ok(())
}

fn missing(kind: &'static str, id: &str) -> AnalyzerError {
    AnalyzerError::MissingElement {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_common::{Enum, Message, Method, Service};

    fn api() -> Api {
        let mut api = Api::new("secretmanager", "google.cloud.secretmanager.v1");
        let secret = Message::new("Secret", "google.cloud.secretmanager.v1", None);
        let labels = Message::new("LabelsEntry", "google.cloud.secretmanager.v1", Some(&secret));
        let state = Enum::new("State", "google.cloud.secretmanager.v1", Some(&secret));
        api.add_message(secret);
        api.add_message(labels);
        api.add_enum(state);
        let service = Service::new("SecretManagerService", "google.cloud.secretmanager.v1");
        let method = Method::new(
            &service,
            "GetSecret",
            ".google.cloud.secretmanager.v1.GetSecretRequest",
            ".google.cloud.secretmanager.v1.Secret",
        );
        api.add_service(service, vec![method]);
        api
    }

    #[test]
    fn test_consistent_model() {
        assert!(validate(&api()).is_ok());
    }

    #[test]
    fn test_message_from_other_package() {
        let mut api = api();
        api.add_message(Message::new("Location", "google.cloud.location", None));

        let err = validate(&api).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::PackageMismatch { kind: "message", ref id, .. } if id == ".google.cloud.location.Location"
        ));
    }

    #[test]
    fn test_nested_enum_from_other_package() {
        let mut api = api();
        let id = ".google.cloud.secretmanager.v1.Secret.State";
        api.state.enum_by_id.get_mut(id).unwrap().package = "google.cloud.other".to_string();

        let err = validate(&api).unwrap_err();
        assert!(matches!(err, AnalyzerError::PackageMismatch { kind: "enum", .. }));
    }

    #[test]
    fn test_id_must_be_qualified_by_package() {
        let mut api = api();
        let mut service = Service::new("Other", "google.cloud.secretmanager.v1");
        service.id = ".google.cloud.secretmanager.v1beta.Other".to_string();
        api.add_service(service, vec![]);

        let err = validate(&api).unwrap_err();
        assert!(matches!(err, AnalyzerError::PackageMismatch { kind: "service", .. }));
    }

    #[test]
    fn test_dangling_listed_id() {
        let mut api = api();
        api.messages.push(".google.cloud.secretmanager.v1.Missing".to_string());

        let err = validate(&api).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingElement { kind: "message", .. }));
    }

    #[test]
    fn test_empty_package_skips_package_checks() {
        let mut api = api();
        api.package_name.clear();
        api.add_message(Message::new("Location", "google.cloud.location", None));
        assert!(validate(&api).is_ok());
    }
}
