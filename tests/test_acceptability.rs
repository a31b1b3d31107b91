use scim2_cli::acceptability::{is_acceptable, unacceptable_fields, RequestContext};
use scim2_cli::registry::ResourceRegistry;
use scim2_cli::schema::defaults::{self, USER_SCHEMA};
use std::path::Path;

const CONTEXTS: [RequestContext; 4] = [
    RequestContext::Creation,
    RequestContext::Replacement,
    RequestContext::Query,
    RequestContext::Search,
];

fn all_resource_types() -> ResourceRegistry {
    let devices = ResourceRegistry::from_file(Path::new("tests/fixtures/schemas.json")).unwrap();
    let mut descriptors = defaults::all();
    descriptors.extend(devices.descriptors().cloned());
    ResourceRegistry::new(descriptors)
}

#[test]
fn required_fields_are_never_excluded() {
    let registry = all_resource_types();
    for descriptor in registry.descriptors() {
        for context in CONTEXTS {
            let excluded = unacceptable_fields(context, descriptor);
            for required in context.required_fields() {
                assert!(
                    !excluded.contains(*required),
                    "{required} excluded from {} {context}",
                    descriptor.name
                );
            }
        }
    }
}

#[test]
fn id_is_rejected_on_creation_for_every_resource_type() {
    let registry = all_resource_types();
    for descriptor in registry.descriptors() {
        assert!(!is_acceptable(RequestContext::Creation, descriptor, "id"));
        assert!(is_acceptable(RequestContext::Replacement, descriptor, "id"));
    }
}

#[test]
fn write_only_password_is_not_queryable() {
    let user = defaults::user();
    assert!(!is_acceptable(RequestContext::Query, &user, "password"));
    assert!(!is_acceptable(RequestContext::Search, &user, "password"));
    assert!(is_acceptable(RequestContext::Creation, &user, "password"));
    assert!(is_acceptable(RequestContext::Replacement, &user, "password"));
}

#[test]
fn read_only_fields_are_rejected_on_writes_only() {
    let user = defaults::user();
    for field in ["meta", "meta.created", "groups"] {
        assert!(!is_acceptable(RequestContext::Creation, &user, field), "{field}");
        assert!(!is_acceptable(RequestContext::Replacement, &user, field), "{field}");
        assert!(is_acceptable(RequestContext::Query, &user, field), "{field}");
    }
}

#[test]
fn immutable_fields_are_rejected_on_replacement() {
    let group = defaults::group();
    assert!(is_acceptable(RequestContext::Creation, &group, "members.value"));
    assert!(!is_acceptable(RequestContext::Replacement, &group, "members.value"));
    assert!(is_acceptable(RequestContext::Replacement, &group, "members"));
}

#[test]
fn undeclared_fields_are_acceptable() {
    let user = defaults::user();
    for context in CONTEXTS {
        assert!(is_acceptable(context, &user, "favoriteColor"));
    }
}

#[test]
fn fully_qualified_paths_are_normalized() {
    let user = defaults::user();
    let password = format!("{USER_SCHEMA}:password");
    assert!(!is_acceptable(RequestContext::Query, &user, &password));
    let id = format!("{USER_SCHEMA}:id");
    assert!(is_acceptable(RequestContext::Replacement, &user, &id));
}

#[test]
fn unacceptable_fields_is_idempotent() {
    let user = defaults::user();
    for context in CONTEXTS {
        assert_eq!(
            unacceptable_fields(context, &user),
            unacceptable_fields(context, &user)
        );
    }
}

#[test]
fn unacceptable_fields_per_context() {
    let user = defaults::user();

    let creation = unacceptable_fields(RequestContext::Creation, &user);
    assert!(creation.contains("id"));
    assert!(creation.contains("meta.lastModified"));
    assert!(!creation.contains("userName"));

    let replacement = unacceptable_fields(RequestContext::Replacement, &user);
    assert!(!replacement.contains("id"));
    assert!(replacement.contains("meta"));

    let query = unacceptable_fields(RequestContext::Query, &user);
    assert_eq!(query.into_iter().collect::<Vec<_>>(), vec!["password".to_string()]);
}

#[test]
fn schema_file_mutability_drives_the_filter() {
    let registry = all_resource_types();
    let device = registry.resolve("device").unwrap();

    assert!(is_acceptable(RequestContext::Creation, device, "serialNumber"));
    assert!(!is_acceptable(RequestContext::Replacement, device, "serialNumber"));
    assert!(!is_acceptable(RequestContext::Query, device, "secret"));
    assert!(!is_acceptable(RequestContext::Creation, device, "owner.ref"));
    assert!(is_acceptable(RequestContext::Creation, device, "owner.displayName"));
}
