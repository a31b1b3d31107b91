mod common;

use common::{client, list_response, FakeTransport};
use scim2_cli::compliance::{check_server, generated_payload, Status};
use scim2_cli::registry::ResourceRegistry;
use scim2_cli::schema::defaults::{self, GROUP_SCHEMA, USER_SCHEMA};
use scim2_cli::schema::{AttributeType, FieldDescriptor, Mutability};
use serde_json::json;

fn service_provider_config() -> serde_json::Value {
    json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig"],
        "patch": {"supported": false},
        "filter": {"supported": true, "maxResults": 100}
    })
}

fn group(id: &str) -> serde_json::Value {
    json!({
        "schemas": [GROUP_SCHEMA],
        "id": id,
        "displayName": "scim2-cli-check",
        "meta": {"resourceType": "Group", "location": format!("https://scim.test/v2/Groups/{id}")}
    })
}

#[test]
fn generated_payload_fills_required_text_fields() {
    let payload = generated_payload(&defaults::user(), "1").unwrap();
    assert_eq!(
        payload,
        json!({
            "schemas": [USER_SCHEMA],
            "userName": "scim2-cli-check-1",
            "externalId": "scim2-cli-check-1"
        })
    );
}

#[test]
fn generated_payload_refuses_non_text_required_fields() {
    let mut group = defaults::group();
    group.fields.push(
        FieldDescriptor::new("priority", AttributeType::Integer, Mutability::ReadWrite).required(),
    );
    let err = generated_payload(&group, "1").unwrap_err();
    assert_eq!(err, "Required attribute 'priority' cannot be generated");
}

#[test]
fn full_cycle_against_compliant_server() {
    let transport = FakeTransport::new()
        .respond(200, list_response(vec![]))
        .respond(200, list_response(vec![]))
        .respond(200, service_provider_config())
        .respond(200, list_response(vec![group("g0")]))
        .respond(201, group("g1"))
        .respond(200, group("g1"))
        .respond(200, group("g1"))
        .respond_raw(204, "");
    let client = client(transport);
    let registry = ResourceRegistry::new(vec![defaults::group()]);

    let results = check_server(&client, &registry);
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Discover /Schemas",
            "Discover /ResourceTypes",
            "Discover /ServiceProviderConfig",
            "List Group resources",
            "Create Group",
            "Query Group by id",
            "Replace Group",
            "Delete Group",
        ]
    );
    assert!(results.iter().all(|r| r.status == Status::Success), "{results:#?}");
    assert_eq!(results[3].reason.as_deref(), Some("1 resources found"));
    assert_eq!(results[4].reason.as_deref(), Some("Created with id g1"));

    let requests = client.transport().requests();
    assert_eq!(requests[3].query, vec![("count".to_string(), "1".to_string())]);
    assert_eq!(requests[5].path(), "/Groups/g1");

    let replacement = requests[6].body.as_ref().unwrap();
    assert_eq!(replacement["id"], "g1");
    assert!(replacement.get("meta").is_none());
    assert_eq!(requests[7].path(), "/Groups/g1");
}

#[test]
fn failing_server_reports_errors_and_skips_cycle() {
    let client = client(FakeTransport::new());
    let registry = ResourceRegistry::with_defaults();

    let results = check_server(&client, &registry);
    assert_eq!(results.len(), 3 + 2 * 5);

    let errors = results.iter().filter(|r| r.status == Status::Error).count();
    let skipped = results.iter().filter(|r| r.status == Status::Skipped).count();
    assert_eq!(errors, 3 + 2 * 2);
    assert_eq!(skipped, 2 * 3);
    assert_eq!(
        results[0].reason.as_deref(),
        Some("Server responded with status code 500")
    );
    let skipped_reason = results
        .iter()
        .find(|r| r.status == Status::Skipped)
        .and_then(|r| r.reason.as_deref());
    assert_eq!(skipped_reason, Some("Creation failed"));
}

#[test]
fn resource_types_with_unfillable_required_fields_are_skipped() {
    let mut group = defaults::group();
    group.fields.push(
        FieldDescriptor::new("priority", AttributeType::Integer, Mutability::ReadWrite).required(),
    );
    let transport = FakeTransport::new()
        .respond(200, list_response(vec![]))
        .respond(200, list_response(vec![]))
        .respond(200, service_provider_config())
        .respond(200, list_response(vec![]));
    let client = client(transport);

    let results = check_server(&client, &ResourceRegistry::new(vec![group]));
    let statuses: Vec<Status> = results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            Status::Success,
            Status::Success,
            Status::Success,
            Status::Success,
            Status::Skipped,
            Status::Skipped,
            Status::Skipped,
            Status::Skipped,
        ]
    );
    assert_eq!(client.transport().requests().len(), 4);
}

#[test]
fn error_message_from_server_is_an_error_result() {
    let transport = FakeTransport::new()
        .respond(200, list_response(vec![]))
        .respond(200, list_response(vec![]))
        .respond(
            403,
            json!({
                "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
                "status": "403",
                "detail": "Discovery is restricted"
            }),
        );
    let client = client(transport);

    let results = check_server(&client, &ResourceRegistry::new(vec![]));
    assert_eq!(results.len(), 3);
    assert_eq!(results[2].status, Status::Error);
    assert_eq!(results[2].reason.as_deref(), Some("Discovery is restricted"));
    assert!(results[2].data.is_some());
}
