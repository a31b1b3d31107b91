use scim2_cli::acceptability::RequestContext;
use scim2_cli::error::Error;
use scim2_cli::factory::{build_command, indent_choice, parameter_name, verb};
use scim2_cli::registry::ResourceRegistry;
use scim2_cli::schema::defaults;
use serde_json::json;
use std::path::Path;

#[test]
fn parameter_names_are_kebab_case_per_segment() {
    assert_eq!(parameter_name("userName"), "user-name");
    assert_eq!(parameter_name("name.givenName"), "name-given-name");
    assert_eq!(parameter_name("phoneNumbers"), "phone-numbers");
    assert_eq!(parameter_name("active"), "active");
    assert_eq!(parameter_name("x509Certificates"), "x509-certificates");
}

#[test]
fn creation_command_excludes_read_only_fields() {
    let user = defaults::user();
    let spec = build_command(&user, RequestContext::Creation);

    assert!(spec.parameter("userName").is_some());
    assert!(spec.parameter("name.givenName").is_some());
    assert!(spec.parameter("password").is_some());
    assert!(spec.parameter("emails").is_some());
    assert!(spec.parameter("id").is_none());
    assert!(spec.parameter("meta.created").is_none());
    assert!(spec.parameter("groups").is_none());
}

#[test]
fn complex_parents_and_list_members_are_not_parameters() {
    let user = defaults::user();
    let spec = build_command(&user, RequestContext::Creation);
    assert!(spec.parameter("name").is_none());
    assert!(spec.parameter("emails.value").is_none());
}

#[test]
fn replacement_command_accepts_id() {
    let user = defaults::user();
    let spec = build_command(&user, RequestContext::Replacement);
    assert!(spec.parameter("id").is_some());

    let matches = spec
        .parse(["user", "--id", "2819c223", "--user-name", "bjensen"])
        .unwrap();
    let payload = spec.payload(&matches).unwrap().unwrap();
    assert_eq!(payload["id"], "2819c223");
    assert_eq!(payload["userName"], "bjensen");
}

#[test]
fn payload_nests_flattened_fields_and_adds_schemas() {
    let user = defaults::user();
    let spec = build_command(&user, RequestContext::Creation);
    let matches = spec
        .parse([
            "user",
            "--user-name",
            "bjensen",
            "--name-given-name",
            "Barbara",
            "--name-family-name",
            "Jensen",
            "--active",
            "true",
        ])
        .unwrap();

    let payload = spec.payload(&matches).unwrap().unwrap();
    assert_eq!(
        payload,
        json!({
            "schemas": [defaults::USER_SCHEMA],
            "userName": "bjensen",
            "name": {"givenName": "Barbara", "familyName": "Jensen"},
            "active": true
        })
    );
}

#[test]
fn no_field_flags_means_no_payload() {
    let user = defaults::user();
    let spec = build_command(&user, RequestContext::Creation);
    let matches = spec.parse(["user"]).unwrap();
    assert!(spec.payload(&matches).unwrap().is_none());

    let matches = spec.parse(["user", "--no-indent"]).unwrap();
    assert!(spec.payload(&matches).unwrap().is_none());
}

#[test]
fn multi_valued_accepts_json_array() {
    let user = defaults::user();
    let spec = build_command(&user, RequestContext::Creation);
    let matches = spec
        .parse([
            "user",
            "--emails",
            r#"[{"value": "bjensen@example.com", "primary": true}]"#,
        ])
        .unwrap();
    let payload = spec.payload(&matches).unwrap().unwrap();
    assert_eq!(
        payload["emails"],
        json!([{"value": "bjensen@example.com", "primary": true}])
    );
}

#[test]
fn multi_valued_accepts_repeated_occurrences() {
    let registry = ResourceRegistry::from_file(Path::new("tests/fixtures/schemas.json")).unwrap();
    let device = registry.resolve("device").unwrap();
    let spec = build_command(device, RequestContext::Creation);
    let matches = spec
        .parse(["device", "--tags", "laptop", "--tags", "managed", "--slots", "4"])
        .unwrap();
    let payload = spec.payload(&matches).unwrap().unwrap();
    assert_eq!(payload["tags"], json!(["laptop", "managed"]));
    assert_eq!(payload["slots"], 4);
}

#[test]
fn text_item_starting_with_a_bracket_is_kept_verbatim() {
    let registry = ResourceRegistry::from_file(Path::new("tests/fixtures/schemas.json")).unwrap();
    let device = registry.resolve("device").unwrap();
    let spec = build_command(device, RequestContext::Creation);
    let matches = spec.parse(["device", "--tags", "[draft]"]).unwrap();
    let payload = spec.payload(&matches).unwrap().unwrap();
    assert_eq!(payload["tags"], json!(["[draft]"]));

    let matches = spec.parse(["device", "--tags", r#"["a", "b"]"#]).unwrap();
    let payload = spec.payload(&matches).unwrap().unwrap();
    assert_eq!(payload["tags"], json!(["a", "b"]));
}

#[test]
fn invalid_complex_item_is_a_parameter_error() {
    let user = defaults::user();
    let spec = build_command(&user, RequestContext::Creation);
    let matches = spec.parse(["user", "--emails", "[not json"]).unwrap();
    let err = spec.payload(&matches).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { ref parameter, .. } if parameter == "emails"));
}

#[test]
fn boolean_flag_rejects_non_boolean_value() {
    let user = defaults::user();
    let spec = build_command(&user, RequestContext::Creation);
    assert!(spec.parse(["user", "--active", "maybe"]).is_err());
}

#[test]
fn unknown_flag_is_rejected() {
    let user = defaults::user();
    let spec = build_command(&user, RequestContext::Creation);
    assert!(spec.parse(["user", "--id", "42"]).is_err());
}

#[test]
fn help_shows_full_usage() {
    let user = defaults::user();
    let help = build_command(&user, RequestContext::Creation).help();
    assert!(help.contains("Usage: scim2 create user"));
    assert!(help.contains("--user-name"));
    assert!(!help.contains("--meta-created"));

    let help = build_command(&user, RequestContext::Replacement).help();
    assert!(help.contains("Usage: scim2 replace user"));
    assert!(help.contains("--id"));
}

#[test]
fn clashing_flags_are_left_out() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schemas.json");
    let schemas = json!([{
        "id": "urn:example:schemas:Device",
        "name": "Device",
        "attributes": [
            {"name": "indent", "type": "boolean"},
            {"name": "nameGiven", "type": "string"},
            {
                "name": "name",
                "type": "complex",
                "subAttributes": [{"name": "given", "type": "string"}]
            }
        ]
    }]);
    std::fs::write(&file, schemas.to_string()).unwrap();
    let registry = ResourceRegistry::from_file(&file).unwrap();
    let device = registry.resolve("device").unwrap();

    let spec = build_command(device, RequestContext::Creation);
    assert!(spec.parameter("indent").is_none());
    assert!(spec.parameter("nameGiven").is_some());
    assert!(spec.parameter("name.given").is_none());

    let matches = spec
        .parse(["device", "--indent", "--name-given", "x"])
        .unwrap();
    assert_eq!(indent_choice(&matches), Some(true));
    let payload = spec.payload(&matches).unwrap().unwrap();
    assert_eq!(
        payload,
        json!({"schemas": ["urn:example:schemas:Device"], "nameGiven": "x"})
    );
}

#[test]
fn indent_flags_last_one_wins() {
    let group = defaults::group();
    let spec = build_command(&group, RequestContext::Creation);

    let matches = spec.parse(["group"]).unwrap();
    assert_eq!(indent_choice(&matches), None);

    let matches = spec.parse(["group", "--no-indent"]).unwrap();
    assert_eq!(indent_choice(&matches), Some(false));

    let matches = spec.parse(["group", "--no-indent", "--indent"]).unwrap();
    assert_eq!(indent_choice(&matches), Some(true));
}

#[test]
fn verbs() {
    assert_eq!(verb(RequestContext::Creation), "create");
    assert_eq!(verb(RequestContext::Replacement), "replace");
}
