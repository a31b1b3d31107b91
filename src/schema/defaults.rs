//! Built-in descriptors for the RFC 7643 core `User` and `Group` resources.
//!
//! Used when neither a schema file nor server discovery provides resource
//! types.

use super::{common_fields, AttributeType, FieldDescriptor, Mutability, ResourceTypeDescriptor};

pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
pub const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

use AttributeType::{Binary, Boolean, Complex, Reference, String as Text};
use Mutability::{Immutable, ReadOnly, ReadWrite, WriteOnly};

/// Every built-in descriptor, in registration order.
pub fn all() -> Vec<ResourceTypeDescriptor> {
    vec![user(), group()]
}

pub fn user() -> ResourceTypeDescriptor {
    let mut fields = common_fields();

    fields.push(
        FieldDescriptor::new("userName", Text, ReadWrite)
            .required()
            .describe("Unique identifier for the User, typically used to authenticate."),
    );
    fields.extend(single_complex(
        "name",
        "The components of the user's real name.",
        &[
            ("formatted", Text),
            ("familyName", Text),
            ("givenName", Text),
            ("middleName", Text),
            ("honorificPrefix", Text),
            ("honorificSuffix", Text),
        ],
    ));
    for (path, description) in [
        ("displayName", "The name of the User, suitable for display to end-users."),
        ("nickName", "The casual way to address the user."),
        ("title", "The user's title, such as \"Vice President\"."),
        ("userType", "Identifies the relationship between the organization and the user."),
        ("preferredLanguage", "The User's preferred written or spoken language."),
        ("locale", "Default location of the User, e.g. 'en-US'."),
        ("timezone", "The User's time zone in the 'Olson' time zone database format."),
    ] {
        fields.push(FieldDescriptor::new(path, Text, ReadWrite).describe(description));
    }
    fields.push(
        FieldDescriptor::new("profileUrl", Reference, ReadWrite)
            .describe("A fully qualified URL pointing to a page representing the User's online profile."),
    );
    fields.push(
        FieldDescriptor::new("active", Boolean, ReadWrite)
            .describe("The User's administrative status."),
    );
    fields.push(
        FieldDescriptor::new("password", Text, WriteOnly)
            .describe("The User's cleartext password, never returned by the server."),
    );

    let contact = [("value", Text), ("display", Text), ("type", Text), ("primary", Boolean)];
    fields.extend(multi_complex("emails", ReadWrite, "Email addresses for the user.", &contact));
    fields.extend(multi_complex("phoneNumbers", ReadWrite, "Phone numbers for the User.", &contact));
    fields.extend(multi_complex("ims", ReadWrite, "Instant messaging addresses for the User.", &contact));
    fields.extend(multi_complex(
        "photos",
        ReadWrite,
        "URLs of images of the user.",
        &[("value", Reference), ("display", Text), ("type", Text), ("primary", Boolean)],
    ));
    fields.extend(multi_complex(
        "addresses",
        ReadWrite,
        "A physical mailing address for this User.",
        &[
            ("formatted", Text),
            ("streetAddress", Text),
            ("locality", Text),
            ("region", Text),
            ("postalCode", Text),
            ("country", Text),
            ("type", Text),
            ("primary", Boolean),
        ],
    ));
    fields.extend(multi_complex(
        "groups",
        ReadOnly,
        "A list of groups to which the user belongs.",
        &[("value", Text), ("$ref", Reference), ("display", Text), ("type", Text)],
    ));
    fields.extend(multi_complex("entitlements", ReadWrite, "A list of entitlements for the User.", &contact));
    fields.extend(multi_complex("roles", ReadWrite, "A list of roles for the User.", &contact));
    fields.extend(multi_complex(
        "x509Certificates",
        ReadWrite,
        "A list of certificates issued to the User.",
        &[("value", Binary), ("display", Text), ("type", Text), ("primary", Boolean)],
    ));

    ResourceTypeDescriptor {
        name: "User".to_string(),
        endpoint: "/Users".to_string(),
        schema: USER_SCHEMA.to_string(),
        fields,
    }
}

pub fn group() -> ResourceTypeDescriptor {
    let mut fields = common_fields();

    fields.push(
        FieldDescriptor::new("displayName", Text, ReadWrite)
            .required()
            .describe("A human-readable name for the Group."),
    );
    fields.push(
        FieldDescriptor::new("members", Complex, ReadWrite)
            .multi_valued()
            .describe("A list of members of the Group."),
    );
    for (sub, attr_type, mutability) in [
        ("value", Text, Immutable),
        ("$ref", Reference, Immutable),
        ("type", Text, Immutable),
        ("display", Text, ReadOnly),
    ] {
        fields.push(member(sub, attr_type, mutability));
    }

    ResourceTypeDescriptor {
        name: "Group".to_string(),
        endpoint: "/Groups".to_string(),
        schema: GROUP_SCHEMA.to_string(),
        fields,
    }
}

fn member(sub: &str, attr_type: AttributeType, mutability: Mutability) -> FieldDescriptor {
    let mut field = FieldDescriptor::new(&format!("members.{sub}"), attr_type, mutability);
    field.within_multi_valued = true;
    field
}

fn single_complex(
    path: &str,
    description: &str,
    subs: &[(&str, AttributeType)],
) -> Vec<FieldDescriptor> {
    let mut fields = vec![FieldDescriptor::new(path, Complex, ReadWrite).describe(description)];
    fields.extend(
        subs.iter()
            .map(|(sub, attr_type)| FieldDescriptor::new(&format!("{path}.{sub}"), *attr_type, ReadWrite)),
    );
    fields
}

fn multi_complex(
    path: &str,
    mutability: Mutability,
    description: &str,
    subs: &[(&str, AttributeType)],
) -> Vec<FieldDescriptor> {
    let mut fields = vec![FieldDescriptor::new(path, Complex, mutability)
        .multi_valued()
        .describe(description)];
    fields.extend(subs.iter().map(|(sub, attr_type)| {
        let mut field = FieldDescriptor::new(&format!("{path}.{sub}"), *attr_type, mutability);
        field.within_multi_valued = true;
        field
    }));
    fields
}
