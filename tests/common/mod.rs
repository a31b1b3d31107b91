#![allow(dead_code)]

use scim2_cli::client::{HttpRequest, HttpResponse, ScimClient, Transport};
use scim2_cli::error::Result;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

pub const BASE_URL: &str = "https://scim.test/v2";

/// In-memory transport replaying canned responses and recording requests.
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.respond_raw(status, &body.to_string())
    }

    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        self.responses.borrow_mut().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request);
        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(HttpResponse {
                status: 500,
                body: String::new(),
            }))
    }
}

pub fn client(transport: FakeTransport) -> ScimClient<FakeTransport> {
    ScimClient::new(transport)
}

pub fn user_resource(id: &str, user_name: &str) -> Value {
    serde_json::json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
        "id": id,
        "userName": user_name,
        "meta": {"resourceType": "User"}
    })
}

pub fn list_response(resources: Vec<Value>) -> Value {
    serde_json::json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:ListResponse"],
        "totalResults": resources.len(),
        "Resources": resources
    })
}

pub fn scim_error(status: u16, detail: &str) -> Value {
    serde_json::json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
        "status": status.to_string(),
        "detail": detail
    })
}
