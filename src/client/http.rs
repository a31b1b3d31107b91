//! Blocking HTTP transport backed by [reqwest].
//!
//! Every request carries `Accept` and `Content-Type` set to
//! `application/scim+json` plus any extra headers from the command line or
//! the config file.

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use std::time::Duration;

const SCIM_MEDIA_TYPE: &str = "application/scim+json";

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: Url,
    base_url_str: String,
}

impl HttpTransport {
    /// Builds a transport for `base_url` with extra `headers`.
    ///
    /// # Errors
    ///
    /// Fails when the URL does not parse, a header name or value is invalid,
    /// or the TLS backend cannot be initialized.
    pub fn new(base_url: &str, headers: &[(String, String)], timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid URL '{base_url}': {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid URL '{base_url}': not a base URL")));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(SCIM_MEDIA_TYPE));
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static(SCIM_MEDIA_TYPE));
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidHeader(format!("{name}: {value}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidHeader(format!("{name}: {value}")))?;
            default_headers.insert(header_name, header_value);
        }

        let client = reqwest::blocking::Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .map_err(Error::Transport)?;

        Ok(HttpTransport {
            client,
            base_url_str: parsed.to_string(),
            base_url: parsed,
        })
    }

    fn url_for(&self, request: &HttpRequest) -> Url {
        let mut url = self.base_url.clone();
        if !request.segments.is_empty() {
            // Checked in `new`: the base URL can hold path segments.
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty();
                segments.extend(&request.segments);
            }
        }
        url
    }
}

impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url_str
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.url_for(&request);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        tracing::debug!(method = %request.method, url = %url, "sending SCIM request");

        let mut builder = self.client.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().map_err(Error::Transport)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(Error::Transport)?;

        tracing::debug!(status, bytes = body.len(), "received SCIM response");
        Ok(HttpResponse { status, body })
    }
}

/// Parses a `Name: value` header given on the command line.
///
/// # Examples
///
/// ```
/// use scim2_cli::client::http::parse_header;
///
/// let (name, value) = parse_header("Authorization: Bearer token").unwrap();
/// assert_eq!(name, "Authorization");
/// assert_eq!(value, "Bearer token");
/// assert!(parse_header("no separator").is_err());
/// ```
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| Error::InvalidHeader(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidHeader(raw.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
