// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! HTTP plumbing for the finance backend.
//!
//! [`ApiClient`] issues JSON and multipart requests through an
//! [`HttpTransport`], attaching a freshly fetched bearer token to every
//! user-scoped call. Response bodies are read as text first so that an HTML
//! error page from a proxy is reported as [`ClientError::ServiceUnavailable`]
//! instead of a JSON syntax error.

use crate::auth::SessionProvider;
use crate::error::{ClientError, ClientResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

const UA: &str = concat!(
    "finclip/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/finclip)"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

impl FormPart {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        FormPart {
            name: name.to_string(),
            value: PartValue::Text(value.into()),
        }
    }

    pub fn file(name: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        FormPart {
            name: name.to_string(),
            value: PartValue::File {
                file_name: file_name.to_string(),
                mime: mime.to_string(),
                bytes,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: Body,
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: Body::Empty,
            timeout: None,
        }
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves one request over the wire. Tests swap in an in-memory fake.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, req: &ApiRequest) -> ClientResult<RawResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(UA)
            .build()?;
        Ok(ReqwestTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, req: &ApiRequest) -> ClientResult<RawResponse> {
        let url = format!("{}{}", self.base_url, req.path);
        let mut rb = match req.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !req.query.is_empty() {
            rb = rb.query(&req.query);
        }
        if let Some(token) = &req.bearer {
            rb = rb.bearer_auth(token);
        }
        if let Some(t) = req.timeout {
            rb = rb.timeout(t);
        }
        rb = match &req.body {
            Body::Empty => rb,
            Body::Json(v) => rb.json(v),
            Body::Multipart(parts) => rb.multipart(build_form(parts)?),
        };

        let resp = rb.send().map_err(|e| match ClientError::from(e) {
            ClientError::Timeout(_) => ClientError::Timeout(req.timeout.unwrap_or_default()),
            other => other,
        })?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(RawResponse { status, body })
    }
}

fn build_form(parts: &[FormPart]) -> ClientResult<reqwest::blocking::multipart::Form> {
    use reqwest::blocking::multipart::{Form, Part};

    let mut form = Form::new();
    for p in parts {
        form = match &p.value {
            PartValue::Text(s) => form.text(p.name.clone(), s.clone()),
            PartValue::File {
                file_name,
                mime,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)?;
                form.part(p.name.clone(), part)
            }
        };
    }
    Ok(form)
}

/// How a request obtains its bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Fails with [`ClientError::Auth`] when no token can be issued.
    Required,
    /// Sends a token when the session has one, anonymous otherwise.
    IfAvailable,
    Anonymous,
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>, session: Arc<dyn SessionProvider>) -> Self {
        ApiClient { transport, session }
    }

    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> ClientResult<T> {
        self.get_with_query(path, Vec::new(), auth)
    }

    pub fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        auth: Auth,
    ) -> ClientResult<T> {
        let mut req = ApiRequest::new(Method::Get, path);
        req.query = query;
        self.send(req, auth)
    }

    pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> ClientResult<T> {
        let mut req = ApiRequest::new(Method::Post, path);
        req.body = Body::Json(serde_json::to_value(body)?);
        self.send(req, auth)
    }

    pub fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> ClientResult<T> {
        let mut req = ApiRequest::new(Method::Put, path);
        req.body = Body::Json(serde_json::to_value(body)?);
        self.send(req, auth)
    }

    pub fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        auth: Auth,
    ) -> ClientResult<T> {
        let mut req = ApiRequest::new(Method::Delete, path);
        if let Some(b) = body {
            req.body = Body::Json(b);
        }
        self.send(req, auth)
    }

    pub fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
        timeout: Option<Duration>,
        auth: Auth,
    ) -> ClientResult<T> {
        let mut req = ApiRequest::new(Method::Post, path);
        req.body = Body::Multipart(parts);
        req.timeout = timeout;
        self.send(req, auth)
    }

    fn send<T: DeserializeOwned>(&self, mut req: ApiRequest, auth: Auth) -> ClientResult<T> {
        // Tokens are short-lived; ask the session for a new one every time.
        req.bearer = match auth {
            Auth::Required => Some(self.session.token()?),
            Auth::IfAvailable => self.session.token().ok(),
            Auth::Anonymous => None,
        };
        let started = Instant::now();
        let result = self.transport.execute(&req);
        match &result {
            Ok(resp) => tracing::debug!(
                method = %req.method,
                path = %req.path,
                status = resp.status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "api request"
            ),
            Err(err) => tracing::warn!(
                method = %req.method,
                path = %req.path,
                error = %err,
                "api request failed"
            ),
        }
        parse_response(result?)
    }
}

/// Turns a raw response into `T`, sniffing for HTML before parsing JSON.
pub fn parse_response<T: DeserializeOwned>(resp: RawResponse) -> ClientResult<T> {
    let text = resp.body.trim();
    if text.starts_with('<') {
        tracing::warn!(status = resp.status, "received HTML error page instead of JSON");
        return Err(ClientError::ServiceUnavailable {
            status: resp.status,
        });
    }

    if !resp.is_success() {
        return Err(status_error(resp.status, text));
    }

    let value: Value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(text)?
    };
    let value = unwrap_envelope(value)?;
    Ok(serde_json::from_value(value)?)
}

fn status_error(status: u16, text: &str) -> ClientError {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => ClientError::Status {
            status,
            message: error_text(&v).unwrap_or_default(),
        },
        Err(_) => {
            let message = match status {
                404 => "Endpoint not found. Please contact support.".to_string(),
                s if s >= 500 => "Server error. Please try again later.".to_string(),
                _ => "Request failed. Please try again.".to_string(),
            };
            ClientError::Status { status, message }
        }
    }
}

fn error_text(v: &Value) -> Option<String> {
    ["error", "message", "detail"]
        .iter()
        .find_map(|k| v.get(*k))
        .and_then(|e| match e {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
}

/// `{success, data, error}` envelopes: unwrap `data`, or fail on `success: false`.
fn unwrap_envelope(v: Value) -> ClientResult<Value> {
    let Value::Object(mut map) = v else {
        return Ok(v);
    };
    match map.get("success").and_then(Value::as_bool) {
        Some(false) => {
            let message = error_text(&Value::Object(map))
                .unwrap_or_else(|| "Request was not successful".to_string());
            Err(ClientError::Rejected { message })
        }
        Some(true) => Ok(map.remove("data").unwrap_or(Value::Object(map))),
        None => Ok(Value::Object(map)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn html_body_is_service_unavailable_even_on_200() {
        let err = parse_response::<Value>(raw(200, "  <html><body>Bad Gateway</body></html>"))
            .unwrap_err();
        assert!(matches!(err, ClientError::ServiceUnavailable { status: 200 }));
    }

    #[test]
    fn json_error_body_keeps_message() {
        let err = parse_response::<Value>(raw(400, r#"{"error":"Amount is required"}"#))
            .unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Amount is required");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn envelope_unwraps_data_and_rejects_failure() {
        let v: Value =
            parse_response(raw(200, r#"{"success":true,"data":{"message":"hi"}}"#)).unwrap();
        assert_eq!(v, json!({"message": "hi"}));

        let err = parse_response::<Value>(raw(200, r#"{"success":false,"error":"quota"}"#))
            .unwrap_err();
        assert!(matches!(err, ClientError::Rejected { ref message } if message == "quota"));
    }

    #[test]
    fn empty_body_is_null() {
        let v: Value = parse_response(raw(204, "")).unwrap();
        assert!(v.is_null());
        parse_response::<()>(raw(204, "")).unwrap();
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = parse_response::<Value>(raw(200, "OK then")).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
