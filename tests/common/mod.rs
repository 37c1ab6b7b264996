// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use finclip::api::{ApiClient, ApiRequest, HttpTransport, Method, RawResponse};
use finclip::auth::StaticSession;
use finclip::error::{ClientError, ClientResult};
use finclip::models::Identity;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const USER: &str = "user_1";

type Responder = Box<dyn Fn(&ApiRequest) -> ClientResult<RawResponse> + Send + Sync>;

/// In-memory backend. Routes match on method and exact path; every request is recorded.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), Responder>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(FakeTransport::default())
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        let body = body.to_string();
        self.route(method, path, move |_| {
            Ok(RawResponse {
                status,
                body: body.clone(),
            })
        });
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        let body = body.to_string();
        self.route(method, path, move |_| {
            Ok(RawResponse {
                status,
                body: body.clone(),
            })
        });
    }

    pub fn fail(&self, method: Method, path: &str, make: fn() -> ClientError) {
        self.route(method, path, move |_| Err(make()));
    }

    pub fn route(
        &self,
        method: Method,
        path: &str,
        f: impl Fn(&ApiRequest) -> ClientResult<RawResponse> + Send + Sync + 'static,
    ) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Box::new(f));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn sent_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

impl HttpTransport for FakeTransport {
    fn execute(&self, req: &ApiRequest) -> ClientResult<RawResponse> {
        self.requests.lock().unwrap().push(req.clone());
        let routes = self.routes.lock().unwrap();
        match routes.get(&(req.method, req.path.clone())) {
            Some(f) => f(req),
            None => Ok(RawResponse {
                status: 404,
                body: r#"{"error":"Not found"}"#.to_string(),
            }),
        }
    }
}

pub fn identity() -> Identity {
    Identity {
        id: USER.to_string(),
        email: "asha@example.com".to_string(),
        first_name: Some("Asha".to_string()),
        last_name: None,
        username: Some("asha".to_string()),
        phone_number: None,
        image_url: None,
    }
}

/// Client signed in as [`USER`] with a fixed token.
pub fn client(transport: &Arc<FakeTransport>) -> ApiClient {
    let session = StaticSession::new(Some(identity()), Some("tok-1".to_string()));
    ApiClient::new(transport.clone(), Arc::new(session))
}

pub fn tx_json(id: &str, amount: &str, kind: &str, category: &str, date: &str) -> Value {
    serde_json::json!({
        "id": id,
        "user_id": USER,
        "amount": amount,
        "currency": "INR",
        "type": kind,
        "category": category,
        "description": format!("{} {}", category, id),
        "transaction_date": date,
    })
}
