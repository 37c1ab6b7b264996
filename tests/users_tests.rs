// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FakeTransport, USER, client, identity};
use finclip::api::Method;
use finclip::services::UserService;
use finclip::stores::UserStore;
use serde_json::json;

#[test]
fn create_requires_name_and_email() {
    let t = FakeTransport::new();
    let mut s = UserStore::new(UserService::new(client(&t)));
    let err = s.create_user("  ", "a@b.co").unwrap_err();
    assert_eq!(err.user_message(), "Name and email are required");
    let err = s.update_user("u1", Some(""), None).unwrap_err();
    assert_eq!(
        err.user_message(),
        "At least one field (name or email) must be provided"
    );
    assert_eq!(t.count(), 0);
}

#[test]
fn create_or_get_creates_on_404() {
    let t = FakeTransport::new();
    t.respond(
        Method::Get,
        &format!("/users/{}", USER),
        404,
        json!({ "error": "User not found" }),
    );
    t.respond(
        Method::Post,
        "/users",
        201,
        json!({ "id": USER, "name": "Asha", "email": "asha@example.com" }),
    );
    let mut s = UserStore::new(UserService::new(client(&t)));
    let u = s.create_or_get_user(&identity()).unwrap();
    assert_eq!(u.id, USER);
    assert_eq!(s.current().map(|u| u.id.as_str()), Some(USER));
    assert_eq!(
        t.sent_to(Method::Post, "/users")[0].json_body(),
        Some(&json!({ "name": "Asha", "email": "asha@example.com" }))
    );
}

#[test]
fn existing_user_is_returned_without_create() {
    let t = FakeTransport::new();
    t.respond(
        Method::Get,
        &format!("/users/{}", USER),
        200,
        json!({ "id": USER, "username": "asha" }),
    );
    let mut s = UserStore::new(UserService::new(client(&t)));
    s.create_or_get_user(&identity()).unwrap();
    assert!(t.sent_to(Method::Post, "/users").is_empty());

    t.respond(Method::Delete, &format!("/users/{}", USER), 200, json!({}));
    s.delete_user(USER).unwrap();
    assert!(s.current().is_none());
}

#[test]
fn ids_are_percent_encoded() {
    let t = FakeTransport::new();
    let mut s = UserStore::new(UserService::new(client(&t)));
    let _ = s.get_user("a/b c");
    assert_eq!(t.requests()[0].path, "/users/a%2Fb%20c");
    assert!(s.error().is_some());
}
