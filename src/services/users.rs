// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::segment;
use crate::api::{ApiClient, Auth};
use crate::error::{ClientError, ClientResult};
use crate::models::{BackendUser, Identity};
use crate::username::AvailabilityChecker;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Row mirrored into the backend right after a provider sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct MirrorUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

#[derive(Deserialize)]
struct Availability {
    available: bool,
}

fn non_blank(s: &Option<String>) -> bool {
    s.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        UserService { api }
    }

    pub fn list(&self) -> ClientResult<Vec<BackendUser>> {
        self.api.get("/users", Auth::IfAvailable)
    }

    pub fn get(&self, id: &str) -> ClientResult<BackendUser> {
        self.api
            .get(&format!("/users/{}", segment(id)), Auth::IfAvailable)
    }

    pub fn create(&self, user: &NewUser) -> ClientResult<BackendUser> {
        if user.name.trim().is_empty() || user.email.trim().is_empty() {
            return Err(ClientError::validation("Name and email are required"));
        }
        self.api.post("/users", user, Auth::IfAvailable)
    }

    pub fn update(&self, id: &str, update: &UserUpdate) -> ClientResult<BackendUser> {
        if !non_blank(&update.name) && !non_blank(&update.email) {
            return Err(ClientError::validation(
                "At least one field (name or email) must be provided",
            ));
        }
        self.api
            .put(&format!("/users/{}", segment(id)), update, Auth::IfAvailable)
    }

    pub fn delete(&self, id: &str) -> ClientResult<()> {
        let _: Value = self
            .api
            .delete(&format!("/users/{}", segment(id)), None, Auth::IfAvailable)?;
        Ok(())
    }

    /// Fetches the backend row for `identity`, creating it on 404.
    pub fn create_or_get(&self, identity: &Identity) -> ClientResult<BackendUser> {
        match self.get(&identity.id) {
            Ok(user) => Ok(user),
            Err(ClientError::Status { status: 404, .. }) => {
                let full = identity.full_name();
                let name = if full.is_empty() {
                    identity.username.clone().unwrap_or_default()
                } else {
                    full
                };
                self.create(&NewUser {
                    name,
                    email: identity.email.clone(),
                })
            }
            Err(e) => Err(e),
        }
    }

    pub fn mirror(&self, user: &MirrorUser) -> ClientResult<Value> {
        self.api.post("/users", user, Auth::Required)
    }

    pub fn check_username(&self, username: &str) -> ClientResult<bool> {
        let resp: Availability = self.api.post(
            "/users/check-username",
            &json!({ "username": username.trim() }),
            Auth::Anonymous,
        )?;
        Ok(resp.available)
    }
}

impl AvailabilityChecker for UserService {
    fn is_available(&self, username: &str) -> ClientResult<bool> {
        self.check_username(username)
    }
}
