// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Recorded;
use crate::error::ClientResult;
use crate::models::{BackendUser, Identity};
use crate::services::UserService;
use crate::services::users::{NewUser, UserUpdate};

/// Backend user rows, with the last one fetched kept as `current`.
pub struct UserStore {
    service: UserService,
    current: Option<BackendUser>,
    error: Option<String>,
}

impl UserStore {
    pub fn new(service: UserService) -> Self {
        UserStore {
            service,
            current: None,
            error: None,
        }
    }

    pub fn current(&self) -> Option<&BackendUser> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn get_user(&mut self, id: &str) -> ClientResult<BackendUser> {
        let r = self.service.get(id);
        self.keep(r)
    }

    pub fn create_user(&mut self, name: &str, email: &str) -> ClientResult<BackendUser> {
        let r = self.service.create(&NewUser {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        });
        self.keep(r)
    }

    pub fn update_user(
        &mut self,
        id: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> ClientResult<BackendUser> {
        let r = self.service.update(
            id,
            &UserUpdate {
                name: name.map(|s| s.trim().to_string()),
                email: email.map(|s| s.trim().to_string()),
            },
        );
        self.keep(r)
    }

    pub fn delete_user(&mut self, id: &str) -> ClientResult<()> {
        let r = self.service.delete(id);
        self.record(r)?;
        if self.current.as_ref().is_some_and(|u| u.id == id) {
            self.current = None;
        }
        Ok(())
    }

    pub fn create_or_get_user(&mut self, identity: &Identity) -> ClientResult<BackendUser> {
        let r = self.service.create_or_get(identity);
        self.keep(r)
    }

    pub fn list_users(&mut self) -> ClientResult<Vec<BackendUser>> {
        let r = self.service.list();
        self.record(r)
    }

    fn keep(&mut self, r: ClientResult<BackendUser>) -> ClientResult<BackendUser> {
        let user = self.record(r)?;
        self.current = Some(user.clone());
        Ok(user)
    }
}

impl Recorded for UserStore {
    fn error_slot(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}
