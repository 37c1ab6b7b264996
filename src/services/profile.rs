// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Auth, FormPart};
use crate::error::{ClientError, ClientResult};
use crate::models::{MutableProfile, ProfileUpdate};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct ProfileEnvelope {
    #[serde(default)]
    user: Option<MutableProfile>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageUploaded {
    image_url: String,
}

#[derive(Clone)]
pub struct ProfileService {
    api: ApiClient,
}

impl ProfileService {
    pub fn new(api: ApiClient) -> Self {
        ProfileService { api }
    }

    /// The backend's row for the signed-in user; `None` when it has none yet.
    pub fn fetch(&self) -> ClientResult<Option<MutableProfile>> {
        let env: ProfileEnvelope = self.api.get("/users/profile", Auth::Required)?;
        Ok(env.user)
    }

    pub fn update(&self, update: &ProfileUpdate) -> ClientResult<Value> {
        if update.is_empty() {
            return Err(ClientError::validation("No changes were made to your profile."));
        }
        self.api.put("/users/profile", update, Auth::Required)
    }

    /// Uploads a new avatar and returns its hosted URL.
    pub fn upload_image(&self, file_name: &str, mime: &str, bytes: Vec<u8>) -> ClientResult<String> {
        let parts = vec![FormPart::file("image", file_name, mime, bytes)];
        let resp: ImageUploaded =
            self.api
                .upload("/users/profile-image", parts, None, Auth::Required)?;
        Ok(resp.image_url)
    }
}
