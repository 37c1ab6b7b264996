// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Auth};
use crate::error::ClientResult;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct Reply {
    message: String,
}

#[derive(Clone)]
pub struct ChatService {
    api: ApiClient,
}

impl ChatService {
    pub fn new(api: ApiClient) -> Self {
        ChatService { api }
    }

    pub fn send(&self, user_id: &str, message: &str) -> ClientResult<String> {
        let reply: Reply = self.api.post(
            "/ai/chat",
            &json!({ "message": message, "userId": user_id }),
            Auth::IfAvailable,
        )?;
        Ok(reply.message)
    }
}
