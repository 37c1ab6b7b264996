// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Auth, FormPart};
use crate::error::ClientResult;
use crate::models::{CandidateTransaction, ExtractedTransaction};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Deserialize)]
struct Extraction {
    #[serde(default)]
    transactions: Vec<ExtractedTransaction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkSaved {
    #[serde(default)]
    total_uploaded: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkSave<'a> {
    user_id: &'a str,
    transactions: &'a [CandidateTransaction],
}

#[derive(Clone)]
pub struct UploadService {
    api: ApiClient,
}

impl UploadService {
    pub fn new(api: ApiClient) -> Self {
        UploadService { api }
    }

    /// Sends a receipt or statement for AI extraction.
    pub fn extract(
        &self,
        user_id: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
        timeout: Duration,
    ) -> ClientResult<Vec<ExtractedTransaction>> {
        let parts = vec![
            FormPart::file("file", file_name, mime, bytes),
            FormPart::text("userId", user_id),
        ];
        let out: Extraction =
            self.api
                .upload("/upload/file", parts, Some(timeout), Auth::IfAvailable)?;
        Ok(out.transactions)
    }

    /// Persists the accepted candidates in one call; returns how many were stored.
    pub fn bulk_save(&self, user_id: &str, txs: &[CandidateTransaction]) -> ClientResult<usize> {
        let body = BulkSave {
            user_id,
            transactions: txs,
        };
        let saved: BulkSaved = self.api.post("/upload/bulk", &body, Auth::IfAvailable)?;
        Ok(saved.total_uploaded.unwrap_or(txs.len()))
    }
}
