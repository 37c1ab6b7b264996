// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::segment;
use crate::api::{ApiClient, Auth};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    NewTransaction, Transaction, TransactionFilters, TransactionPatch, TransactionSummary,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};

#[derive(Clone)]
pub struct TransactionService {
    api: ApiClient,
}

fn base(user_id: &str) -> String {
    format!("/users/{}/transactions", segment(user_id))
}

impl TransactionService {
    pub fn new(api: ApiClient) -> Self {
        TransactionService { api }
    }

    pub fn list(&self, user_id: &str) -> ClientResult<Vec<Transaction>> {
        self.api.get(&base(user_id), Auth::Required)
    }

    pub fn list_filtered(
        &self,
        user_id: &str,
        filters: &TransactionFilters,
    ) -> ClientResult<Vec<Transaction>> {
        self.api
            .get_with_query(&base(user_id), filters.to_query(), Auth::Required)
    }

    pub fn summary(&self, user_id: &str) -> ClientResult<TransactionSummary> {
        self.api
            .get(&format!("{}/summary", base(user_id)), Auth::Required)
    }

    pub fn get(&self, user_id: &str, id: &str) -> ClientResult<Transaction> {
        self.api
            .get(&format!("{}/{}", base(user_id), segment(id)), Auth::Required)
    }

    pub fn create(&self, user_id: &str, tx: &NewTransaction) -> ClientResult<Transaction> {
        if tx.amount <= Decimal::ZERO {
            return Err(ClientError::validation("Amount must be greater than 0"));
        }
        if tx.category.trim().is_empty() {
            return Err(ClientError::validation("Category is required"));
        }
        self.api.post(&base(user_id), tx, Auth::Required)
    }

    pub fn update(
        &self,
        user_id: &str,
        id: &str,
        patch: &TransactionPatch,
    ) -> ClientResult<Transaction> {
        if patch.amount.is_some_and(|a| a <= Decimal::ZERO) {
            return Err(ClientError::validation("Amount must be greater than 0"));
        }
        self.api.put(
            &format!("{}/{}", base(user_id), segment(id)),
            patch,
            Auth::Required,
        )
    }

    pub fn delete(&self, user_id: &str, id: &str) -> ClientResult<()> {
        let _: Value = self.api.delete(
            &format!("{}/{}", base(user_id), segment(id)),
            None,
            Auth::Required,
        )?;
        Ok(())
    }

    pub fn bulk_delete(&self, user_id: &str, ids: &[String]) -> ClientResult<()> {
        let _: Value = self.api.delete(
            &base(user_id),
            Some(json!({ "transactionIds": ids })),
            Auth::Required,
        )?;
        Ok(())
    }
}
