// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Recorded;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Transaction, TransactionDraft, TransactionFilters, TransactionPatch, TransactionSummary,
};
use crate::services::TransactionService;
use chrono::Local;

/// Transactions and their summary for one user.
///
/// Every mutation goes to the backend first and then reloads through
/// [`TransactionStore::load_data`]; nothing is patched optimistically except
/// by [`TransactionStore::update_transaction_in_state`].
pub struct TransactionStore {
    service: TransactionService,
    user_id: String,
    transactions: Vec<Transaction>,
    summary: TransactionSummary,
    is_loading: bool,
    error: Option<String>,
}

impl TransactionStore {
    pub fn new(service: TransactionService, user_id: &str) -> Self {
        TransactionStore {
            service,
            user_id: user_id.to_string(),
            transactions: Vec::new(),
            summary: TransactionSummary::default(),
            is_loading: false,
            error: None,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn summary(&self) -> &TransactionSummary {
        &self.summary
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Fetches the list and the summary in parallel and replaces both.
    pub fn load_data(&mut self) -> ClientResult<()> {
        self.is_loading = true;
        self.error = None;
        let (service, user_id) = (&self.service, self.user_id.as_str());
        let (list, summary) = std::thread::scope(|s| {
            let list = s.spawn(|| service.list(user_id));
            let summary = service.summary(user_id);
            let list = list.join().unwrap_or_else(|_| {
                Err(ClientError::Transport("transaction list worker panicked".into()))
            });
            (list, summary)
        });
        self.is_loading = false;

        let mut first_err = None;
        match list {
            Ok(txs) => self.transactions = txs,
            Err(e) => first_err = Some(e),
        }
        match summary {
            Ok(sum) => self.summary = sum,
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(self.fail(e)),
            None => {
                tracing::debug!(count = self.transactions.len(), "transactions loaded");
                Ok(())
            }
        }
    }

    pub fn fetch_transactions(&mut self) -> ClientResult<()> {
        let r = self.service.list(&self.user_id);
        let txs = self.record(r)?;
        self.transactions = txs;
        Ok(())
    }

    pub fn fetch_summary(&mut self) -> ClientResult<()> {
        let r = self.service.summary(&self.user_id);
        let sum = self.record(r)?;
        self.summary = sum;
        Ok(())
    }

    /// Validates `draft` locally, creates it, then reloads.
    pub fn create_transaction(&mut self, draft: &TransactionDraft) -> ClientResult<Transaction> {
        let validated = draft.validate(Local::now().date_naive());
        let new = self.record(validated)?;
        let r = self.service.create(&self.user_id, &new);
        let created = self.record(r)?;
        tracing::info!(id = %created.id, "transaction created");
        self.load_data()?;
        Ok(created)
    }

    pub fn update_transaction(
        &mut self,
        id: &str,
        patch: &TransactionPatch,
    ) -> ClientResult<Transaction> {
        let r = self.service.update(&self.user_id, id, patch);
        let updated = self.record(r)?;
        self.load_data()?;
        Ok(updated)
    }

    pub fn delete_transaction(&mut self, id: &str) -> ClientResult<()> {
        let r = self.service.delete(&self.user_id, id);
        self.record(r)?;
        self.load_data()
    }

    /// Deletes several transactions in one call; an empty list is a no-op.
    pub fn bulk_delete_transactions(&mut self, ids: &[String]) -> ClientResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let r = self.service.bulk_delete(&self.user_id, ids);
        self.record(r)?;
        self.load_data()
    }

    /// Replaces the list with the backend's filtered view. The summary is left as is.
    pub fn filter_transactions(&mut self, filters: &TransactionFilters) -> ClientResult<()> {
        self.is_loading = true;
        let r = self.service.list_filtered(&self.user_id, filters);
        self.is_loading = false;
        let txs = self.record(r)?;
        self.transactions = txs;
        Ok(())
    }

    /// Swaps in `tx` by id without a round trip. Unknown ids are ignored.
    pub fn update_transaction_in_state(&mut self, tx: Transaction) {
        if let Some(slot) = self.transactions.iter_mut().find(|t| t.id == tx.id) {
            *slot = tx;
        }
    }
}

impl Recorded for TransactionStore {
    fn error_slot(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}
