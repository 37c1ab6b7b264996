// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::segment;
use crate::api::{ApiClient, Auth};
use crate::error::ClientResult;
use crate::models::{FinancialBreakdown, FinancialSummary, Period};

#[derive(Clone)]
pub struct FinanceService {
    api: ApiClient,
}

impl FinanceService {
    pub fn new(api: ApiClient) -> Self {
        FinanceService { api }
    }

    pub fn summary(&self, user_id: &str, period: Period) -> ClientResult<FinancialSummary> {
        self.api.get_with_query(
            &format!("/users/{}/finance/summary", segment(user_id)),
            vec![("period".to_string(), period.to_string())],
            Auth::IfAvailable,
        )
    }

    pub fn breakdown(&self, user_id: &str, period: Period) -> ClientResult<FinancialBreakdown> {
        self.api.get_with_query(
            &format!("/users/{}/finance/breakdown", segment(user_id)),
            vec![("period".to_string(), period.to_string())],
            Auth::IfAvailable,
        )
    }
}
