// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Recorded;
use crate::error::{ClientError, ClientResult};
use crate::models::{FinancialBreakdown, FinancialSummary, Period, PeriodData};
use crate::services::FinanceService;
use std::collections::BTreeMap;

pub struct FinanceStore {
    service: FinanceService,
    user_id: String,
    summary: Option<FinancialSummary>,
    breakdown: Option<FinancialBreakdown>,
    is_loading: bool,
    error: Option<String>,
}

fn joined<T>(h: std::thread::ScopedJoinHandle<'_, ClientResult<T>>) -> ClientResult<T> {
    h.join()
        .unwrap_or_else(|_| Err(ClientError::Transport("finance worker panicked".into())))
}

impl FinanceStore {
    pub fn new(service: FinanceService, user_id: &str) -> Self {
        FinanceStore {
            service,
            user_id: user_id.to_string(),
            summary: None,
            breakdown: None,
            is_loading: false,
            error: None,
        }
    }

    pub fn current_summary(&self) -> Option<&FinancialSummary> {
        self.summary.as_ref()
    }

    pub fn current_breakdown(&self) -> Option<&FinancialBreakdown> {
        self.breakdown.as_ref()
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

    pub fn clear_data(&mut self) {
        self.summary = None;
        self.breakdown = None;
        self.error = None;
    }

    pub fn summary(&mut self, period: Period) -> ClientResult<FinancialSummary> {
        let r = self.service.summary(&self.user_id, period);
        let s = self.record(r)?;
        self.summary = Some(s.clone());
        Ok(s)
    }

    pub fn breakdown(&mut self, period: Period) -> ClientResult<FinancialBreakdown> {
        let r = self.service.breakdown(&self.user_id, period);
        let b = self.record(r)?;
        self.breakdown = Some(b.clone());
        Ok(b)
    }

    /// Summary and breakdown for one period, fetched in parallel.
    pub fn financial_data(&mut self, period: Period) -> ClientResult<PeriodData> {
        self.is_loading = true;
        let r = fetch_period(&self.service, &self.user_id, period);
        self.is_loading = false;
        let data = self.record(r)?;
        self.summary = Some(data.summary.clone());
        self.breakdown = Some(data.breakdown.clone());
        Ok(data)
    }

    /// Data for several periods at once; an empty slice means all four.
    pub fn multi_period(&mut self, periods: &[Period]) -> ClientResult<BTreeMap<Period, PeriodData>> {
        let periods = if periods.is_empty() {
            &Period::ALL[..]
        } else {
            periods
        };
        self.is_loading = true;
        let (service, user_id) = (&self.service, self.user_id.as_str());
        let results: Vec<(Period, ClientResult<PeriodData>)> = std::thread::scope(|s| {
            let handles: Vec<_> = periods
                .iter()
                .map(|&p| (p, s.spawn(move || fetch_period(service, user_id, p))))
                .collect();
            handles.into_iter().map(|(p, h)| (p, joined(h))).collect()
        });
        self.is_loading = false;

        let mut out = BTreeMap::new();
        for (period, r) in results {
            out.insert(period, self.record(r)?);
        }
        Ok(out)
    }

    pub fn summary_by_period(&mut self, period: &str) -> ClientResult<FinancialSummary> {
        let p = self.record(period.parse::<Period>())?;
        self.summary(p)
    }

    pub fn breakdown_by_period(&mut self, period: &str) -> ClientResult<FinancialBreakdown> {
        let p = self.record(period.parse::<Period>())?;
        self.breakdown(p)
    }
}

fn fetch_period(service: &FinanceService, user_id: &str, period: Period) -> ClientResult<PeriodData> {
    std::thread::scope(|s| {
        let summary = s.spawn(|| service.summary(user_id, period));
        let breakdown = service.breakdown(user_id, period)?;
        Ok(PeriodData {
            summary: joined(summary)?,
            breakdown,
        })
    })
}

impl Recorded for FinanceStore {
    fn error_slot(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}
