// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Stateful views over the services.
//!
//! Each store keeps the last data it loaded plus the alert text of the last
//! failure. Failures are also returned so commands can abort.

pub mod finance;
pub mod profile;
pub mod transactions;
pub mod users;

pub use finance::FinanceStore;
pub use profile::ProfileStore;
pub use transactions::TransactionStore;
pub use users::UserStore;

use crate::error::{ClientError, ClientResult};

pub(crate) trait Recorded {
    fn error_slot(&mut self) -> &mut Option<String>;

    /// Logs `err` and keeps its alert text in the store.
    fn fail(&mut self, err: ClientError) -> ClientError {
        tracing::error!(error = %err, "request failed");
        *self.error_slot() = Some(err.user_message());
        err
    }

    fn record<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        result.map_err(|e| self.fail(e))
    }
}
