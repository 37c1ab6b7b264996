// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One service per backend resource; each method maps to a single endpoint.

pub mod chat;
pub mod finance;
pub mod profile;
pub mod transactions;
pub mod upload;
pub mod users;

pub use chat::ChatService;
pub use finance::FinanceService;
pub use profile::ProfileService;
pub use transactions::TransactionService;
pub use upload::UploadService;
pub use users::UserService;

/// Percent-encodes a path segment taken from user input or ids.
pub(crate) fn segment(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}
