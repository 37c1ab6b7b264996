// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Debounced username availability checking.
//!
//! [`UsernameField`] is a small state machine driven by the caller's clock:
//! every edit cancels the pending check, short input is rejected locally, and
//! a check for longer input becomes due once the debounce window passes
//! without further edits. Checks carry a generation number so that a reply to
//! an older edit is dropped instead of overwriting a newer result.

use crate::error::{ClientError, ClientResult};
use std::time::{Duration, Instant};

pub const MIN_USERNAME_LEN: usize = 3;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

pub const TOO_SHORT: &str = "Username must be at least 3 characters";
pub const TAKEN: &str = "Username is already taken";
pub const CHECK_FAILED: &str = "Error checking username availability";
pub const UNAVAILABLE: &str = "Service temporarily unavailable";

pub trait AvailabilityChecker {
    fn is_available(&self, username: &str) -> ClientResult<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameStatus {
    Empty,
    TooShort,
    /// Waiting for the debounce window to close.
    Pending,
    Checking,
    Available,
    Taken,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    generation: u64,
    pub username: String,
}

#[derive(Debug)]
struct Scheduled {
    username: String,
    due: Instant,
}

#[derive(Debug)]
pub struct UsernameField {
    debounce: Duration,
    /// The signed-in user's own name, accepted without a request.
    current_username: Option<String>,
    input: String,
    scheduled: Option<Scheduled>,
    generation: u64,
    status: UsernameStatus,
}

impl Default for UsernameField {
    fn default() -> Self {
        UsernameField::new(DEFAULT_DEBOUNCE)
    }
}

impl UsernameField {
    pub fn new(debounce: Duration) -> Self {
        UsernameField {
            debounce,
            current_username: None,
            input: String::new(),
            scheduled: None,
            generation: 0,
            status: UsernameStatus::Empty,
        }
    }

    pub fn with_current_username(mut self, username: Option<&str>) -> Self {
        self.current_username = username
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self
    }

    pub fn status(&self) -> &UsernameStatus {
        &self.status
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<String> {
        match &self.status {
            UsernameStatus::TooShort => Some(TOO_SHORT.to_string()),
            UsernameStatus::Taken => Some(TAKEN.to_string()),
            UsernameStatus::Failed(msg) => Some(msg.clone()),
            _ => None,
        }
    }

    /// Records an edit at `now`. Never issues a request.
    pub fn on_input(&mut self, input: &str, now: Instant) {
        self.input = input.to_string();
        self.scheduled = None;
        self.generation += 1;

        let trimmed = input.trim();
        let len = trimmed.chars().count();
        self.status = if len == 0 {
            UsernameStatus::Empty
        } else if len < MIN_USERNAME_LEN {
            UsernameStatus::TooShort
        } else if self.is_own(trimmed) {
            UsernameStatus::Available
        } else {
            self.scheduled = Some(Scheduled {
                username: trimmed.to_string(),
                due: now + self.debounce,
            });
            UsernameStatus::Pending
        };
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.scheduled.as_ref().map(|s| s.due)
    }

    /// Hands out the due check, if the debounce window has closed by `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<CheckTicket> {
        if self.scheduled.as_ref().is_some_and(|s| now >= s.due) {
            let s = self.scheduled.take()?;
            self.status = UsernameStatus::Checking;
            return Some(CheckTicket {
                generation: self.generation,
                username: s.username,
            });
        }
        None
    }

    /// Applies a check result. Returns false when the ticket is stale and was ignored.
    pub fn resolve(&mut self, ticket: &CheckTicket, result: ClientResult<bool>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(username = %ticket.username, "dropping stale username check");
            return false;
        }
        self.status = match result {
            Ok(true) => UsernameStatus::Available,
            Ok(false) => UsernameStatus::Taken,
            Err(ClientError::ServiceUnavailable { .. }) => {
                UsernameStatus::Failed(UNAVAILABLE.to_string())
            }
            Err(err) => {
                tracing::warn!(error = %err, "username availability check failed");
                UsernameStatus::Failed(CHECK_FAILED.to_string())
            }
        };
        true
    }

    /// Runs the due check, if any. Returns whether a request was issued.
    pub fn poll(&mut self, now: Instant, checker: &dyn AvailabilityChecker) -> bool {
        match self.take_due(now) {
            Some(ticket) => {
                let result = checker.is_available(&ticket.username);
                self.resolve(&ticket, result);
                true
            }
            None => false,
        }
    }

    /// Checks immediately, bypassing the debounce (form submit).
    /// Returns whether the username may be used.
    pub fn check_now(&mut self, checker: &dyn AvailabilityChecker) -> bool {
        let trimmed = self.input.trim().to_string();
        self.scheduled = None;
        self.generation += 1;
        let len = trimmed.chars().count();
        if len == 0 {
            self.status = UsernameStatus::Empty;
            return true;
        }
        if len < MIN_USERNAME_LEN {
            self.status = UsernameStatus::TooShort;
            return false;
        }
        if self.is_own(&trimmed) {
            self.status = UsernameStatus::Available;
            return true;
        }
        let ticket = CheckTicket {
            generation: self.generation,
            username: trimmed,
        };
        self.status = UsernameStatus::Checking;
        let result = checker.is_available(&ticket.username);
        self.resolve(&ticket, result);
        self.status == UsernameStatus::Available
    }

    fn is_own(&self, candidate: &str) -> bool {
        self.current_username.as_deref() == Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        calls: RefCell<Vec<String>>,
        available: bool,
    }

    impl AvailabilityChecker for Recorder {
        fn is_available(&self, username: &str) -> ClientResult<bool> {
            self.calls.borrow_mut().push(username.to_string());
            Ok(self.available)
        }
    }

    fn recorder(available: bool) -> Recorder {
        Recorder {
            calls: RefCell::new(Vec::new()),
            available,
        }
    }

    #[test]
    fn own_username_skips_the_request() {
        let checker = recorder(false);
        let mut field = UsernameField::default().with_current_username(Some("priya"));
        let t0 = Instant::now();
        field.on_input("priya", t0);
        assert!(!field.poll(t0 + Duration::from_secs(1), &checker));
        assert_eq!(field.status(), &UsernameStatus::Available);
        assert!(checker.calls.borrow().is_empty());
    }

    #[test]
    fn clearing_input_clears_error() {
        let mut field = UsernameField::default();
        let t0 = Instant::now();
        field.on_input("ab", t0);
        assert_eq!(field.error().as_deref(), Some(TOO_SHORT));
        field.on_input("   ", t0);
        assert_eq!(field.error(), None);
        assert_eq!(field.next_due(), None);
    }
}
