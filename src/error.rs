// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error taxonomy shared by the API client, services and stores.
//!
//! Every failure a command can hit ends up here: transport failures
//! (including timeouts), HTTP errors with a JSON body, HTTP errors whose body
//! is an HTML error page, and local validation failures caught before any
//! request is made. [`ClientError::user_message`] turns each of them into the
//! string shown to the user.

use std::time::Duration;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, refused connection, TLS).
    #[error("network error: {0}")]
    Transport(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The body started with `<`: a proxy or gateway error page, not the API.
    #[error("service temporarily unavailable (HTTP {status})")]
    ServiceUnavailable { status: u16 },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx envelope that carried `success: false`.
    #[error("{message}")]
    Rejected { message: String },

    #[error("{0}")]
    Validation(String),

    #[error("invalid response from server: {0}")]
    Decode(String),

    #[error("not signed in: {0}")]
    Auth(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } | ClientError::ServiceUnavailable { status } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Human-readable text for a blocking alert.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => {
                "Network error. Please check your internet connection and try again.".into()
            }
            ClientError::Timeout(_) => "Request timed out. Please try again.".into(),
            ClientError::ServiceUnavailable { .. } => "Service temporarily unavailable".into(),
            ClientError::Status { status, message } => match *status {
                400 if !message.is_empty() => message.clone(),
                400 => "Invalid data. Please check your input.".into(),
                401 => "Authentication failed. Please sign in again.".into(),
                403 => "You do not have permission to perform this action.".into(),
                413 => "File is too large. Please choose a smaller file.".into(),
                s if s >= 500 => "Server error. Please try again later.".into(),
                _ if !message.is_empty() => message.clone(),
                s => format!("Request failed ({})", s),
            },
            ClientError::Rejected { message } => message.clone(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Decode(_) => "Invalid response from server. Please try again.".into(),
            ClientError::Auth(msg) => msg.clone(),
            ClientError::Io(e) => format!("File error: {}", e),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            // reqwest does not report the configured duration back.
            ClientError::Timeout(Duration::ZERO)
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// Alert text for any error reaching the binary.
pub fn alert_text(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ClientError>() {
        Some(ce) => ce.user_message(),
        None => format!("{:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_alerts() {
        let e = ClientError::Status {
            status: 401,
            message: "jwt expired".into(),
        };
        assert_eq!(e.user_message(), "Authentication failed. Please sign in again.");

        let e = ClientError::Status {
            status: 502,
            message: String::new(),
        };
        assert_eq!(e.user_message(), "Server error. Please try again later.");

        let e = ClientError::Status {
            status: 409,
            message: "Username is already taken".into(),
        };
        assert_eq!(e.user_message(), "Username is already taken");
    }

    #[test]
    fn anyhow_wrapped_client_error_keeps_alert_text() {
        let err = anyhow::Error::new(ClientError::ServiceUnavailable { status: 502 });
        assert_eq!(alert_text(&err), "Service temporarily unavailable");
    }
}
