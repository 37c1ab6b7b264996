// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ClientError;
use crate::models::{ChatMessage, ChatRole};
use crate::services::ChatService;
use chrono::Utc;

pub const PROCESSING_FALLBACK: &str =
    "Sorry, I'm having trouble processing your request right now. Please try again later.";
pub const CONNECTION_FALLBACK: &str = "Sorry, I'm having trouble connecting to the AI service. \
     Please check your internet connection and try again.";

/// A conversation with the assistant. Failures become assistant messages,
/// never errors.
pub struct ChatSession {
    service: ChatService,
    user_id: String,
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatSession {
    pub fn new(service: ChatService, user_id: &str) -> Self {
        ChatSession {
            service,
            user_id: user_id.to_string(),
            messages: Vec::new(),
            next_id: 1,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Sends `question` and returns the assistant's reply, or `None` for blank input.
    pub fn ask(&mut self, question: &str) -> Option<&ChatMessage> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        self.push(ChatRole::User, question.to_string());

        let reply = match self.service.send(&self.user_id, question) {
            Ok(text) => text,
            Err(ClientError::Rejected { message }) => {
                tracing::warn!(error = %message, "assistant rejected the request");
                PROCESSING_FALLBACK.to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, "assistant request failed");
                CONNECTION_FALLBACK.to_string()
            }
        };
        self.push(ChatRole::Assistant, reply);
        self.messages.last()
    }

    fn push(&mut self, role: ChatRole, content: String) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            content,
            timestamp: Utc::now(),
        });
        self.next_id += 1;
    }
}
