// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Receipt and statement upload with a local preview step.
//!
//! The flow is linear: upload a file and receive AI-extracted candidates,
//! edit or drop candidates locally, then either commit them in one bulk call
//! or cancel without touching the backend.

use crate::error::{ClientError, ClientResult};
use crate::models::{
    CandidateTransaction, Category, ExtractedTransaction, TransactionType, parse_positive_amount,
};
use crate::services::UploadService;
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
pub const UPLOAD_TIMEOUT_MESSAGE: &str =
    "Request timed out. AI processing is taking longer than expected. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub kind: FileKind,
    pub mime: &'static str,
    pub size: u64,
}

fn mime_for(ext: &str) -> Option<(FileKind, &'static str)> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some((FileKind::Image, "image/jpeg")),
        "png" => Some((FileKind::Image, "image/png")),
        "webp" => Some((FileKind::Image, "image/webp")),
        "heic" => Some((FileKind::Image, "image/heic")),
        "pdf" => Some((FileKind::Document, "application/pdf")),
        "csv" => Some((FileKind::Document, "text/csv")),
        _ => None,
    }
}

impl SelectedFile {
    /// Validates a file on disk: supported type and at most 10 MB.
    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(ClientError::validation(format!(
                "{} is not a file",
                path.display()
            )));
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let (kind, mime) = mime_for(ext).ok_or_else(|| {
            ClientError::validation("Unsupported file type. Use an image, PDF or CSV file.")
        })?;
        if meta.len() > MAX_FILE_SIZE {
            return Err(ClientError::validation("File size must be less than 10MB"));
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(SelectedFile {
            path: path.to_path_buf(),
            name,
            kind,
            mime,
            size: meta.len(),
        })
    }
}

/// Maps an upload failure to the message shown to the user.
pub fn upload_error_message(err: &ClientError) -> String {
    match err {
        ClientError::Timeout(_) => UPLOAD_TIMEOUT_MESSAGE.to_string(),
        ClientError::Rejected { message } | ClientError::Status { message, .. } => {
            let m = message.to_lowercase();
            if m.contains("503") || m.contains("overloaded") {
                "AI service is temporarily overloaded. Please try again in a few minutes.".into()
            } else if m.contains("quota") {
                "AI service quota exceeded. Please try again later.".into()
            } else if m.contains("timeout") {
                "Request timed out. Please try again.".into()
            } else if m.contains("network") {
                "Network error. Please check your connection and try again.".into()
            } else if matches!(err, ClientError::Rejected { .. }) {
                format!("Error processing file: {}", message)
            } else {
                err.user_message()
            }
        }
        other => other.user_message(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Previewing,
    Committed { uploaded: usize },
}

/// Local edits to one candidate; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct CandidateEdit {
    pub title: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
    pub transaction_date: Option<NaiveDate>,
    pub reference: Option<String>,
}

pub struct UploadFlow {
    service: UploadService,
    user_id: String,
    timeout: Duration,
    candidates: Vec<CandidateTransaction>,
    phase: UploadPhase,
}

impl UploadFlow {
    pub fn new(service: UploadService, user_id: &str) -> Self {
        UploadFlow {
            service,
            user_id: user_id.to_string(),
            timeout: UPLOAD_TIMEOUT,
            candidates: Vec::new(),
            phase: UploadPhase::Idle,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn candidates(&self) -> &[CandidateTransaction] {
        &self.candidates
    }

    /// Uploads `file` and replaces any previous candidates with the extraction.
    pub fn upload(&mut self, file: &SelectedFile) -> ClientResult<&[CandidateTransaction]> {
        let bytes = std::fs::read(&file.path)?;
        self.upload_bytes(&file.name, file.mime, bytes)
    }

    pub fn upload_bytes(
        &mut self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<&[CandidateTransaction]> {
        self.candidates.clear();
        self.phase = UploadPhase::Idle;
        tracing::info!(file = file_name, size = bytes.len(), "uploading file for extraction");
        let extracted = self
            .service
            .extract(&self.user_id, file_name, mime, bytes, self.timeout)
            .inspect_err(|e| tracing::error!(error = %e, "upload failed"))?;
        let stamp = Utc::now().timestamp_millis();
        self.candidates = extracted
            .into_iter()
            .enumerate()
            .map(|(i, t)| to_candidate(i, stamp, t))
            .collect();
        self.phase = UploadPhase::Previewing;
        Ok(&self.candidates)
    }

    pub fn edit_candidate(&mut self, id: &str, edit: CandidateEdit) -> ClientResult<()> {
        let c = self
            .candidates
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::validation(format!("No candidate with id {}", id)))?;

        let amount = edit.amount.as_deref().map(parse_positive_amount).transpose()?;
        if let Some(title) = edit.title.as_deref().map(str::trim) {
            if title.is_empty() {
                return Err(ClientError::validation("Please fill in all required fields"));
            }
            c.title = title.to_string();
            c.description = title.to_string();
        }
        if let Some(a) = amount {
            c.amount = a;
        }
        if let Some(cat) = edit.category.as_deref() {
            let cat = Category::lookup(cat)
                .ok_or_else(|| ClientError::validation(format!("Unknown category '{}'", cat)))?;
            c.category = cat.name.to_string();
        }
        if let Some(k) = edit.kind {
            c.kind = k;
        }
        if let Some(d) = edit.transaction_date {
            c.transaction_date = d.to_string();
        }
        if let Some(r) = edit.reference {
            c.reference = r;
        }
        Ok(())
    }

    /// Drops a candidate locally. Returns false if no candidate had that id.
    pub fn remove_candidate(&mut self, id: &str) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|c| c.id != id);
        self.candidates.len() != before
    }

    /// Persists the remaining candidates in a single bulk call.
    pub fn commit(&mut self) -> ClientResult<usize> {
        if self.phase != UploadPhase::Previewing {
            return Err(ClientError::validation("Nothing to save. Upload a file first."));
        }
        if self.candidates.is_empty() {
            return Err(ClientError::validation("No transactions left to save"));
        }
        let uploaded = self.service.bulk_save(&self.user_id, &self.candidates)?;
        tracing::info!(uploaded, "bulk save complete");
        self.candidates.clear();
        self.phase = UploadPhase::Committed { uploaded };
        Ok(uploaded)
    }

    /// Discards all candidates without contacting the backend.
    pub fn cancel(&mut self) {
        self.candidates.clear();
        self.phase = UploadPhase::Idle;
    }
}

fn to_candidate(index: usize, stamp: i64, t: ExtractedTransaction) -> CandidateTransaction {
    let description = t.description.clone().unwrap_or_default();
    let title = t
        .title
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| description.clone());
    let date = t
        .date
        .unwrap_or_else(|| Utc::now().date_naive().to_string());
    CandidateTransaction {
        id: format!("upload-{}-{}", index, stamp),
        reference: t.reference.unwrap_or_else(|| title.clone()),
        title,
        description,
        amount: t.amount.abs(),
        category: t.category,
        kind: t.kind,
        transaction_date: date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_and_unknown_files() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("scan.png");
        std::fs::write(&big, vec![0u8; (MAX_FILE_SIZE + 1) as usize]).unwrap();
        let err = SelectedFile::from_path(&big).unwrap_err();
        assert_eq!(err.user_message(), "File size must be less than 10MB");

        let odd = dir.path().join("notes.docx");
        std::fs::write(&odd, b"x").unwrap();
        assert!(matches!(
            SelectedFile::from_path(&odd),
            Err(ClientError::Validation(_))
        ));

        let csv = dir.path().join("statement.CSV");
        std::fs::write(&csv, b"date,amount\n").unwrap();
        let f = SelectedFile::from_path(&csv).unwrap();
        assert_eq!(f.kind, FileKind::Document);
        assert_eq!(f.mime, "text/csv");
    }

    #[test]
    fn friendly_messages_for_backend_failures() {
        let e = ClientError::Rejected {
            message: "Model is overloaded".into(),
        };
        assert_eq!(
            upload_error_message(&e),
            "AI service is temporarily overloaded. Please try again in a few minutes."
        );
        let e = ClientError::Timeout(UPLOAD_TIMEOUT);
        assert_eq!(upload_error_message(&e), UPLOAD_TIMEOUT_MESSAGE);
    }
}
