// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FakeTransport, USER, client};
use finclip::api::{Body, Method, PartValue};
use finclip::error::ClientError;
use finclip::models::TransactionType;
use finclip::services::UploadService;
use finclip::upload::{
    CandidateEdit, SelectedFile, UPLOAD_TIMEOUT, UPLOAD_TIMEOUT_MESSAGE, UploadFlow, UploadPhase,
    upload_error_message,
};
use finclip::commands::upload::{Review, drop_rows, review};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn extraction() -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "transactions": [
                { "title": "Swiggy", "description": "Swiggy order", "amount": 420.0,
                  "category": "Food & Drinks", "type": "debit", "date": "2025-02-01",
                  "reference": "UPI-1" },
                { "description": "Metro card", "amount": -200, "category": "Transportation",
                  "type": "debit", "date": "2025-02-02" }
            ]
        }
    })
}

fn flow(t: &Arc<FakeTransport>) -> UploadFlow {
    UploadFlow::new(UploadService::new(client(t)), USER)
}

#[test]
fn removed_candidate_is_not_saved() {
    let t = FakeTransport::new();
    t.respond(Method::Post, "/upload/file", 200, extraction());
    t.respond(
        Method::Post,
        "/upload/bulk",
        200,
        json!({ "success": true, "data": { "totalUploaded": 1 } }),
    );
    let mut f = flow(&t);
    let ids: Vec<String> = f
        .upload_bytes("receipt.png", "image/png", vec![1, 2, 3])
        .unwrap()
        .iter()
        .map(|c| c.id.clone())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids[0].starts_with("upload-0-"));
    assert_eq!(f.phase(), &UploadPhase::Previewing);

    assert!(f.remove_candidate(&ids[1]));
    assert_eq!(f.commit().unwrap(), 1);

    let bulk = t.sent_to(Method::Post, "/upload/bulk");
    assert_eq!(bulk.len(), 1);
    let body = bulk[0].json_body().unwrap();
    assert_eq!(body["userId"], USER);
    let txs = body["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0]["title"], "Swiggy");
    assert_eq!(txs[0]["amount"], json!(420.0));
    assert_eq!(f.phase(), &UploadPhase::Committed { uploaded: 1 });
}

#[test]
fn upload_is_multipart_with_file_and_user() {
    let t = FakeTransport::new();
    t.respond(Method::Post, "/upload/file", 200, extraction());
    let mut f = flow(&t);
    let cands = f.upload_bytes("receipt.png", "image/png", vec![9]).unwrap();
    // Missing title falls back to the description, amounts are made positive.
    assert_eq!(cands[1].title, "Metro card");
    assert_eq!(cands[1].amount.to_string(), "200");

    let req = &t.requests()[0];
    assert_eq!(req.timeout, Some(UPLOAD_TIMEOUT));
    let Body::Multipart(parts) = &req.body else {
        panic!("expected multipart body");
    };
    assert_eq!(parts[0].name, "file");
    assert!(matches!(&parts[0].value, PartValue::File { file_name, .. } if file_name == "receipt.png"));
    assert_eq!(parts[1].value, PartValue::Text(USER.to_string()));
}

#[test]
fn timeout_has_its_own_message() {
    let t = FakeTransport::new();
    t.route(Method::Post, "/upload/file", |req| {
        Err(ClientError::Timeout(req.timeout.unwrap_or_default()))
    });
    let mut f = flow(&t).with_timeout(Duration::from_secs(60));
    let err = f
        .upload_bytes("statement.pdf", "application/pdf", vec![0])
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(upload_error_message(&err), UPLOAD_TIMEOUT_MESSAGE);
    assert_eq!(f.phase(), &UploadPhase::Idle);
    assert!(f.candidates().is_empty());
}

#[test]
fn quota_failure_is_mapped() {
    let t = FakeTransport::new();
    t.respond(
        Method::Post,
        "/upload/file",
        200,
        json!({ "success": false, "error": "Gemini quota exceeded" }),
    );
    let err = flow(&t)
        .upload_bytes("r.jpg", "image/jpeg", vec![0])
        .unwrap_err();
    assert_eq!(
        upload_error_message(&err),
        "AI service quota exceeded. Please try again later."
    );
}

#[test]
fn cancel_makes_no_request() {
    let t = FakeTransport::new();
    t.respond(Method::Post, "/upload/file", 200, extraction());
    let mut f = flow(&t);
    f.upload_bytes("r.png", "image/png", vec![0]).unwrap();
    f.cancel();
    assert_eq!(t.count(), 1);
    assert_eq!(f.phase(), &UploadPhase::Idle);
    assert!(f.commit().is_err());
    assert_eq!(t.count(), 1);
}

#[test]
fn edits_are_validated_and_applied() {
    let t = FakeTransport::new();
    t.respond(Method::Post, "/upload/file", 200, extraction());
    let mut f = flow(&t);
    let id = f.upload_bytes("r.png", "image/png", vec![0]).unwrap()[0].id.clone();

    let bad = CandidateEdit {
        amount: Some("0".into()),
        ..Default::default()
    };
    assert!(f.edit_candidate(&id, bad).is_err());

    let good = CandidateEdit {
        amount: Some("399.99".into()),
        category: Some("shopping".into()),
        kind: Some(TransactionType::Credit),
        ..Default::default()
    };
    f.edit_candidate(&id, good).unwrap();
    let c = &f.candidates()[0];
    assert_eq!(c.amount.to_string(), "399.99");
    assert_eq!(c.category, "Shopping");
    assert_eq!(c.kind, TransactionType::Credit);
}

#[test]
fn review_commands_drop_and_edit_rows() {
    let t = FakeTransport::new();
    t.respond(Method::Post, "/upload/file", 200, extraction());
    let mut f = flow(&t);
    f.upload_bytes("r.png", "image/png", vec![0]).unwrap();

    assert_eq!(review(&mut f, "e 1 title=Dinner_out").unwrap(), Review::Continue);
    assert_eq!(f.candidates()[0].title, "Dinner out");
    assert_eq!(review(&mut f, "d 2").unwrap(), Review::Continue);
    assert_eq!(f.candidates().len(), 1);
    assert!(review(&mut f, "d 7").is_err());
    assert_eq!(review(&mut f, "save").unwrap(), Review::Save);
    assert_eq!(review(&mut f, "c").unwrap(), Review::Cancel);
}

#[test]
fn selected_file_reads_size_and_kind() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("receipt.jpeg");
    std::fs::write(&p, vec![7u8; 2048]).unwrap();
    let f = SelectedFile::from_path(&p).unwrap();
    assert_eq!(f.size, 2048);
    assert_eq!(f.mime, "image/jpeg");
    assert_eq!(f.name, "receipt.jpeg");
}

#[test]
fn repeated_drop_rows_remove_one_candidate() {
    let t = FakeTransport::new();
    t.respond(
        Method::Post,
        "/upload/file",
        200,
        json!({ "success": true, "data": { "transactions": [
            { "title": "A", "amount": 1, "category": "Bills", "type": "debit" },
            { "title": "B", "amount": 2, "category": "Bills", "type": "debit" },
            { "title": "C", "amount": 3, "category": "Bills", "type": "debit" }
        ] } }),
    );
    t.respond(Method::Post, "/upload/bulk", 200, json!({ "totalUploaded": 2 }));
    let mut f = flow(&t);
    f.upload_bytes("r.png", "image/png", vec![0]).unwrap();

    drop_rows(&mut f, &[2, 2]).unwrap();
    let titles: Vec<&str> = f.candidates().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["A", "C"]);

    assert!(drop_rows(&mut f, &[1, 5]).is_err());
    assert_eq!(f.candidates().len(), 2);

    f.commit().unwrap();
    let body = t.sent_to(Method::Post, "/upload/bulk")[0].json_body().cloned().unwrap();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
}
