// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::tx_json;
use finclip::commands::exporter::write_transactions;
use finclip::models::Transaction;
use finclip::utils::sort_by_date;
use serde_json::Value;
use tempfile::tempdir;

fn txs() -> Vec<Transaction> {
    let mut reference = tx_json("t2", "1200.50", "debit", "Bills", "2025-03-04");
    reference["reference"] = "INV-7".into();
    vec![
        serde_json::from_value(reference).unwrap(),
        serde_json::from_value(tx_json("t1", "45000", "credit", "Income", "2025-03-01"))
            .unwrap(),
    ]
}

#[test]
fn csv_export_is_oldest_first() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let sorted = sort_by_date(&txs(), true);
    let n = write_transactions(&out, "csv", &sorted).unwrap();
    assert_eq!(n, 2);

    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "date,title,type,amount,currency,category,reference,id"
    );
    assert_eq!(lines[1], "2025-03-01,Income t1,credit,45000,INR,Income,,t1");
    assert_eq!(lines[2], "2025-03-04,Bills t2,debit,1200.50,INR,Bills,INV-7,t2");
}

#[test]
fn json_export_keeps_backend_field_names() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.json");
    write_transactions(&out, "json", &txs()).unwrap();

    let v: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let rows = v.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], "t2");
    assert_eq!(rows[0]["type"], "debit");
    assert_eq!(rows[0]["transaction_date"], "2025-03-04");
}

#[test]
fn unknown_format_fails_before_writing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.xml");
    let err = write_transactions(&out, "xml", &txs()).unwrap_err();
    assert!(err.to_string().contains("Unknown format: xml"));
    assert!(!out.exists());
}
