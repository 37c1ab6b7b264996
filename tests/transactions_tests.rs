// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FakeTransport, USER, client, tx_json};
use finclip::api::Method;
use finclip::error::ClientError;
use finclip::models::{TransactionDraft, TransactionFilters, TransactionType};
use finclip::services::TransactionService;
use finclip::stores::TransactionStore;
use finclip::{cli, commands::transactions};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

fn base() -> String {
    format!("/users/{}/transactions", USER)
}

fn seeded() -> Arc<FakeTransport> {
    let t = FakeTransport::new();
    t.respond(
        Method::Get,
        &base(),
        200,
        json!([
            tx_json("t1", "250.00", "debit", "Food & Drinks", "2025-01-03"),
            tx_json("t2", "5000", "credit", "Income", "2025-01-01"),
        ]),
    );
    t.respond(
        Method::Get,
        &format!("{}/summary", base()),
        200,
        json!({ "balance": "4750", "income": "5000", "expenses": "250" }),
    );
    t
}

fn store(t: &Arc<FakeTransport>) -> TransactionStore {
    TransactionStore::new(TransactionService::new(client(t)), USER)
}

fn draft(amount: &str) -> TransactionDraft {
    TransactionDraft {
        title: "Lunch".into(),
        amount: amount.into(),
        category: "Food & Drinks".into(),
        is_expense: true,
        ..Default::default()
    }
}

#[test]
fn invalid_amounts_never_reach_the_backend() {
    let t = seeded();
    let mut s = store(&t);
    for raw in ["0", "-12", "twelve", ""] {
        let err = s.create_transaction(&draft(raw)).unwrap_err();
        assert_eq!(err.user_message(), "Please enter a valid amount");
    }
    assert_eq!(t.count(), 0);
    assert_eq!(s.error(), Some("Please enter a valid amount"));
}

#[test]
fn load_data_fetches_list_and_summary_with_token() {
    let t = seeded();
    let mut s = store(&t);
    s.load_data().unwrap();
    assert_eq!(s.transactions().len(), 2);
    assert_eq!(s.summary().balance, Decimal::from(4750));
    assert!(!s.is_loading());
    assert!(s.error().is_none());
    for r in t.requests() {
        assert_eq!(r.bearer.as_deref(), Some("tok-1"));
    }
}

#[test]
fn failed_summary_sets_error_but_keeps_list() {
    let t = seeded();
    t.respond_raw(
        Method::Get,
        &format!("{}/summary", base()),
        502,
        "<html><body>Bad gateway</body></html>",
    );
    let mut s = store(&t);
    let err = s.load_data().unwrap_err();
    assert!(matches!(err, ClientError::ServiceUnavailable { status: 502 }));
    assert_eq!(s.transactions().len(), 2);
    assert_eq!(s.error(), Some("Service temporarily unavailable"));
    s.clear_error();
    assert!(s.error().is_none());
}

#[test]
fn create_posts_then_reloads() {
    let t = seeded();
    t.respond(
        Method::Post,
        &base(),
        201,
        tx_json("t3", "120.5", "debit", "Food & Drinks", "2025-01-04"),
    );
    let mut s = store(&t);
    let created = s.create_transaction(&draft("120.50")).unwrap();
    assert_eq!(created.id, "t3");

    let posts = t.sent_to(Method::Post, &base());
    assert_eq!(posts.len(), 1);
    let body = posts[0].json_body().unwrap();
    assert_eq!(body["amount"], json!(120.5));
    assert_eq!(body["type"], "debit");
    assert_eq!(body["category"], "Food & Drinks");
    assert_eq!(body["description"], "Lunch");
    // list + summary after the POST
    assert_eq!(t.count(), 3);
}

#[test]
fn bulk_delete_sends_ids_and_skips_empty() {
    let t = seeded();
    t.respond(Method::Delete, &base(), 200, json!({ "deleted": 2 }));
    let mut s = store(&t);
    s.bulk_delete_transactions(&[]).unwrap();
    assert_eq!(t.count(), 0);

    s.bulk_delete_transactions(&["t1".to_string(), "t2".to_string()])
        .unwrap();
    let del = t.sent_to(Method::Delete, &base());
    assert_eq!(
        del[0].json_body(),
        Some(&json!({ "transactionIds": ["t1", "t2"] }))
    );
}

#[test]
fn filters_become_query_parameters() {
    let t = seeded();
    let mut s = store(&t);
    let filters = TransactionFilters {
        category: Some("Income".into()),
        kind: Some(TransactionType::Credit),
        limit: Some(10),
        ..Default::default()
    };
    s.filter_transactions(&filters).unwrap();
    let q = &t.requests()[0].query;
    assert!(q.contains(&("category".to_string(), "Income".to_string())));
    assert!(q.contains(&("type".to_string(), "credit".to_string())));
    assert!(q.contains(&("limit".to_string(), "10".to_string())));
}

#[test]
fn update_in_state_replaces_matching_row_only() {
    let t = seeded();
    let mut s = store(&t);
    s.fetch_transactions().unwrap();
    let mut changed = s.transactions()[0].clone();
    changed.category = "Shopping".into();
    s.update_transaction_in_state(changed);
    assert_eq!(s.transactions()[0].category, "Shopping");
    assert_eq!(s.transactions()[1].category, "Income");
    assert_eq!(t.count(), 1);
}

#[test]
fn list_args_parse_into_filters() {
    let matches = cli::build_cli().get_matches_from([
        "finclip", "tx", "list", "--category", "food", "--type", "debit", "--from",
        "2025-01-01", "--limit", "2",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let f = transactions::filters_from(list_m).unwrap();
            assert_eq!(f.category.as_deref(), Some("Food & Drinks"));
            assert_eq!(f.kind, Some(TransactionType::Debit));
            assert_eq!(f.limit, Some(2));
            assert_eq!(f.start_date.unwrap().to_string(), "2025-01-01");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_args_build_a_draft() {
    let matches = cli::build_cli().get_matches_from([
        "finclip", "tx", "add", "--title", "Salary", "--amount", "50000", "--category",
        "Income", "--income", "--tag", "job",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("add", add_m)) = tx_m.subcommand() else {
        panic!("no add subcommand");
    };
    let d = transactions::draft_from(add_m).unwrap();
    assert!(!d.is_expense);
    assert_eq!(d.tags, vec!["job".to_string()]);
    assert_eq!(d.amount, "50000");
}
