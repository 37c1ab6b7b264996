// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Ctx;
use crate::models::{
    Category, TransactionDraft, TransactionFilters, TransactionPatch, TransactionType,
    parse_positive_amount,
};
use crate::render;
use crate::services::TransactionService;
use crate::stores::TransactionStore;
use crate::utils::{
    category_stats, format_currency, group_by_date, maybe_print_json, parse_date, pretty_table,
};
use anyhow::{Result, bail};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => remove(ctx, sub)?,
        Some(("summary", sub)) => summary(ctx, sub)?,
        Some(("export", sub)) => super::exporter::handle(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

pub(crate) fn store(ctx: &Ctx) -> Result<TransactionStore> {
    let service = TransactionService::new(ctx.api.clone());
    Ok(TransactionStore::new(service, &ctx.user_id()?))
}

pub fn filters_from(sub: &clap::ArgMatches) -> Result<TransactionFilters> {
    Ok(TransactionFilters {
        category: sub
            .get_one::<String>("category")
            .map(|c| Category::lookup(c).map(|k| k.name.to_string()).unwrap_or(c.clone())),
        kind: sub
            .get_one::<String>("type")
            .map(|t| t.parse::<TransactionType>())
            .transpose()?,
        start_date: sub
            .get_one::<String>("from")
            .map(|s| parse_date(s))
            .transpose()?,
        end_date: sub
            .get_one::<String>("to")
            .map(|s| parse_date(s))
            .transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
        offset: sub.get_one::<usize>("offset").copied(),
    })
}

pub fn draft_from(sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let text = |k: &str| sub.get_one::<String>(k).cloned();
    Ok(TransactionDraft {
        title: text("title").unwrap_or_default(),
        amount: text("amount").unwrap_or_default(),
        category: text("category").unwrap_or_default(),
        is_expense: !sub.get_flag("income"),
        description: text("description"),
        reference: text("reference"),
        transaction_date: text("date").map(|d| parse_date(&d)).transpose()?,
        currency: text("currency"),
        tags: sub
            .get_many::<String>("tag")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
    })
}

pub fn patch_from(sub: &clap::ArgMatches) -> Result<TransactionPatch> {
    let text = |k: &str| sub.get_one::<String>(k).cloned();
    let category = match text("category") {
        Some(c) => match Category::lookup(&c) {
            Some(cat) => Some(cat.name.to_string()),
            None => bail!("Unknown category '{}'", c),
        },
        None => None,
    };
    Ok(TransactionPatch {
        description: text("description"),
        amount: text("amount")
            .map(|a| parse_positive_amount(&a))
            .transpose()?,
        category,
        kind: text("type")
            .map(|t| t.parse::<TransactionType>())
            .transpose()?,
        transaction_date: text("date")
            .map(|d| parse_date(&d).map(|d| d.to_string()))
            .transpose()?,
        reference: text("reference"),
    })
}

fn list(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filters = filters_from(sub)?;
    let mut store = store(ctx)?;
    if filters == TransactionFilters::default() {
        store.fetch_transactions()?;
    } else {
        store.filter_transactions(&filters)?;
    }
    let txs = store.transactions();
    if maybe_print_json(json_flag, jsonl_flag, &txs)? {
        return Ok(());
    }
    if txs.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }
    if sub.get_flag("by-date") {
        for (date, group) in group_by_date(txs) {
            let heading = date.map(|d| d.format("%a %b %d %Y").to_string());
            println!("{}", heading.as_deref().unwrap_or("Undated"));
            let owned: Vec<_> = group.into_iter().cloned().collect();
            println!("{}", render::transactions_table(&owned));
        }
    } else {
        println!("{}", render::transactions_table(txs));
    }
    Ok(())
}

fn add(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from(sub)?;
    let mut store = store(ctx)?;
    let tx = store.create_transaction(&draft)?;
    println!(
        "Recorded {} '{}' in {} ({})",
        crate::utils::format_signed(&tx),
        tx.display_title(),
        tx.category,
        tx.id
    );
    println!("{}", render::summary_card(store.summary(), ctx.currency()));
    Ok(())
}

fn edit(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").map(String::as_str).unwrap_or_default();
    let patch = patch_from(sub)?;
    if patch.is_empty() {
        bail!("Nothing to change. Pass at least one field to update.");
    }
    let mut store = store(ctx)?;
    let tx = store.update_transaction(id, &patch)?;
    println!("Updated {} ({})", tx.display_title(), tx.id);
    Ok(())
}

fn remove(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let ids: Vec<String> = sub
        .get_many::<String>("ids")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();
    let mut store = store(ctx)?;
    match ids.as_slice() {
        [] => {}
        [one] => store.delete_transaction(one)?,
        many => store.bulk_delete_transactions(many)?,
    }
    println!("Deleted {} transaction(s)", ids.len());
    Ok(())
}

fn summary(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut store = store(ctx)?;
    if !sub.get_flag("by-category") {
        store.fetch_summary()?;
        if !maybe_print_json(json_flag, jsonl_flag, store.summary())? {
            println!("{}", render::summary_card(store.summary(), ctx.currency()));
        }
        return Ok(());
    }

    store.load_data()?;
    let stats = category_stats(store.transactions());
    if !maybe_print_json(json_flag, jsonl_flag, &stats)? {
        println!("{}", render::summary_card(store.summary(), ctx.currency()));
        let rows = stats
            .iter()
            .map(|(name, s)| {
                vec![
                    name.clone(),
                    s.count.to_string(),
                    format_currency(s.total, ctx.currency()),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Count", "Total"], rows));
    }
    Ok(())
}
