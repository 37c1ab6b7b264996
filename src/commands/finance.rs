// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Ctx;
use crate::models::Period;
use crate::render;
use crate::services::FinanceService;
use crate::stores::FinanceStore;
use crate::utils::maybe_print_json;
use anyhow::Result;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    let mut store = FinanceStore::new(FinanceService::new(ctx.api.clone()), &ctx.user_id()?);
    match m.subcommand() {
        Some(("summary", sub)) => summary(ctx, &mut store, sub)?,
        Some(("breakdown", sub)) => breakdown(ctx, &mut store, sub)?,
        Some(("all", sub)) => all(ctx, &mut store, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_str(sub: &clap::ArgMatches) -> &str {
    sub.get_one::<String>("period")
        .map(String::as_str)
        .unwrap_or("month")
}

fn summary(ctx: &Ctx, store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let s = store.summary_by_period(period_str(sub))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!("{}", render::finance_card(&s, ctx.currency()));
    }
    Ok(())
}

fn breakdown(ctx: &Ctx, store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let b = store.breakdown_by_period(period_str(sub))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &b)? {
        if b.categories.is_empty() {
            println!("No spending recorded for this {}.", period_str(sub));
        } else {
            println!("{}", render::breakdown_table(&b, ctx.currency()));
        }
    }
    Ok(())
}

fn all(ctx: &Ctx, store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let periods = sub
        .get_many::<String>("period")
        .map(|v| v.map(|p| p.parse::<Period>()).collect::<Result<Vec<_>, _>>())
        .transpose()?
        .unwrap_or_default();
    let data = store.multi_period(&periods)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    for (period, d) in &data {
        println!("{}", period.as_str().to_uppercase());
        println!("{}", render::finance_card(&d.summary, ctx.currency()));
        if !d.breakdown.categories.is_empty() {
            println!("{}", render::breakdown_table(&d.breakdown, ctx.currency()));
        }
    }
    Ok(())
}
