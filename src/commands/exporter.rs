// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Ctx;
use crate::models::Transaction;
use crate::utils::sort_by_date;
use anyhow::{Result, bail};
use std::path::Path;

pub fn handle(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("path").map(String::as_str).unwrap_or_default();

    let mut store = super::transactions::store(ctx)?;
    store.fetch_transactions()?;
    let txs = sort_by_date(store.transactions(), true);
    let n = write_transactions(Path::new(out), &fmt, &txs)?;
    println!("Exported {} transactions to {}", n, out);
    Ok(())
}

/// Writes `txs` oldest first. Unknown formats fail before the file is created.
pub fn write_transactions(out: &Path, fmt: &str, txs: &[Transaction]) -> Result<usize> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "title",
                "type",
                "amount",
                "currency",
                "category",
                "reference",
                "id",
            ])?;
            for t in txs {
                wtr.write_record([
                    t.effective_date().map(|d| d.to_string()).unwrap_or_default(),
                    t.display_title().to_string(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    t.currency.clone(),
                    t.category.clone(),
                    t.reference.clone().unwrap_or_default(),
                    t.id.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => std::fs::write(out, serde_json::to_string_pretty(txs)?)?,
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(txs.len())
}
