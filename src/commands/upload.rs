// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, prompt};
use crate::render;
use crate::services::UploadService;
use crate::upload::{CandidateEdit, SelectedFile, UploadFlow, upload_error_message};
use crate::utils::{format_file_size, parse_date};
use anyhow::{Result, anyhow, bail};
use std::path::Path;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    let path = m.get_one::<String>("path").map(String::as_str).unwrap_or_default();
    let file = SelectedFile::from_path(Path::new(path))?;
    let mut flow = UploadFlow::new(UploadService::new(ctx.api.clone()), &ctx.user_id()?)
        .with_timeout(ctx.settings.upload_timeout());

    eprintln!(
        "{} ({}, {})",
        render::loading_card("transactions from receipt"),
        file.name,
        format_file_size(file.size)
    );
    flow.upload(&file)
        .map_err(|e| anyhow!(upload_error_message(&e)))?;
    if flow.candidates().is_empty() {
        println!("No transactions found in {}.", file.name);
        return Ok(());
    }

    let drops: Vec<usize> = m
        .get_many::<usize>("drop")
        .map(|v| v.copied().collect())
        .unwrap_or_default();
    drop_rows(&mut flow, &drops)?;

    if !m.get_flag("yes") {
        loop {
            println!("{}", render::candidates_table(flow.candidates(), ctx.currency()));
            let line = prompt("[s]ave, [d]rop <n>, [e]dit <n> key=value..., [c]ancel: ")?;
            match review(&mut flow, &line) {
                Ok(Review::Save) => break,
                Ok(Review::Cancel) => {
                    flow.cancel();
                    println!("Upload cancelled. Nothing was saved.");
                    return Ok(());
                }
                Ok(Review::Continue) => {}
                Err(e) => eprintln!("{}", e),
            }
            if flow.candidates().is_empty() {
                println!("All transactions removed. Nothing to save.");
                flow.cancel();
                return Ok(());
            }
        }
    }

    let uploaded = flow.commit()?;
    println!("Saved {} transaction(s).", uploaded);
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub enum Review {
    Save,
    Cancel,
    Continue,
}

/// Applies one line of review input to the preview.
pub fn review(flow: &mut UploadFlow, line: &str) -> Result<Review> {
    let mut words = line.split_whitespace();
    match words.next().map(|w| w.to_ascii_lowercase()).as_deref() {
        Some("s" | "save") => Ok(Review::Save),
        Some("c" | "cancel") => Ok(Review::Cancel),
        Some("d" | "drop") => {
            let row = row_number(words.next())?;
            drop_row(flow, row)?;
            Ok(Review::Continue)
        }
        Some("e" | "edit") => {
            let row = row_number(words.next())?;
            let id = candidate_id(flow, row)?;
            let edit = parse_edit(words)?;
            flow.edit_candidate(&id, edit)?;
            Ok(Review::Continue)
        }
        _ => bail!("Unrecognised choice '{}'", line.trim()),
    }
}

fn row_number(w: Option<&str>) -> Result<usize> {
    w.and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow!("Give a row number from the table"))
}

fn candidate_id(flow: &UploadFlow, row: usize) -> Result<String> {
    row.checked_sub(1)
        .and_then(|i| flow.candidates().get(i))
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow!("No row {}", row))
}

/// Removes the given table rows. Rows refer to the table as shown, so all of
/// them are resolved before any is removed; repeats count once.
pub fn drop_rows(flow: &mut UploadFlow, rows: &[usize]) -> Result<()> {
    let ids = rows
        .iter()
        .map(|&row| candidate_id(flow, row))
        .collect::<Result<Vec<_>>>()?;
    for id in ids {
        flow.remove_candidate(&id);
    }
    Ok(())
}

fn drop_row(flow: &mut UploadFlow, row: usize) -> Result<()> {
    let id = candidate_id(flow, row)?;
    flow.remove_candidate(&id);
    Ok(())
}

fn parse_edit<'a>(pairs: impl Iterator<Item = &'a str>) -> Result<CandidateEdit> {
    let mut edit = CandidateEdit::default();
    for pair in pairs {
        let (k, v) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected key=value, got '{}'", pair))?;
        let v = v.replace('_', " ");
        match k {
            "title" => edit.title = Some(v),
            "amount" => edit.amount = Some(v),
            "category" => edit.category = Some(v),
            "type" => edit.kind = Some(v.parse()?),
            "date" => edit.transaction_date = Some(parse_date(&v)?),
            "ref" | "reference" => edit.reference = Some(v),
            other => bail!("Unknown field '{}'", other),
        }
    }
    Ok(edit)
}
