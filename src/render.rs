// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Terminal presentation for command output.

use crate::models::{
    CandidateTransaction, FinancialBreakdown, FinancialSummary, ProfileView, Transaction,
    TransactionSummary,
};
use crate::utils::{format_currency, format_signed, pretty_table};
use comfy_table::Table;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

static STRONG: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").ok());

pub fn transactions_table(txs: &[Transaction]) -> Table {
    let rows = txs
        .iter()
        .map(|t| {
            vec![
                t.effective_date().map(|d| d.to_string()).unwrap_or_default(),
                t.display_title().to_string(),
                t.category.clone(),
                t.reference.clone().unwrap_or_default(),
                format_signed(t),
                t.id.clone(),
            ]
        })
        .collect();
    pretty_table(&["Date", "Title", "Category", "Ref", "Amount", "ID"], rows)
}

pub fn candidates_table(candidates: &[CandidateTransaction], ccy: &str) -> Table {
    let rows = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let sign = if c.kind.is_income() { "+" } else { "-" };
            vec![
                (i + 1).to_string(),
                c.transaction_date.clone(),
                c.title.clone(),
                c.category.clone(),
                c.reference.clone(),
                format!("{}{}", sign, format_currency(c.amount, ccy)),
            ]
        })
        .collect();
    pretty_table(&["#", "Date", "Title", "Category", "Ref", "Amount"], rows)
}

fn balance_table(balance: Decimal, income: Decimal, expenses: Decimal, ccy: &str) -> Table {
    pretty_table(
        &["Balance", "Income", "Expenses"],
        vec![vec![
            format_currency(balance, ccy),
            format!("+{}", format_currency(income.abs(), ccy)),
            format!("-{}", format_currency(expenses.abs(), ccy)),
        ]],
    )
}

pub fn summary_card(s: &TransactionSummary, ccy: &str) -> Table {
    balance_table(s.balance, s.income, s.expenses, ccy)
}

pub fn finance_card(s: &FinancialSummary, ccy: &str) -> Table {
    balance_table(s.balance, s.income, s.expenses, ccy)
}

pub fn breakdown_table(b: &FinancialBreakdown, ccy: &str) -> Table {
    let rows = b
        .categories
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                c.count.to_string(),
                format_currency(c.total, ccy),
            ]
        })
        .collect();
    pretty_table(&["Category", "Count", "Total"], rows)
}

pub fn profile_table(p: &ProfileView) -> Table {
    let field = |label: &str, v: &str| vec![label.to_string(), v.to_string()];
    pretty_table(
        &["Field", "Value"],
        vec![
            field("First name", &p.first_name),
            field("Last name", &p.last_name),
            field("Username", &p.username),
            field("Email", &p.email),
            field("Phone", &p.phone_number),
            field("Image", p.profile_image.as_deref().unwrap_or("")),
        ],
    )
}

pub fn loading_card(what: &str) -> String {
    format!("Loading {}...", what)
}

pub fn error_card(title: &str, message: &str) -> String {
    format!("{}\n  {}\n  Run the command again to retry.", title, message)
}

/// Renders assistant markdown for a terminal: headings and `**strong**` in
/// bold, list items as bullets.
pub fn ai_message(text: &str, styled: bool) -> String {
    let (on, off) = if styled { (BOLD, RESET) } else { ("", "") };
    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let line = if let Some(h) = trimmed
                .strip_prefix("### ")
                .or_else(|| trimmed.strip_prefix("## "))
                .or_else(|| trimmed.strip_prefix("# "))
            {
                format!("{}{}{}", on, h.trim_start_matches("**").trim_end_matches("**"), off)
            } else if let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                let indent = &line[..line.len() - trimmed.len()];
                format!("{}  • {}", indent, item)
            } else {
                line.to_string()
            };
            match STRONG.as_ref() {
                Some(re) => re
                    .replace_all(&line, format!("{}${{1}}{}", on, off).as_str())
                    .into_owned(),
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_without_styling() {
        let out = ai_message("## Summary\nYou spent **₹500** on food.\n- cut takeaways", false);
        assert_eq!(out, "Summary\nYou spent ₹500 on food.\n  • cut takeaways");
    }
}
