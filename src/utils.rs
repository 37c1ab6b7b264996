// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionType};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

fn currency_symbol(ccy: &str) -> Option<&'static str> {
    match ccy.to_ascii_uppercase().as_str() {
        "INR" => Some("₹"),
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// Groups the integer part the Indian way: last three digits, then pairs.
fn group_indian(int: &str) -> String {
    if int.len() <= 3 {
        return int.to_string();
    }
    let (head, tail) = int.split_at(int.len() - 3);
    let mut parts: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (a, b) = rest.split_at(rest.len() - 2);
        parts.push(b);
        rest = a;
    }
    parts.push(rest);
    parts.reverse();
    format!("{},{}", parts.join(","), tail)
}

/// `₹1,23,456.78` for INR; other currencies get their symbol or code.
pub fn format_currency(amount: Decimal, ccy: &str) -> String {
    let fixed = format!("{:.2}", amount.abs().round_dp(2));
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    match currency_symbol(ccy) {
        Some(sym) => format!("{}{}{}.{}", sign, sym, group_indian(int), frac),
        None => format!("{}{} {}.{}", sign, ccy, group_indian(int), frac),
    }
}

/// `+₹12.00` for credits and `-₹12.00` for debits.
pub fn format_signed(tx: &Transaction) -> String {
    let sign = if tx.kind.is_income() { "+" } else { "-" };
    format!("{}{}", sign, format_currency(tx.amount.abs(), &tx.currency))
}

/// Relative change in percent; from zero it is 100 for growth and 0 otherwise.
pub fn percentage_change(old: Decimal, new: Decimal) -> Decimal {
    if old.is_zero() {
        return if new > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    (new - old) / old.abs() * Decimal::ONE_HUNDRED
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    let rounded = (size * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Buckets by effective date, newest first. Undated transactions come last.
pub fn group_by_date(txs: &[Transaction]) -> Vec<(Option<NaiveDate>, Vec<&Transaction>)> {
    let mut groups: BTreeMap<Option<NaiveDate>, Vec<&Transaction>> = BTreeMap::new();
    for tx in txs {
        groups.entry(tx.effective_date()).or_default().push(tx);
    }
    let mut out: Vec<_> = groups.into_iter().collect();
    out.sort_by(|a, b| match (a.0, b.0) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some(_), None) => std::cmp::Ordering::Less,
        (Some(x), Some(y)) => y.cmp(&x),
    });
    out
}

pub fn sort_by_date(txs: &[Transaction], ascending: bool) -> Vec<Transaction> {
    let mut v = txs.to_vec();
    v.sort_by_key(|t| t.effective_date());
    if !ascending {
        v.reverse();
    }
    v
}

pub fn total_for(txs: &[Transaction], kind: Option<TransactionType>) -> Decimal {
    txs.iter()
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .map(|t| t.amount)
        .sum()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryStat {
    pub count: usize,
    pub total: Decimal,
}

pub fn category_stats(txs: &[Transaction]) -> BTreeMap<String, CategoryStat> {
    let mut stats: BTreeMap<String, CategoryStat> = BTreeMap::new();
    for tx in txs {
        let name = if tx.category.trim().is_empty() {
            "Uncategorized".to_string()
        } else {
            tx.category.clone()
        };
        let s = stats.entry(name).or_default();
        s.count += 1;
        s.total += tx.amount;
    }
    stats
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: Serialize>(json_flag: bool, jsonl_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line.
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn inr_uses_lakh_grouping() {
        assert_eq!(format_currency(d("1234567.5"), "INR"), "₹12,34,567.50");
        assert_eq!(format_currency(d("999"), "INR"), "₹999.00");
        assert_eq!(format_currency(d("-1500"), "inr"), "-₹1,500.00");
        assert_eq!(format_currency(d("10"), "JPY"), "JPY 10.00");
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
    }

    #[test]
    fn percentage_change_from_zero() {
        assert_eq!(percentage_change(Decimal::ZERO, d("5")), Decimal::ONE_HUNDRED);
        assert_eq!(percentage_change(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage_change(d("200"), d("150")), d("-25"));
    }
}
