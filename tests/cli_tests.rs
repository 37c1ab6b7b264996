// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finclip::cli;

fn sub<'a>(m: &'a clap::ArgMatches, path: &[&str]) -> &'a clap::ArgMatches {
    path.iter().fold(m, |m, name| match m.subcommand() {
        Some((n, s)) if n == *name => s,
        other => panic!("expected {}, got {:?}", name, other.map(|(n, _)| n)),
    })
}

#[test]
fn finance_period_defaults_to_month() {
    let m = cli::build_cli().get_matches_from(["finclip", "finance", "summary"]);
    let s = sub(&m, &["finance", "summary"]);
    assert_eq!(s.get_one::<String>("period").unwrap(), "month");
}

#[test]
fn finance_all_collects_repeated_periods() {
    let m = cli::build_cli().get_matches_from([
        "finclip", "finance", "all", "--period", "day", "--period", "year", "--json",
    ]);
    let s = sub(&m, &["finance", "all"]);
    let periods: Vec<&String> = s.get_many::<String>("period").unwrap().collect();
    assert_eq!(periods, ["day", "year"]);
    assert!(s.get_flag("json"));
}

#[test]
fn upload_drops_are_row_numbers() {
    let m = cli::build_cli().get_matches_from([
        "finclip", "-vv", "upload", "receipt.jpg", "--drop", "2", "--drop", "1", "-y",
    ]);
    assert_eq!(m.get_count("verbose"), 2);
    let s = sub(&m, &["upload"]);
    let drops: Vec<usize> = s.get_many::<usize>("drop").unwrap().copied().collect();
    assert_eq!(drops, [2, 1]);
    assert!(s.get_flag("yes"));
    assert!(
        cli::build_cli()
            .try_get_matches_from(["finclip", "upload", "r.jpg", "--drop", "two"])
            .is_err()
    );
}

#[test]
fn json_and_jsonl_conflict() {
    let r = cli::build_cli().try_get_matches_from(["finclip", "tx", "list", "--json", "--jsonl"]);
    assert!(r.is_err());
}
