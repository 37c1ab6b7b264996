// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .default_value("month")
        .help("day, week, month or year")
}

pub fn build_cli() -> Command {
    Command::new("finclip")
        .about("Personal finance tracker: transactions, receipt scanning and an AI assistant")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v, -vv)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a config.toml overriding the default location"),
        )
        .subcommand(
            Command::new("auth")
                .about("Sign up and inspect the current session")
                .subcommand(
                    Command::new("signup")
                        .about("Create an account and verify it with the emailed code")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(
                            Arg::new("code")
                                .long("code")
                                .help("Verification code; prompted for when omitted"),
                        ),
                )
                .subcommand(Command::new("whoami").about("Show the signed-in identity")),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("type").long("type").help("debit or credit"))
                        .arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("offset")
                                .long("offset")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("by-date")
                                .long("by-date")
                                .action(ArgAction::SetTrue)
                                .help("Group the table by day"),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .help("Record as income (credit) instead of an expense"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("reference").long("reference"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("tag").long("tag").action(ArgAction::Append)),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a transaction")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("reference").long("reference")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete one or more transactions")
                        .arg(Arg::new("ids").required(true).num_args(1..)),
                )
                .subcommand(
                    Command::new("summary")
                        .about("Balance, income and expenses")
                        .arg(
                            Arg::new("by-category")
                                .long("by-category")
                                .action(ArgAction::SetTrue),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("export")
                        .about("Write transactions to a CSV or JSON file")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        ),
                ),
        )
        .subcommand(
            Command::new("finance")
                .about("Aggregates by period")
                .subcommand(
                    Command::new("summary")
                        .arg(period_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("breakdown")
                        .arg(period_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("all")
                        .about("Summary and breakdown for several periods at once")
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .action(ArgAction::Append)
                                .help("Repeatable; all four periods when omitted"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("upload")
                .about("Extract transactions from a receipt or statement and save them")
                .arg(Arg::new("path").required(true))
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::SetTrue)
                        .help("Save every extracted transaction without asking"),
                )
                .arg(
                    Arg::new("drop")
                        .long("drop")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(usize))
                        .help("Row number to discard before saving (repeatable)"),
                ),
        )
        .subcommand(
            Command::new("chat")
                .about("Ask the finance assistant")
                .arg(
                    Arg::new("message")
                        .long("message")
                        .short('m')
                        .help("Ask once and exit instead of starting a session"),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("Your profile")
                .subcommand(Command::new("show").args(json_args()))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("first-name").long("first-name"))
                        .arg(Arg::new("last-name").long("last-name"))
                        .arg(Arg::new("username").long("username"))
                        .arg(Arg::new("phone").long("phone")),
                )
                .subcommand(
                    Command::new("image")
                        .about("Upload a new profile picture")
                        .arg(Arg::new("path").required(true)),
                )
                .subcommand(
                    Command::new("check-username")
                        .about("Check whether a username is free")
                        .arg(Arg::new("username").required(true)),
                ),
        )
        .subcommand(
            Command::new("user")
                .about("Backend user records")
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(Command::new("get").arg(Arg::new("id").required(true)))
                .subcommand(
                    Command::new("create")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(Command::new("delete").arg(Arg::new("id").required(true)))
                .subcommand(
                    Command::new("sync").about("Ensure the signed-in user has a backend record"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Configuration")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("path")),
        )
}
