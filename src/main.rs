// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;

use finclip::{cli, commands, config::Settings, error::alert_text, logging};

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(matches.get_one::<String>("config").map(Path::new))?;
    logging::setup_logging(
        matches.get_count("verbose"),
        settings.log_dir.as_deref(),
    );
    tracing::debug!(
        api_url = %settings.api_url,
        auth_url = ?settings.auth_url,
        currency = %settings.currency,
        "configuration loaded"
    );

    if let Some(("config", sub)) = matches.subcommand() {
        return commands::config::handle(&settings, sub);
    }

    let ctx = commands::Ctx::from_settings(settings)?;
    match matches.subcommand() {
        Some(("auth", sub)) => commands::auth::handle(&ctx, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub)?,
        Some(("finance", sub)) => commands::finance::handle(&ctx, sub)?,
        Some(("upload", sub)) => commands::upload::handle(&ctx, sub)?,
        Some(("chat", sub)) => commands::chat::handle(&ctx, sub)?,
        Some(("profile", sub)) => commands::profile::handle(&ctx, sub)?,
        Some(("user", sub)) => commands::users::handle(&ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "command failed");
            eprintln!("Error: {}", alert_text(&e));
            ExitCode::FAILURE
        }
    }
}
