// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, config_path};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let redacted = |v: &Option<String>| match v {
                Some(_) => "(set)".to_string(),
                None => String::new(),
            };
            let rows = vec![
                vec!["api_url".into(), settings.api_url.clone()],
                vec![
                    "auth_url".into(),
                    settings.auth_url.clone().unwrap_or_default(),
                ],
                vec![
                    "request_timeout_secs".into(),
                    settings.request_timeout_secs.to_string(),
                ],
                vec![
                    "upload_timeout_secs".into(),
                    settings.upload_timeout_secs.to_string(),
                ],
                vec![
                    "username_debounce_ms".into(),
                    settings.username_debounce_ms.to_string(),
                ],
                vec!["currency".into(), settings.currency.clone()],
                vec![
                    "log_dir".into(),
                    settings.log_dir.clone().unwrap_or_default(),
                ],
                vec!["session.id".into(), redacted(&settings.session.id)],
                vec!["session.token".into(), redacted(&settings.session.token)],
                vec![
                    "session.user_id".into(),
                    settings.session.user_id.clone().unwrap_or_default(),
                ],
            ];
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        Some(("path", _)) => println!("{}", config_path()?.display()),
        _ => {}
    }
    Ok(())
}
