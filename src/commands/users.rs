// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Ctx;
use crate::models::BackendUser;
use crate::services::UserService;
use crate::stores::UserStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    let mut store = UserStore::new(UserService::new(ctx.api.clone()));
    let arg = |sub: &clap::ArgMatches, k: &str| sub.get_one::<String>(k).cloned();
    match m.subcommand() {
        Some(("list", sub)) => {
            let users = store.list_users()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &users)? {
                println!("{}", users_table(&users));
            }
        }
        Some(("get", sub)) => {
            let u = store.get_user(&arg(sub, "id").unwrap_or_default())?;
            println!("{}", users_table(std::slice::from_ref(&u)));
        }
        Some(("create", sub)) => {
            let u = store.create_user(
                &arg(sub, "name").unwrap_or_default(),
                &arg(sub, "email").unwrap_or_default(),
            )?;
            println!("Created user {}", u.id);
        }
        Some(("update", sub)) => {
            let u = store.update_user(
                &arg(sub, "id").unwrap_or_default(),
                arg(sub, "name").as_deref(),
                arg(sub, "email").as_deref(),
            )?;
            println!("Updated user {}", u.id);
        }
        Some(("delete", sub)) => {
            let id = arg(sub, "id").unwrap_or_default();
            store.delete_user(&id)?;
            println!("Deleted user {}", id);
        }
        Some(("sync", _)) => {
            let identity = ctx
                .api
                .session()
                .identity()
                .context("Please sign in first")?;
            let u = store.create_or_get_user(&identity)?;
            println!("Backend record ready for {}", u.id);
        }
        _ => {}
    }
    Ok(())
}

fn users_table(users: &[BackendUser]) -> comfy_table::Table {
    let rows = users
        .iter()
        .map(|u| {
            let name = u.name.clone().unwrap_or_else(|| {
                [u.first_name.as_deref(), u.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ")
            });
            vec![
                u.id.clone(),
                name,
                u.username.clone().unwrap_or_default(),
                u.email.clone().unwrap_or_default(),
            ]
        })
        .collect();
    pretty_table(&["ID", "Name", "Username", "Email"], rows)
}
