// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Ctx;
use crate::render;
use crate::services::{ProfileService, UserService};
use crate::stores::ProfileStore;
use crate::upload::{FileKind, SelectedFile};
use crate::username::{UsernameField, UsernameStatus};
use crate::utils::maybe_print_json;
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::time::Instant;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("image", sub)) => image(ctx, sub)?,
        Some(("check-username", sub)) => check_username(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn store(ctx: &Ctx) -> ProfileStore {
    ProfileStore::new(
        ProfileService::new(ctx.api.clone()),
        ctx.api.session().clone(),
    )
}

fn show(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let mut store = store(ctx);
    store.load()?;
    if let Some(err) = store.error() {
        eprintln!("{}", render::error_card("Showing sign-in details only", err));
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), store.view())? {
        println!("{}", render::profile_table(store.view()));
    }
    Ok(())
}

fn edit(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let mut store = store(ctx);
    store.load()?;
    let mut edited = store.view().clone();
    let text = |k: &str| sub.get_one::<String>(k).cloned();
    if let Some(v) = text("first-name") {
        edited.first_name = v;
    }
    if let Some(v) = text("last-name") {
        edited.last_name = v;
    }
    if let Some(v) = text("username") {
        edited.username = v;
    }
    if let Some(v) = text("phone") {
        edited.phone_number = v;
    }
    let users = UserService::new(ctx.api.clone());
    let update = store.save(&edited, &users)?;
    println!("Profile updated:");
    println!("{}", serde_json::to_string_pretty(&update)?);
    Ok(())
}

fn image(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").map(String::as_str).unwrap_or_default();
    let file = SelectedFile::from_path(Path::new(path))?;
    if file.kind != FileKind::Image {
        bail!("Profile pictures must be images (jpg, png, webp or heic)");
    }
    let bytes = std::fs::read(&file.path)
        .with_context(|| format!("Failed to read {}", file.path.display()))?;

    let mut store = store(ctx);
    store.on_change(|view| {
        tracing::debug!(image = ?view.profile_image, "profile image changed locally");
    });
    let url = store.upload_image(&file.name, file.mime, bytes)?;
    println!("Profile picture updated: {}", url);
    Ok(())
}

fn check_username(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("username").map(String::as_str).unwrap_or_default();
    let users = UserService::new(ctx.api.clone());
    let mut field = UsernameField::new(ctx.settings.username_debounce());
    field.on_input(name, Instant::now());
    if let Some(due) = field.next_due() {
        std::thread::sleep(due.saturating_duration_since(Instant::now()));
        field.poll(Instant::now(), &users);
    }
    match field.status() {
        UsernameStatus::Available => println!("'{}' is available", name.trim()),
        UsernameStatus::Empty => bail!("Enter a username to check"),
        _ => bail!(
            "{}",
            field.error().unwrap_or_else(|| "Username is not available".into())
        ),
    }
    Ok(())
}
