// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, prompt};
use crate::api::ApiClient;
use crate::auth::{self, SessionProvider, SignUpForm};
use crate::services::UserService;
use anyhow::{Context, Result, bail};
use std::sync::Arc;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("signup", sub)) => signup(ctx, sub)?,
        Some(("whoami", _)) => whoami(ctx)?,
        _ => {}
    }
    Ok(())
}

pub fn form_from(sub: &clap::ArgMatches) -> SignUpForm {
    let text = |k: &str| sub.get_one::<String>(k).cloned().unwrap_or_default();
    SignUpForm {
        email: text("email"),
        password: text("password"),
        username: text("username"),
    }
}

fn signup(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let form = form_from(sub);
    // Local checks run before the provider is even configured.
    form.validate()?;
    let provider = ctx.identity_provider()?;
    let users = UserService::new(ctx.api.clone());

    let pending = auth::start_sign_up(&form, &users, &provider)?;
    let session_id = if pending.is_complete() {
        pending
            .created_session_id
            .clone()
            .context("Sign-up process incomplete. Please try again.")?
    } else {
        println!("We sent a verification code to {}.", form.email.trim());
        let code = match sub.get_one::<String>("code") {
            Some(c) => c.clone(),
            None => prompt("Verification code: ")?,
        };
        let verified = auth::verify_sign_up(&provider, &pending, &code)?;
        verified.session_id
    };

    let session = provider
        .session(&session_id)
        .load()
        .context("Verification failed. Please check your code and try again.")?;
    let Some(identity) = session.identity() else {
        bail!("Sign-up process incomplete. Please try again.");
    };
    let mirror = UserService::new(ApiClient::new(ctx.transport.clone(), Arc::new(session)));
    auth::mirror_new_user(&mirror, &identity.id, &form);

    println!("Welcome, {}! Add this to your config to stay signed in:", form.username.trim());
    println!("[session]\nid = \"{}\"\nuser_id = \"{}\"", session_id, identity.id);
    Ok(())
}

fn whoami(ctx: &Ctx) -> Result<()> {
    match ctx.api.session().identity() {
        Some(i) => {
            let name = i.full_name();
            println!("{} <{}>", if name.is_empty() { &i.id } else { &name }, i.email);
            if let Some(u) = &i.username {
                println!("username: {}", u);
            }
        }
        None => println!("Not signed in."),
    }
    Ok(())
}
