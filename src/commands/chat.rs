// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Ctx, prompt};
use crate::chat::ChatSession;
use crate::render;
use crate::services::ChatService;
use anyhow::Result;
use std::io::IsTerminal;

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    let mut session = ChatSession::new(ChatService::new(ctx.api.clone()), &ctx.user_id()?);
    let styled = std::io::stdout().is_terminal();

    if let Some(msg) = m.get_one::<String>("message") {
        if let Some(reply) = session.ask(msg) {
            println!("{}", render::ai_message(&reply.content, styled));
        }
        return Ok(());
    }

    println!("Ask about your spending, income or budget. Empty line or 'exit' to quit.");
    loop {
        let q = prompt("you> ")?;
        if q.is_empty() || q.eq_ignore_ascii_case("exit") {
            break;
        }
        if let Some(reply) = session.ask(&q) {
            println!("{}\n", render::ai_message(&reply.content, styled));
        }
    }
    Ok(())
}
