// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod chat;
pub mod config;
pub mod exporter;
pub mod finance;
pub mod profile;
pub mod transactions;
pub mod upload;
pub mod users;

use crate::api::{ApiClient, HttpTransport, ReqwestTransport};
use crate::auth::{HttpIdentityProvider, SessionProvider, StaticSession};
use crate::config::Settings;
use crate::models::Identity;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Everything a command handler needs.
pub struct Ctx {
    pub settings: Settings,
    pub transport: Arc<dyn HttpTransport>,
    pub api: ApiClient,
}

impl Ctx {
    pub fn new(
        settings: Settings,
        transport: Arc<dyn HttpTransport>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let api = ApiClient::new(transport.clone(), session);
        Ctx {
            settings,
            transport,
            api,
        }
    }

    /// Wires real HTTP transports and the configured session.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(
            ReqwestTransport::new(&settings.api_url, settings.request_timeout())
                .context("Failed to build HTTP client")?,
        );
        let session = session_from(&settings)?;
        Ok(Ctx::new(settings, transport, session))
    }

    pub fn identity_provider(&self) -> Result<HttpIdentityProvider> {
        let url = self
            .settings
            .auth_url
            .as_deref()
            .context("auth_url is not configured; set FINCLIP_AUTH_URL")?;
        let transport = ReqwestTransport::new(url, self.settings.request_timeout())?;
        Ok(HttpIdentityProvider::new(Arc::new(transport)))
    }

    pub fn user_id(&self) -> Result<String> {
        Ok(self.api.session().user_id()?)
    }

    pub fn currency(&self) -> &str {
        &self.settings.currency
    }
}

fn session_from(settings: &Settings) -> Result<Arc<dyn SessionProvider>> {
    let s = &settings.session;
    if let (Some(id), Some(url)) = (s.id.as_deref(), settings.auth_url.as_deref()) {
        let transport = ReqwestTransport::new(url, settings.request_timeout())?;
        let session = HttpIdentityProvider::new(Arc::new(transport))
            .session(id)
            .load()
            .context("Could not restore the saved session")?;
        return Ok(Arc::new(session));
    }
    let identity = s.user_id.as_ref().map(|id| Identity {
        id: id.clone(),
        email: s.email.clone().unwrap_or_default(),
        ..Default::default()
    });
    Ok(Arc::new(StaticSession::new(identity, s.token.clone())))
}

/// Prints `label` and reads one trimmed line from stdin.
pub(crate) fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
