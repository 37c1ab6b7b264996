// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Finclip", "finclip"));

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSettings {
    /// Identity provider session to mint tokens from.
    pub id: Option<String>,
    /// Fixed bearer token, used when no provider session is configured.
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub auth_url: Option<String>,
    pub request_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub username_debounce_ms: u64,
    pub currency: String,
    pub log_dir: Option<String>,
    #[serde(default)]
    pub session: SessionSettings,
}

impl Settings {
    /// Defaults, then `config.toml` from the platform config dir (or `path`),
    /// then `FINCLIP_*` environment variables (`FINCLIP_SESSION__TOKEN` for nested keys).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => config_path().ok(),
        };
        let mut builder = Config::builder()
            .set_default("api_url", "http://localhost:5001/api")?
            .set_default("request_timeout_secs", 15)?
            .set_default("upload_timeout_secs", 60)?
            .set_default("username_debounce_ms", 500)?
            .set_default("currency", crate::models::DEFAULT_CURRENCY)?;
        if let Some(f) = &file {
            builder = builder.add_source(File::from(f.as_path()).required(path.is_some()));
        }
        let cfg = builder
            .add_source(
                Environment::with_prefix("FINCLIP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read configuration")?;
        let settings: Settings = cfg
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn username_debounce(&self) -> Duration {
        Duration::from_millis(self.username_debounce_ms)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.toml"))
}
