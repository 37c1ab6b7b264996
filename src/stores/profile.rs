// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The signed-in user's profile.
//!
//! Two sources feed the editor: the identity provider's record and the
//! backend's own row. [`reconcile`] merges them with a fixed precedence and
//! [`diff`] reduces an edit to the fields that actually changed.

use super::Recorded;
use crate::auth::SessionProvider;
use crate::error::{ClientError, ClientResult};
use crate::models::{Identity, MutableProfile, ProfileUpdate, ProfileView};
use crate::services::ProfileService;
use crate::username::{AvailabilityChecker, TAKEN, UsernameField};
use std::sync::Arc;

pub const NO_CHANGES: &str = "No changes were made to your profile.";

fn pick(backend: Option<&String>, identity: Option<&String>) -> String {
    [backend, identity]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Merges the backend row over the identity: a non-empty backend value wins,
/// then a non-empty identity value, else empty. Email is the exception: it
/// belongs to the identity and the backend copy only fills a gap.
pub fn reconcile(identity: &Identity, backend: Option<&MutableProfile>) -> ProfileView {
    let b = backend.cloned().unwrap_or_default();
    let email = Some(&identity.email).filter(|e| !e.trim().is_empty());
    ProfileView {
        first_name: pick(b.first_name.as_ref(), identity.first_name.as_ref()),
        last_name: pick(b.last_name.as_ref(), identity.last_name.as_ref()),
        username: pick(b.username.as_ref(), identity.username.as_ref()),
        email: pick(email, b.email.as_ref()),
        phone_number: pick(b.phone_number.as_ref(), identity.phone_number.as_ref()),
        profile_image: Some(pick(b.profile_image.as_ref(), identity.image_url.as_ref()))
            .filter(|s| !s.is_empty()),
    }
}

fn changed(current: &str, edited: &str) -> Option<String> {
    let e = edited.trim();
    (!e.is_empty() && e != current.trim()).then(|| e.to_string())
}

/// Only fields that differ and are non-empty after trimming.
pub fn diff(current: &ProfileView, edited: &ProfileView) -> ProfileUpdate {
    ProfileUpdate {
        first_name: changed(&current.first_name, &edited.first_name),
        last_name: changed(&current.last_name, &edited.last_name),
        username: changed(&current.username, &edited.username),
        phone_number: changed(&current.phone_number, &edited.phone_number),
        profile_image: changed(
            current.profile_image.as_deref().unwrap_or_default(),
            edited.profile_image.as_deref().unwrap_or_default(),
        ),
    }
}

fn check_name(value: Option<&str>, label: &str) -> ClientResult<()> {
    match value {
        Some(v) if v.chars().count() < 2 => Err(ClientError::validation(format!(
            "{} must be at least 2 characters long.",
            label
        ))),
        _ => Ok(()),
    }
}

type Listener = Box<dyn FnMut(&ProfileView)>;

pub struct ProfileStore {
    service: ProfileService,
    session: Arc<dyn SessionProvider>,
    identity: Option<Identity>,
    view: ProfileView,
    error: Option<String>,
    listener: Option<Listener>,
}

impl ProfileStore {
    pub fn new(service: ProfileService, session: Arc<dyn SessionProvider>) -> Self {
        ProfileStore {
            service,
            session,
            identity: None,
            view: ProfileView::default(),
            error: None,
            listener: None,
        }
    }

    /// Called whenever local profile state changes outside of `load`.
    pub fn on_change(&mut self, f: impl FnMut(&ProfileView) + 'static) {
        self.listener = Some(Box::new(f));
    }

    pub fn view(&self) -> &ProfileView {
        &self.view
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Loads the merged view. A backend failure leaves an identity-only view
    /// and is recorded in `error()` rather than returned.
    pub fn load(&mut self) -> ClientResult<&ProfileView> {
        let identity = self
            .session
            .identity()
            .ok_or_else(|| ClientError::Auth("Please sign in first".into()));
        let identity = self.record(identity)?;
        self.load_with(identity)
    }

    /// Same as `load`, but overlays the backend row on `identity` instead of
    /// the session's cached one.
    fn load_with(&mut self, identity: Identity) -> ClientResult<&ProfileView> {
        self.error = None;
        let backend = match self.service.fetch() {
            Ok(row) => row,
            Err(e) => {
                self.fail(e);
                None
            }
        };
        self.view = reconcile(&identity, backend.as_ref());
        self.identity = Some(identity);
        Ok(&self.view)
    }

    /// Validates and sends only what changed, then reloads identity and profile.
    pub fn save(
        &mut self,
        edited: &ProfileView,
        checker: &dyn AvailabilityChecker,
    ) -> ClientResult<ProfileUpdate> {
        let update = self.validate_edit(edited, checker);
        let update = self.record(update)?;
        let r = self.service.update(&update);
        self.record(r)?;
        tracing::info!("profile updated");

        match self.session.reload_identity() {
            Ok(Some(identity)) => {
                self.load_with(identity)?;
            }
            Ok(None) => {
                self.load()?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not reload identity after save");
                self.load()?;
            }
        }
        Ok(update)
    }

    fn validate_edit(
        &self,
        edited: &ProfileView,
        checker: &dyn AvailabilityChecker,
    ) -> ClientResult<ProfileUpdate> {
        let update = diff(&self.view, edited);
        if update.is_empty() {
            return Err(ClientError::validation(NO_CHANGES));
        }
        check_name(update.first_name.as_deref(), "First name")?;
        check_name(update.last_name.as_deref(), "Last name")?;
        if let Some(username) = &update.username {
            let current = Some(self.view.username.as_str());
            let mut field = UsernameField::default().with_current_username(current);
            field.on_input(username, std::time::Instant::now());
            if !field.check_now(checker) {
                let msg = field.error().unwrap_or_else(|| TAKEN.to_string());
                return Err(ClientError::validation(msg));
            }
        }
        Ok(update)
    }

    /// Uploads an avatar. The URL is applied locally right away and becomes
    /// authoritative on the next `load`.
    pub fn upload_image(&mut self, file_name: &str, mime: &str, bytes: Vec<u8>) -> ClientResult<String> {
        let r = self.service.upload_image(file_name, mime, bytes);
        let url = self.record(r)?;
        self.view.profile_image = Some(url.clone());
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.view);
        }
        Ok(url)
    }
}

impl Recorded for ProfileStore {
    fn error_slot(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: "user_1".into(),
            email: "asha@example.com".into(),
            first_name: Some("Asha".into()),
            last_name: Some("Rao".into()),
            username: Some("asha".into()),
            phone_number: None,
            image_url: Some("https://img/identity.png".into()),
        }
    }

    #[test]
    fn backend_values_win_when_present() {
        let backend = MutableProfile {
            first_name: Some("Asha K".into()),
            last_name: Some("   ".into()),
            phone_number: Some("+91 98765 43210".into()),
            ..Default::default()
        };
        let view = reconcile(&identity(), Some(&backend));
        assert_eq!(view.first_name, "Asha K");
        assert_eq!(view.last_name, "Rao");
        assert_eq!(view.username, "asha");
        assert_eq!(view.email, "asha@example.com");
        assert_eq!(view.phone_number, "+91 98765 43210");
        assert_eq!(view.profile_image.as_deref(), Some("https://img/identity.png"));
    }

    #[test]
    fn email_comes_from_the_identity() {
        let backend = MutableProfile {
            email: Some("stale@backend.com".into()),
            ..Default::default()
        };
        let view = reconcile(&identity(), Some(&backend));
        assert_eq!(view.email, "asha@example.com");

        let mut id = identity();
        id.email = String::new();
        assert_eq!(reconcile(&id, Some(&backend)).email, "stale@backend.com");
    }

    #[test]
    fn missing_backend_row_falls_back_to_identity() {
        let mut id = identity();
        id.image_url = None;
        let view = reconcile(&id, None);
        assert_eq!(view.first_name, "Asha");
        assert_eq!(view.phone_number, "");
        assert_eq!(view.profile_image, None);
    }

    #[test]
    fn diff_skips_unchanged_and_blank_fields() {
        let current = ProfileView {
            first_name: "A".into(),
            ..Default::default()
        };
        let edited = ProfileView {
            first_name: "A".into(),
            last_name: "B".into(),
            phone_number: "   ".into(),
            ..Default::default()
        };
        let update = diff(&current, &edited);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "lastName": "B" })
        );
    }

    #[test]
    fn short_names_are_rejected() {
        let err = check_name(Some("J"), "First name").unwrap_err();
        assert_eq!(
            err.user_message(),
            "First name must be at least 2 characters long."
        );
        assert!(check_name(None, "Last name").is_ok());
    }
}
