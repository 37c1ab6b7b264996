// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Seams to the external identity provider.
//!
//! The provider owns accounts, verification codes and token issuance. This
//! crate only calls it: [`IdentityProvider`] covers sign-up, and
//! [`SessionProvider`] hands out the current identity and a fresh bearer
//! token per request.

use crate::api::{self, ApiRequest, Body, HttpTransport, Method};
use crate::error::{ClientError, ClientResult};
use crate::models::Identity;
use crate::services::UserService;
use crate::services::users::MirrorUser;
use crate::username::{AvailabilityChecker, MIN_USERNAME_LEN, TAKEN, TOO_SHORT, UsernameField};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard};

pub trait SessionProvider: Send + Sync {
    fn identity(&self) -> Option<Identity>;

    /// A bearer token valid right now. Never cached by callers.
    fn token(&self) -> ClientResult<String>;

    /// Re-reads the identity from the provider after a profile change.
    fn reload_identity(&self) -> ClientResult<Option<Identity>>;

    fn user_id(&self) -> ClientResult<String> {
        self.identity()
            .map(|i| i.id)
            .ok_or_else(|| ClientError::Auth("Please sign in first".into()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email_address: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PendingSignUp {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Set when the provider finished sign-up without a verification step.
    #[serde(default)]
    pub created_session_id: Option<String>,
}

impl PendingSignUp {
    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedSignUp {
    pub session_id: String,
    pub user: Identity,
}

pub trait IdentityProvider {
    /// Creates the account and triggers an email verification code.
    fn sign_up(&self, req: &SignUpRequest) -> ClientResult<PendingSignUp>;

    fn verify_code(&self, pending_id: &str, code: &str) -> ClientResult<VerifiedSignUp>;
}

/// Token and identity supplied up front, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    identity: Option<Identity>,
    token: Option<String>,
}

impl StaticSession {
    pub fn new(identity: Option<Identity>, token: Option<String>) -> Self {
        StaticSession { identity, token }
    }

    pub fn anonymous() -> Self {
        StaticSession::default()
    }
}

impl SessionProvider for StaticSession {
    fn identity(&self) -> Option<Identity> {
        self.identity.clone()
    }

    fn token(&self) -> ClientResult<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Auth("Please sign in first".into()))
    }

    fn reload_identity(&self) -> ClientResult<Option<Identity>> {
        Ok(self.identity.clone())
    }
}

/// Identity provider reached over its frontend HTTP API.
pub struct HttpIdentityProvider {
    transport: Arc<dyn HttpTransport>,
}

impl HttpIdentityProvider {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        HttpIdentityProvider { transport }
    }

    /// A session bound to `session_id`, sharing this provider's transport.
    pub fn session(&self, session_id: &str) -> HttpSession {
        HttpSession {
            transport: self.transport.clone(),
            session_id: session_id.to_string(),
            identity: Mutex::new(None),
        }
    }

    fn call<T: serde::de::DeserializeOwned>(&self, req: ApiRequest) -> ClientResult<T> {
        api::parse_response(self.transport.execute(&req)?)
    }
}

impl IdentityProvider for HttpIdentityProvider {
    fn sign_up(&self, req: &SignUpRequest) -> ClientResult<PendingSignUp> {
        let mut r = ApiRequest::new(Method::Post, "/client/sign_ups");
        r.body = Body::Json(serde_json::to_value(req)?);
        self.call(r)
    }

    fn verify_code(&self, pending_id: &str, code: &str) -> ClientResult<VerifiedSignUp> {
        let mut r = ApiRequest::new(
            Method::Post,
            format!("/client/sign_ups/{}/attempt_verification", pending_id),
        );
        r.body = Body::Json(json!({ "strategy": "email_code", "code": code.trim() }));
        self.call(r)
    }
}

pub struct HttpSession {
    transport: Arc<dyn HttpTransport>,
    session_id: String,
    /// Last identity read from `/me`; refreshed by `reload_identity`.
    identity: Mutex<Option<Identity>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    jwt: String,
}

impl HttpSession {
    /// Loads the identity once so `identity()` can answer without a request.
    pub fn load(self) -> ClientResult<Self> {
        self.reload_identity()?;
        Ok(self)
    }

    fn cached(&self) -> MutexGuard<'_, Option<Identity>> {
        self.identity.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionProvider for HttpSession {
    fn identity(&self) -> Option<Identity> {
        self.cached().clone()
    }

    fn token(&self) -> ClientResult<String> {
        let req = ApiRequest::new(
            Method::Post,
            format!("/client/sessions/{}/tokens", self.session_id),
        );
        let resp: TokenResponse = api::parse_response(self.transport.execute(&req)?)
            .map_err(|e| match e {
                ClientError::Status { status: 401 | 404, .. } => {
                    ClientError::Auth("Session expired. Please sign in again.".into())
                }
                other => other,
            })?;
        Ok(resp.jwt)
    }

    fn reload_identity(&self) -> ClientResult<Option<Identity>> {
        let mut req = ApiRequest::new(Method::Get, "/me");
        req.bearer = Some(self.token()?);
        let identity: Identity = api::parse_response(self.transport.execute(&req)?)?;
        *self.cached() = Some(identity.clone());
        Ok(Some(identity))
    }
}

/// What the sign-up form collects.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub username: String,
}

impl SignUpForm {
    /// Local checks only; never touches the network.
    pub fn validate(&self) -> ClientResult<SignUpRequest> {
        let email = self.email.trim();
        let username = self.username.trim();
        if email.is_empty() || self.password.is_empty() || username.is_empty() {
            return Err(ClientError::validation("Please fill in all fields"));
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(ClientError::validation(TOO_SHORT));
        }
        Ok(SignUpRequest {
            email_address: email.to_string(),
            password: self.password.clone(),
            username: username.to_string(),
        })
    }
}

/// Validates the form, confirms the username is free, then creates the
/// account with the provider.
pub fn start_sign_up(
    form: &SignUpForm,
    checker: &dyn AvailabilityChecker,
    provider: &dyn IdentityProvider,
) -> ClientResult<PendingSignUp> {
    let req = form.validate()?;
    let mut field = UsernameField::default();
    field.on_input(&req.username, std::time::Instant::now());
    if !field.check_now(checker) {
        let msg = field.error().unwrap_or_else(|| TAKEN.to_string());
        return Err(ClientError::validation(msg));
    }
    let pending = provider.sign_up(&req)?;
    tracing::info!(pending = %pending.id, status = ?pending.status, "sign-up started");
    Ok(pending)
}

/// Verifies the emailed code.
pub fn verify_sign_up(
    provider: &dyn IdentityProvider,
    pending: &PendingSignUp,
    code: &str,
) -> ClientResult<VerifiedSignUp> {
    if code.trim().is_empty() {
        return Err(ClientError::validation("Please enter the verification code"));
    }
    provider.verify_code(&pending.id, code).map_err(|e| match e {
        ClientError::Status { status: 400 | 422, .. } => ClientError::validation(
            "Invalid verification code. Please check and try again.",
        ),
        other => other,
    })
}

/// Creates the backend row for a freshly verified user. Failures are logged
/// and swallowed; the account itself already exists.
pub fn mirror_new_user(users: &UserService, user_id: &str, form: &SignUpForm) -> bool {
    let row = MirrorUser {
        id: user_id.to_string(),
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        phone_number: String::new(),
        first_name: String::new(),
        last_name: String::new(),
    };
    match users.mirror(&row) {
        Ok(_) => {
            tracing::info!(user = user_id, "user mirrored into backend");
            true
        }
        Err(e) => {
            tracing::error!(user = user_id, error = %e, "failed to create user in backend");
            false
        }
    }
}
