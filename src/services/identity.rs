// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password identity over the Firebase Auth REST API.
//!
//! Handles:
//! - Account creation and sign-in
//! - ID token refresh through the secure-token endpoint
//! - The current session, cleared on sign-out
//!
//! Provider error codes are turned into readable messages here; callers only
//! ever see [`AppError::Auth`] carrying that message.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Session;
use serde::Deserialize;
use std::future::Future;
use std::sync::{Arc, RwLock};

/// Authentication seam used by the login screen and the shell.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Create an account and sign it in.
    fn sign_up(&self, email: &str, password: &str) -> impl Future<Output = Result<Session>> + Send;

    /// Sign in with existing credentials.
    fn sign_in(&self, email: &str, password: &str) -> impl Future<Output = Result<Session>> + Send;

    /// The signed-in session, if any.
    fn current_session(&self) -> Option<Session>;

    /// Exchange the session's refresh token for a fresh ID token.
    fn refresh(&self, session: &Session) -> impl Future<Output = Result<Session>> + Send;

    /// Forget the current session.
    fn sign_out(&self);
}

/// Response of `accounts:signUp` and `accounts:signInWithPassword`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordAuthResponse {
    id_token: String,
    refresh_token: String,
}

/// Response of the secure-token refresh endpoint (snake_case, unlike the rest).
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Firebase Auth REST client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    secure_token_base_url: String,
    current: Arc<RwLock<Option<Session>>>,
}

impl IdentityClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.firebase_api_key.clone(),
            base_url: config.identity_base_url.clone(),
            secure_token_base_url: config.secure_token_base_url.clone(),
            current: Arc::new(RwLock::new(None)),
        }
    }

    async fn password_auth(&self, endpoint: &str, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/accounts:{}", self.base_url, endpoint);

        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Could not reach the sign-in service: {}", e)))?;

        let tokens: PasswordAuthResponse = check_response_json(response).await?;
        let session = Session::from_tokens(&tokens.id_token, &tokens.refresh_token)?;
        self.set_current(Some(session.clone()));
        Ok(session)
    }

    fn set_current(&self, session: Option<Session>) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = session;
    }
}

impl IdentityProvider for IdentityClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.password_auth("signUp", email, password).await?;
        tracing::info!(uid = %session.uid, "Account created");
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let session = self
            .password_auth("signInWithPassword", email, password)
            .await?;
        tracing::info!(uid = %session.uid, "Signed in");
        Ok(session)
    }

    fn current_session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn refresh(&self, session: &Session) -> Result<Session> {
        let url = format!("{}/token", self.secure_token_base_url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token refresh request failed: {}", e)))?;

        let tokens: RefreshResponse = check_response_json(response).await?;
        let refreshed = Session::from_tokens(&tokens.id_token, &tokens.refresh_token)?;
        self.set_current(Some(refreshed.clone()));

        tracing::debug!(uid = %refreshed.uid, "ID token refreshed");
        Ok(refreshed)
    }

    fn sign_out(&self) {
        self.set_current(None);
        tracing::info!("Signed out");
    }
}

/// Check response status and parse the JSON body, mapping provider errors.
async fn check_response_json<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Auth(error_from_body(status.as_u16(), &body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Auth(format!("Unexpected sign-in response: {}", e)))
}

/// Readable message for a failed auth call's body.
pub fn error_from_body(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => auth_error_message(&envelope.error.message),
        Err(_) => format!("Sign-in failed (HTTP {})", status),
    }
}

/// Map a provider error code to a readable message.
///
/// Codes may carry a detail suffix (`"WEAK_PASSWORD : Password should be ..."`);
/// only the code before it is matched.
pub fn auth_error_message(code: &str) -> String {
    let (code, detail) = match code.split_once(" : ") {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (code.trim(), None),
    };

    let message = match code {
        "EMAIL_EXISTS" => "The email address is already in use by another account.",
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Incorrect email or password."
        }
        "INVALID_EMAIL" => "The email address is badly formatted.",
        "MISSING_PASSWORD" => "A password is required.",
        "WEAK_PASSWORD" => "Password should be at least 6 characters.",
        "USER_DISABLED" => "This account has been disabled.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Try again later.",
        "OPERATION_NOT_ALLOWED" => "Email/password sign-in is not enabled.",
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            "Your session has expired. Please sign in again."
        }
        _ => return detail.unwrap_or(code).to_string(),
    };
    message.to_string()
}
