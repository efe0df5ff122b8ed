// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login screen: email/password sign-in or sign-up.

use crate::controllers::{ActionStatus, ScreenScope, ScreenState};
use crate::error::{AppError, Notice};
use crate::models::Session;
use crate::services::IdentityProvider;
use std::sync::Arc;
use validator::Validate;

const ERROR_TITLE: &str = "Error";

/// Whether submitting creates an account or signs in to one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// Credentials as typed.
#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter your password."))]
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub form: LoginForm,
    pub mode: AuthMode,
    pub submit: ActionStatus,
    pub notice: Option<Notice>,
}

pub struct LoginController<I: IdentityProvider> {
    identity: Arc<I>,
    scope: ScreenScope,
    state: ScreenState<LoginState>,
}

impl<I: IdentityProvider> LoginController<I> {
    pub fn new(identity: Arc<I>, scope: ScreenScope) -> Self {
        Self {
            identity,
            scope,
            state: ScreenState::default(),
        }
    }

    pub fn state(&self) -> LoginState {
        self.state.snapshot()
    }

    pub fn set_email(&self, email: &str) {
        self.state.lock().form.email = email.trim().to_string();
    }

    pub fn set_password(&self, password: &str) {
        self.state.lock().form.password = password.to_string();
    }

    /// Switch between sign-in and sign-up.
    pub fn toggle_mode(&self) -> AuthMode {
        let mut state = self.state.lock();
        state.mode = match state.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        state.mode
    }

    /// Label for the submit button.
    pub fn submit_label(&self) -> &'static str {
        match self.state.lock().mode {
            AuthMode::SignIn => "Log In",
            AuthMode::SignUp => "Sign Up",
        }
    }

    /// Clear and return the pending notice.
    pub fn take_notice(&self) -> Option<Notice> {
        self.state.lock().notice.take()
    }

    /// Validate the form and authenticate.
    ///
    /// Returns the session on success. Returns `None` on failure (a notice is
    /// left) or if the screen closed first.
    pub async fn submit(&self) -> Option<Session> {
        let (form, mode) = {
            let mut state = self.state.lock();
            state.submit = ActionStatus::Loading;
            (state.form.clone(), state.mode)
        };

        let Some(result) = self
            .scope
            .run(async {
                form.validate().map_err(AppError::from)?;
                match mode {
                    AuthMode::SignIn => self.identity.sign_in(&form.email, &form.password).await,
                    AuthMode::SignUp => self.identity.sign_up(&form.email, &form.password).await,
                }
            })
            .await
        else {
            self.state.abandon(|s| &mut s.submit);
            return None;
        };

        let mut state = self.state.lock();
        match result {
            Ok(session) => {
                state.submit = ActionStatus::Ready;
                Some(session)
            }
            Err(e) => {
                let notice = e.notice(ERROR_TITLE);
                state.submit = ActionStatus::Failed(notice.clone());
                state.notice = Some(notice);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_validation_messages() {
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "hunter22".to_string(),
        };
        let err = AppError::from(form.validate().unwrap_err());
        assert_eq!(
            err.notice(ERROR_TITLE),
            Notice::new("Error", "Please enter a valid email address.")
        );

        let form = LoginForm {
            email: "sam@example.com".to_string(),
            password: String::new(),
        };
        let err = AppError::from(form.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation(msg) if msg == "Please enter your password."));

        let form = LoginForm {
            email: "sam@example.com".to_string(),
            password: "x".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
