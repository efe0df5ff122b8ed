// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing notices.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Application error type that converts to a blocking user notice.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Auth(String),

    #[error("User not logged in")]
    NotSignedIn,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("No text found")]
    NoTextFound,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Convert into the notice shown to the user, under the given alert title.
    ///
    /// Auth and validation messages are already user-facing and pass through
    /// unchanged. Backend failures are logged here since the notice is the end
    /// of the line for them.
    pub fn notice(&self, title: &str) -> Notice {
        match self {
            AppError::Auth(msg) | AppError::Validation(msg) => Notice::new(title, msg),
            AppError::Database(msg) | AppError::Storage(msg) | AppError::Network(msg) => {
                tracing::warn!(error = %msg, title, "Remote call failed");
                Notice::new(title, self.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, title, "Internal error");
                Notice::new(title, self.to_string())
            }
            AppError::NotSignedIn | AppError::NoTextFound => Notice::new(title, self.to_string()),
        }
    }

    /// True for failures of a remote collaborator (as opposed to user input).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::Network(_) | AppError::Database(_) | AppError::Storage(_)
        )
    }
}

/// A blocking alert: title plus human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct Notice {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Notice with a title only.
    pub fn title_only(title: impl Into<String>) -> Self {
        Self::new(title, String::new())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

// Reports the first failing field, in field-name order so messages are stable.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(field, errs)| errs.iter().map(move |e| (field.clone(), e)))
            .map(|(field, e)| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
            .next()
            .unwrap_or_else(|| errors.to_string());
        AppError::Validation(message)
    }
}

/// Result type alias for service calls and controller actions
pub type Result<T> = std::result::Result<T, AppError>;
