// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated session, passed explicitly to every controller.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Claims we read from the identity provider's ID token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IdTokenClaims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in user.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from the tokens returned by sign-in or refresh.
    ///
    /// The ID token's signature is checked by the backends that consume it, not
    /// here; the claims are only read for uid, email and expiry.
    pub fn from_tokens(id_token: &str, refresh_token: &str) -> Result<Self, AppError> {
        let claims = read_claims(id_token)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::Auth("ID token has an invalid expiry".to_string()))?;

        Ok(Self {
            uid: claims.sub,
            email: claims.email,
            id_token: id_token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at,
        })
    }

    /// Whether the ID token expires within `margin` of `now`.
    pub fn is_expiring(&self, now: DateTime<Utc>, margin: chrono::Duration) -> bool {
        now + margin >= self.expires_at
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

fn read_claims(id_token: &str) -> Result<IdTokenClaims, AppError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    decode::<IdTokenClaims>(id_token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Auth(format!("Malformed ID token: {}", e)))
}
