//! User profile model for storage and display.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore at `users/{uid}`.
///
/// The uid is the document key and is not repeated in the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name chosen by the user
    #[serde(default)]
    pub username: String,
    /// Download URL of the profile picture ("" when none)
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
}

impl UserProfile {
    /// Profile picture URL, if one was uploaded.
    pub fn photo(&self) -> Option<&str> {
        Some(self.photo_url.as_str()).filter(|url| !url.is_empty())
    }
}
