//! Application configuration loaded from environment variables.
//!
//! API keys are read once at startup and handed to the service clients.
//! Base URLs can be overridden to point the clients at emulators.

use std::env;

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_SECURE_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com/v1";
pub const DEFAULT_STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";
pub const DEFAULT_USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEFAULT_VISION_BASE_URL: &str = "https://vision.googleapis.com/v1";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Firebase project ---
    /// Web API key for the Firebase project
    pub firebase_api_key: String,
    /// GCP/Firebase project ID (Firestore database owner)
    pub firebase_project_id: String,
    /// Storage bucket for profile pictures and report images
    pub storage_bucket: String,

    // --- Third-party API keys ---
    /// USDA FoodData Central key
    pub usda_api_key: String,
    /// Google Cloud Vision key
    pub vision_api_key: String,

    // --- Endpoints ---
    pub identity_base_url: String,
    pub secure_token_base_url: String,
    pub storage_base_url: String,
    pub usda_base_url: String,
    pub vision_base_url: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            firebase_api_key: "test_api_key".to_string(),
            firebase_project_id: "test-project".to_string(),
            storage_bucket: "test-project.appspot.com".to_string(),
            usda_api_key: "test_usda_key".to_string(),
            vision_api_key: "test_vision_key".to_string(),
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            secure_token_base_url: DEFAULT_SECURE_TOKEN_BASE_URL.to_string(),
            storage_base_url: DEFAULT_STORAGE_BASE_URL.to_string(),
            usda_base_url: DEFAULT_USDA_BASE_URL.to_string(),
            vision_base_url: DEFAULT_VISION_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let firebase_project_id = required("FIREBASE_PROJECT_ID")?;
        let storage_bucket = env::var("FIREBASE_STORAGE_BUCKET")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| format!("{}.appspot.com", firebase_project_id));

        Ok(Self {
            firebase_api_key: required("FIREBASE_API_KEY")?,
            firebase_project_id,
            storage_bucket,
            usda_api_key: required("USDA_API_KEY")?,
            vision_api_key: required("GOOGLE_VISION_API_KEY")?,
            identity_base_url: base_url("IDENTITY_BASE_URL", DEFAULT_IDENTITY_BASE_URL),
            secure_token_base_url: base_url("SECURE_TOKEN_BASE_URL", DEFAULT_SECURE_TOKEN_BASE_URL),
            storage_base_url: base_url("STORAGE_BASE_URL", DEFAULT_STORAGE_BASE_URL),
            usda_base_url: base_url("USDA_BASE_URL", DEFAULT_USDA_BASE_URL),
            vision_base_url: base_url("VISION_BASE_URL", DEFAULT_VISION_BASE_URL),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

/// Read an optional base URL override, without a trailing slash.
fn base_url(name: &str, default: &str) -> String {
    env::var(name)
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|_| default.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
