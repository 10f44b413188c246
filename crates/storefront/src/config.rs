//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SALEOR_API_URL` - GraphQL endpoint URL (e.g., http://localhost:8000/graphql/)
//!
//! ## Optional
//! - `SALEOR_CHANNEL` - Sales channel slug (default: default-channel)
//! - `SALEOR_APP_TOKEN` - App token sent as a bearer credential on API calls
//! - `STOREFRONT_CART_PATH` - Path of the persisted cart file (default: cart.json)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
///
/// Implements `Debug` manually to redact the app token.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// GraphQL endpoint of the commerce backend
    pub api_url: Url,
    /// Sales channel slug scoping product listings and checkouts
    pub channel: String,
    /// Optional app token for authenticated API access
    pub app_token: Option<SecretString>,
    /// Where the cart record is persisted between runs
    pub cart_path: PathBuf,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_url", &self.api_url.as_str())
            .field("channel", &self.channel)
            .field(
                "app_token",
                &self.app_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cart_path", &self.cart_path)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url("SALEOR_API_URL", &get_required_env("SALEOR_API_URL")?)?;
        let channel = get_env_or_default("SALEOR_CHANNEL", "default-channel");
        let app_token = get_optional_env("SALEOR_APP_TOKEN").map(SecretString::from);
        let cart_path = PathBuf::from(get_env_or_default("STOREFRONT_CART_PATH", "cart.json"));

        Ok(Self {
            api_url,
            channel,
            app_token,
            cart_path,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an endpoint URL, rejecting non-HTTP schemes.
fn parse_api_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
