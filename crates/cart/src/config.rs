//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CART_STORAGE_DIR` - Directory for file-backed storage (default: `.loomwise`)
//! - `CART_STORAGE_KEY` - Key the snapshot is stored under (default: `shopping-cart`)
//! - `CART_HYDRATION` - `lenient` or `strict` handling of a malformed snapshot
//!   (default: `lenient`)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Default key the cart snapshot is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "shopping-cart";

/// Default directory for file-backed storage.
pub const DEFAULT_STORAGE_DIR: &str = ".loomwise";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What to do when the persisted snapshot cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HydrationPolicy {
    /// Log a warning, delete the stored value, and start with an empty cart.
    #[default]
    Lenient,
    /// Fail hydration with [`crate::CartError::MalformedSnapshot`].
    Strict,
}

impl FromStr for HydrationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("expected `lenient` or `strict`, got `{other}`")),
        }
    }
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory used by [`crate::FileStorage`]
    pub storage_dir: PathBuf,
    /// Key the snapshot is stored under
    pub storage_key: String,
    /// Handling of a malformed snapshot during hydration
    pub hydration: HydrationPolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            hydration: HydrationPolicy::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_dir = PathBuf::from(get_env_or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let storage_key = validate_storage_key(
            "CART_STORAGE_KEY",
            get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
        )?;
        let hydration = get_env_or_default("CART_HYDRATION", "lenient")
            .parse::<HydrationPolicy>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_HYDRATION".to_string(), e))?;

        Ok(Self {
            storage_dir,
            storage_key,
            hydration,
        })
    }

    /// Use a different storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Use a different hydration policy.
    #[must_use]
    pub const fn with_hydration(mut self, hydration: HydrationPolicy) -> Self {
        self.hydration = hydration;
        self
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn validate_storage_key(var_name: &str, key: String) -> Result<String, ConfigError> {
    match storage_key_error(&key) {
        Some(reason) => Err(ConfigError::InvalidEnvVar(var_name.to_string(), reason)),
        None => Ok(key),
    }
}

/// Storage keys double as file names, so keep them to a safe character set.
///
/// Returns why `key` is unusable, or `None` if it is fine.
pub(crate) fn storage_key_error(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("storage key cannot be empty".to_string());
    }

    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Some(format!("storage key contains invalid character {c:?}"));
    }

    if key.starts_with('.') {
        return Some("storage key cannot start with '.'".to_string());
    }

    None
}
