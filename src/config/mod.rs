//! Environment-driven configuration for the composition root.

use std::env;
use std::path::PathBuf;

/// Default configuration document path when `TICKPLOT_INDICATORS_FILE` is unset.
pub const DEFAULT_DOCUMENT_PATH: &str = "indicators.json";

/// Get the runtime environment name (`TICKPLOT_ENV`, default `development`)
pub fn get_environment() -> String {
    env::var("TICKPLOT_ENV").unwrap_or_else(|_| "development".to_string())
}

/// Process configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the indicator configuration document on disk
    pub document_path: PathBuf,
    /// Environment name driving log formatting
    pub environment: String,
}

impl Config {
    /// Load configuration from `.env` and process environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let document_path = env::var("TICKPLOT_INDICATORS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DOCUMENT_PATH));
        Self {
            document_path,
            environment: get_environment(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from(DEFAULT_DOCUMENT_PATH),
            environment: "development".to_string(),
        }
    }
}
