//! Configuration module

use serde::Deserialize;
use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub supabase_panel_url: String,
    pub supabase_api_key: String,
    #[serde(default = "default_panels_table")]
    pub panels_table: String,
    #[serde(default)]
    pub basis_api_token: Option<String>,
}

fn default_panels_table() -> String {
    "panels".to_string()
}

impl Config {
    /// Load configuration from the environment and validate it.
    ///
    /// Required: SUPABASE_PANEL_URL, SUPABASE_API_KEY.
    /// Optional: PANELS_TABLE (default "panels"), BASIS_API_TOKEN.
    pub fn load() -> Result<Self, AppError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        let config: Config = settings.try_deserialize().map_err(|_| {
            AppError::ConfigError(
                "Missing required environment variables SUPABASE_PANEL_URL or SUPABASE_API_KEY"
                    .to_string(),
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.supabase_panel_url.is_empty() || self.supabase_api_key.is_empty() {
            return Err(AppError::ConfigError(
                "Missing required environment variables SUPABASE_PANEL_URL or SUPABASE_API_KEY"
                    .to_string(),
            ));
        }

        Url::parse(&self.supabase_panel_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid SUPABASE_PANEL_URL: {}", e)))?;

        if self.panels_table.is_empty() {
            return Err(AppError::ConfigError(
                "PANELS_TABLE must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
