//! Basis inventory API client

use reqwest::Client;
use serde::Deserialize;

use crate::error::AppError;

/// Production inventory API base URL
const BASIS_API_BASE: &str = "https://apps.data.wearebasis.io/api/v1";

/// Device type id for panels in the Basis inventory
pub const PANEL_TYPE_ID: u32 = 0;

/// One device row from the inventory API. The upstream payload is not
/// guaranteed to carry both fields on every row.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

pub struct BasisClient {
    http_client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl BasisClient {
    pub fn new(api_token: Option<String>) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: BASIS_API_BASE.to_string(),
            api_token,
        }
    }

    /// List devices of the given type from the production inventory
    pub async fn get_devices(&self, type_id: u32) -> Result<Vec<DeviceRecord>, AppError> {
        let url = format!("{}/devices?type={}", self.base_url, type_id);

        let mut request = self.http_client.get(&url);
        if let Some(ref token) = self.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("Devices request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(AppError::SourceUnavailable(format!(
                "Devices request returned {}",
                resp.status()
            )));
        }

        resp.json::<Vec<DeviceRecord>>()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("Devices parse failed: {}", e)))
    }
}
