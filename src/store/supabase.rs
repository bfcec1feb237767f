//! Supabase REST storage for panel rows
//!
//! Talks to the PostgREST data API:
//! - GET  {base}/rest/v1/{table}?select=panel_serial
//! - POST {base}/rest/v1/{table}

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::store::PanelStore;

#[derive(Debug, Deserialize)]
struct PanelSerialRow {
    panel_serial: Option<String>,
}

/// Rows with a null or empty serial carry no dedup information
fn collect_serials(rows: Vec<PanelSerialRow>) -> HashSet<String> {
    rows.into_iter()
        .filter_map(|row| row.panel_serial)
        .filter(|serial| !serial.is_empty())
        .collect()
}

pub struct SupabaseStore {
    http_client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseStore {
    pub fn new(config: &Config) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: config.supabase_panel_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_api_key.clone(),
            table: config.panels_table.clone(),
        }
    }

    async fn fetch_existing_serials(&self) -> Result<HashSet<String>, AppError> {
        let url = format!(
            "{}/rest/v1/{}?select=panel_serial",
            self.base_url, self.table
        );

        let resp = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                AppError::StoreReadError(format!("Existing panels request failed: {}", e))
            })?;

        if !resp.status().is_success() {
            return Err(AppError::StoreReadError(format!(
                "Existing panels request returned {}",
                resp.status()
            )));
        }

        let rows: Vec<PanelSerialRow> = resp.json().await.map_err(|e| {
            AppError::StoreReadError(format!("Existing panels parse failed: {}", e))
        })?;

        Ok(collect_serials(rows))
    }

    async fn try_insert(&self, serial: &str, created_at: &str) -> Result<(), AppError> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);

        let body = serde_json::json!({
            "panel_serial": serial,
            "created_at": created_at,
        });

        let resp = self
            .http_client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::StoreWriteError(format!("Insert request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::StoreWriteError(format!(
                "Insert returned {} {}",
                status, text
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl PanelStore for SupabaseStore {
    async fn existing_serials(&self) -> HashSet<String> {
        match self.fetch_existing_serials().await {
            Ok(serials) => serials,
            Err(e) => {
                // Proceed with an empty set: the run then attempts every
                // serial and leans on the store's uniqueness handling.
                tracing::warn!("[Supabase] Error fetching existing panels: {}", e);
                HashSet::new()
            }
        }
    }

    async fn insert_panel(&self, serial: &str, created_at: &str) -> bool {
        match self.try_insert(serial, created_at).await {
            Ok(()) => {
                tracing::info!("[Supabase] Successfully inserted panel {}", serial);
                true
            }
            Err(e) => {
                tracing::warn!("[Supabase] Error inserting panel {}: {}", serial, e);
                false
            }
        }
    }
}
