//! config/campaign_config.rs
//! Configuración de la campaña y carga de los archivos JSON de entrada
//! (configuración + lista de clientes).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::CampaignError;
use crate::models::customer_model::Customer;

fn default_max_call_duration() -> u64 {
    300
}

fn default_concurrent_calls() -> usize {
    1
}

fn default_batch_delay() -> u64 {
    5000
}

/// Se carga una vez por corrida y no cambia después.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignConfig {
    pub campaign_name: String,
    pub max_attempts: u32,
    #[serde(rename = "retryDelay")]
    pub retry_delay_ms: u64,
    #[serde(rename = "maxCallDuration", default = "default_max_call_duration")]
    pub max_call_duration_sec: u64,
    #[serde(default = "default_concurrent_calls")]
    pub concurrent_calls: usize,
    #[serde(rename = "batchDelay", default = "default_batch_delay")]
    pub batch_delay_ms: u64,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        CampaignConfig {
            campaign_name: "campaign".to_string(),
            max_attempts: 3,
            retry_delay_ms: 60_000,
            max_call_duration_sec: default_max_call_duration(),
            concurrent_calls: default_concurrent_calls(),
            batch_delay_ms: default_batch_delay(),
        }
    }
}

impl CampaignConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("maxAttempts debe ser mayor que 0".to_string());
        }
        if self.max_call_duration_sec == 0 {
            return Err("maxCallDuration debe ser mayor que 0".to_string());
        }
        if self.concurrent_calls == 0 {
            return Err("concurrentCalls debe ser al menos 1".to_string());
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn max_call_duration(&self) -> Duration {
        Duration::from_secs(self.max_call_duration_sec)
    }
}

async fn read_file(path: &Path) -> Result<String, CampaignError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CampaignError::config_load(path.display().to_string(), e))
}

pub async fn load_campaign_config(path: &Path) -> Result<CampaignConfig, CampaignError> {
    let raw = read_file(path).await?;
    let config: CampaignConfig = serde_json::from_str(&raw)
        .map_err(|e| CampaignError::config_load(path.display().to_string(), e))?;

    config
        .validate()
        .map_err(|msg| CampaignError::config_load(path.display().to_string(), msg))?;

    log::info!(
        "(load_campaign_config) Configuración '{}' cargada desde {:?}",
        config.campaign_name,
        path
    );
    Ok(config)
}

pub async fn load_customer_list(path: &Path) -> Result<Vec<Customer>, CampaignError> {
    let raw = read_file(path).await?;
    let customers: Vec<Customer> = serde_json::from_str(&raw)
        .map_err(|e| CampaignError::config_load(path.display().to_string(), e))?;

    log::info!(
        "(load_customer_list) {} clientes cargados desde {:?}",
        customers.len(),
        path
    );
    Ok(customers)
}
