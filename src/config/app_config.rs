//! config/app_config.rs
//! Variables de entorno del proceso (credencial, agentes, rutas).

use std::path::PathBuf;

use crate::errors::CampaignError;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_TELEPHONY_PROVIDER: &str = "twilio";

/// Identificadores opacos de los agentes de voz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIds {
    pub screening: String,
    /// Agente de transferencia. La transferencia todavía no está conectada
    /// al flujo de llamadas: sólo se carga y se reporta al iniciar.
    pub transfer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub agents: AgentIds,
    pub phone_number_id: String,
    pub base_url: String,
    pub telephony_provider: String,
    pub campaign_config_path: PathBuf,
    pub customers_path: PathBuf,
    pub call_log_dir: PathBuf,
    pub reports_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CampaignError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Variables vacías se tratan igual que ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CampaignError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| CampaignError::config_load("entorno", format!("falta {}", key)))
        };

        Ok(AppConfig {
            api_key: required("ELEVENLABS_API_KEY")?,
            agents: AgentIds {
                screening: required("SCREENING_AGENT_ID")?,
                transfer: get("TRANSFER_AGENT_ID"),
            },
            phone_number_id: required("ELEVENLABS_PHONE_NUMBER_ID")?,
            base_url: get("ELEVENLABS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            telephony_provider: get("TELEPHONY_PROVIDER")
                .unwrap_or_else(|| DEFAULT_TELEPHONY_PROVIDER.to_string()),
            campaign_config_path: get("CAMPAIGN_CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./config/campaign_config.json")),
            customers_path: get("CUSTOMERS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/customers.json")),
            call_log_dir: get("CALL_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./logs")),
            reports_dir: get("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./reports")),
        })
    }
}
