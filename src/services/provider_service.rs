use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::call_model::ProviderCallStatus;

/// Tiempo máximo por request al proveedor
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Servicio externo de llamadas: iniciar llamada y consultar estado.
/// No reintenta nada; eso lo deciden el monitor y el runner.
#[async_trait]
pub trait CallProvider: Send + Sync {
    async fn start_call(&self, agent_id: &str, to_number: &str) -> Result<String, ProviderError>;

    async fn get_call_status(
        &self,
        conversation_id: &str,
    ) -> Result<ProviderCallStatus, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct OutboundCallResponse {
    conversation_id: Option<String>,
}

/// Cliente HTTP de ElevenLabs ConvAI
#[derive(Clone)]
pub struct ElevenLabsClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    phone_number_id: String,
    telephony_provider: String,
}

impl ElevenLabsClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        phone_number_id: &str,
        telephony_provider: &str,
    ) -> Result<Self, ProviderError> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            phone_number_id: phone_number_id.to_string(),
            telephony_provider: telephony_provider.to_string(),
        })
    }

    async fn error_from(resp: reqwest::Response) -> ProviderError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        ProviderError::Http { status, body }
    }
}

#[async_trait]
impl CallProvider for ElevenLabsClient {
    async fn start_call(&self, agent_id: &str, to_number: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/convai/{}/outbound-call",
            self.base_url, self.telephony_provider
        );
        let payload = serde_json::json!({
            "agent_id": agent_id,
            "agent_phone_number_id": self.phone_number_id,
            "to_number": to_number
        });

        log::debug!("(start_call) POST {} to_number={}", url, to_number);
        let resp = self
            .http_client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            let err = Self::error_from(resp).await;
            log::error!("(start_call) El proveedor rechazó la llamada: {}", err);
            return Err(err);
        }

        let body = resp.json::<OutboundCallResponse>().await?;
        body.conversation_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderError::InvalidResponse("falta conversation_id".to_string()))
    }

    async fn get_call_status(
        &self,
        conversation_id: &str,
    ) -> Result<ProviderCallStatus, ProviderError> {
        let url = format!(
            "{}/convai/conversations/{}",
            self.base_url,
            urlencoding::encode(conversation_id)
        );

        let resp = self
            .http_client
            .get(&url)
            .header("xi-api-key", &self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }

        Ok(resp.json::<ProviderCallStatus>().await?)
    }
}
