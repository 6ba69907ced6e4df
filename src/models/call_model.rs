//! models/call_model.rs
//! Estructuras de una llamada: respuesta cruda del proveedor, estado del
//! intento en curso y resultado clasificado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, Instant};

/// Último mensaje reportado por el proveedor (sólo para logs)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LastMessage {
    pub content: Option<String>,
}

/// Respuesta de `GET /convai/conversations/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderCallStatus {
    pub status: String,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub transcript: Option<Vec<serde_json::Value>>,
    /// Duración en segundos
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ProviderCallStatus {
    pub fn last_message_content(&self) -> &str {
        self.last_message
            .as_ref()
            .and_then(|m| m.content.as_deref())
            .unwrap_or("N/A")
    }
}

/// Estado efímero de una llamada colocada. Lo crea y lo descarta el monitor.
#[derive(Debug, Clone)]
pub struct CallAttemptState {
    pub conversation_id: String,
    pub started_at: Instant,
}

impl CallAttemptState {
    pub fn new(conversation_id: &str) -> Self {
        Self {
            conversation_id: conversation_id.to_string(),
            started_at: Instant::now(),
        }
    }

    pub fn deadline(&self, max_duration: Duration) -> Instant {
        self.started_at + max_duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Completed,
    NoAnswer,
    Failed,
    Timeout,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Completed => "completed",
            OutcomeStatus::NoAnswer => "no_answer",
            OutcomeStatus::Failed => "failed",
            OutcomeStatus::Timeout => "timeout",
        }
    }
}

/// Resultado clasificado de un intento
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOutcome {
    pub status: OutcomeStatus,
    pub reason: String,
    pub should_retry: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<serde_json::Value>>,
    #[serde(default, rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl CallOutcome {
    fn new(status: OutcomeStatus, reason: &str, should_retry: bool) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            should_retry,
            transcript: None,
            duration_sec: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn completed(transcript: Vec<serde_json::Value>, duration_sec: f64) -> Self {
        Self {
            transcript: Some(transcript),
            duration_sec: Some(duration_sec),
            ..Self::new(
                OutcomeStatus::Completed,
                "Call completed - outcome determined by the voice agent tools",
                false,
            )
        }
    }

    pub fn no_answer(transcript: Vec<serde_json::Value>, duration_sec: f64) -> Self {
        Self {
            transcript: Some(transcript),
            duration_sec: Some(duration_sec),
            ..Self::new(
                OutcomeStatus::NoAnswer,
                "No one answered or call was too short",
                true,
            )
        }
    }

    /// El proveedor reportó `failed`/`error` para la conversación.
    pub fn failed(reason: Option<&str>) -> Self {
        Self::new(OutcomeStatus::Failed, reason.unwrap_or("Call failed"), true)
    }

    /// No se pudo colocar la llamada.
    pub fn placement_failed(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(OutcomeStatus::Failed, error, true)
        }
    }

    pub fn timeout() -> Self {
        Self::new(
            OutcomeStatus::Timeout,
            "Call exceeded maximum duration",
            true,
        )
    }
}
