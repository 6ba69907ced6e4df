//! models/campaign_model.rs
//! Resultados por cliente, registro de log por intento y reporte final.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::call_model::{CallOutcome, OutcomeStatus};
use crate::models::customer_model::Customer;

pub const MAX_ATTEMPTS_REACHED: &str = "max_attempts_reached";
pub const NOT_INTERESTED: &str = "not_interested";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
    Error,
}

/// Resultado terminal de un cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRunResult {
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub attempts: u32,
}

impl CustomerRunResult {
    pub fn completed(outcome: OutcomeStatus, attempts: u32) -> Self {
        Self {
            status: RunStatus::Completed,
            outcome: Some(outcome.as_str().to_string()),
            error: None,
            attempts,
        }
    }

    pub fn max_attempts_reached(attempts: u32) -> Self {
        Self {
            status: RunStatus::Failed,
            outcome: Some(MAX_ATTEMPTS_REACHED.to_string()),
            error: None,
            attempts,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: RunStatus::Error,
            outcome: None,
            error: Some(message),
            attempts: 0,
        }
    }

    fn outcome_is(&self, label: &str) -> bool {
        self.outcome.as_deref() == Some(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignResult {
    pub customer: Customer,
    pub result: CustomerRunResult,
}

/// Una línea del log diario de llamadas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLogEntry {
    pub timestamp: DateTime<Utc>,
    pub customer: Customer,
    pub attempt: u32,
    pub result: CallOutcome,
}

impl CallLogEntry {
    pub fn new(customer: &Customer, attempt: u32, result: &CallOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            customer: customer.clone(),
            attempt,
            result: result.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignReport {
    pub campaign_name: String,
    pub run_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_customers: usize,
    pub successful: usize,
    pub failed: usize,
    pub not_interested: usize,
    pub no_answer: usize,
    pub errored: usize,
    pub results: Vec<CampaignResult>,
}

impl CampaignReport {
    /// Cuenta las categorías sobre la lista plana de resultados.
    /// Cada resultado cae a lo sumo en una de successful/failed/notInterested/noAnswer.
    pub fn build(
        campaign_name: &str,
        run_id: Uuid,
        start_time: DateTime<Utc>,
        results: Vec<CampaignResult>,
    ) -> Self {
        let count = |pred: &dyn Fn(&CustomerRunResult) -> bool| {
            results.iter().filter(|r| pred(&r.result)).count()
        };

        let successful = count(&|r| {
            r.status == RunStatus::Completed && r.outcome_is(OutcomeStatus::Completed.as_str())
        });
        let failed = count(&|r| r.status == RunStatus::Failed);
        let not_interested =
            count(&|r| r.status == RunStatus::Completed && r.outcome_is(NOT_INTERESTED));
        let no_answer = count(&|r| {
            r.status == RunStatus::Completed && r.outcome_is(OutcomeStatus::NoAnswer.as_str())
        });
        let errored = count(&|r| r.status == RunStatus::Error);

        CampaignReport {
            campaign_name: campaign_name.to_string(),
            run_id,
            start_time,
            end_time: Utc::now(),
            total_customers: results.len(),
            successful,
            failed,
            not_interested,
            no_answer,
            errored,
            results,
        }
    }
}
