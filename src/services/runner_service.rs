use std::sync::Arc;

use tokio::time::sleep;

use crate::config::app_config::AgentIds;
use crate::config::campaign_config::CampaignConfig;
use crate::errors::CampaignError;
use crate::models::call_model::CallOutcome;
use crate::models::campaign_model::{CallLogEntry, CustomerRunResult};
use crate::models::customer_model::Customer;
use crate::services::{
    attempt_tracker::AttemptTracker, call_log_service::CallLogSink, monitor_service::CallMonitor,
    provider_service::CallProvider,
};

/// Máquina de estados de un cliente: Intentando -> {Éxito, Agotado}.
#[derive(Clone)]
pub struct CustomerCampaignRunner {
    provider: Arc<dyn CallProvider>,
    monitor: CallMonitor,
    tracker: Arc<AttemptTracker>,
    call_log: Arc<dyn CallLogSink>,
}

impl CustomerCampaignRunner {
    pub fn new(
        provider: Arc<dyn CallProvider>,
        monitor: CallMonitor,
        tracker: Arc<AttemptTracker>,
        call_log: Arc<dyn CallLogSink>,
    ) -> Self {
        Self {
            provider,
            monitor,
            tracker,
            call_log,
        }
    }

    /// Corre los intentos de un cliente hasta un resultado que no pide
    /// reintento o hasta agotar `max_attempts`.
    pub async fn run(
        &self,
        customer: &Customer,
        config: &CampaignConfig,
        agents: &AgentIds,
    ) -> Result<CustomerRunResult, CampaignError> {
        let key = customer.key()?;

        // El contador se incrementa antes de marcar
        while let Some(attempt) = self.tracker.begin_attempt(&key, config.max_attempts) {
            log::info!(
                "(run_customer) Llamando a {} ({}) - Intento {}/{}",
                customer.name,
                customer.phone,
                attempt,
                config.max_attempts
            );

            let outcome = self.attempt_call(customer, config, agents).await;
            self.call_log
                .record(CallLogEntry::new(customer, attempt, &outcome))
                .await;

            if !outcome.should_retry {
                self.tracker.release(&key);
                log::info!(
                    "(run_customer) Campaña completada para {} - {}",
                    customer.name,
                    outcome.reason
                );
                return Ok(CustomerRunResult::completed(outcome.status, attempt));
            }

            if attempt < config.max_attempts {
                log::info!(
                    "(run_customer) {} -> {}. Esperando {}ms antes del siguiente intento",
                    customer.name,
                    outcome.status.as_str(),
                    config.retry_delay_ms
                );
                sleep(config.retry_delay()).await;
            }
        }

        let attempts = self.tracker.release(&key);
        log::warn!(
            "(run_customer) Campaña fallida para {} - máximo de intentos alcanzado ({})",
            customer.name,
            attempts
        );
        Ok(CustomerRunResult::max_attempts_reached(attempts))
    }

    /// Coloca y monitorea una llamada. Si no se puede colocar, el intento
    /// cuenta como fallido y reintentable.
    async fn attempt_call(
        &self,
        customer: &Customer,
        config: &CampaignConfig,
        agents: &AgentIds,
    ) -> CallOutcome {
        match self
            .provider
            .start_call(&agents.screening, &customer.phone)
            .await
        {
            Ok(conversation_id) => {
                log::info!(
                    "(attempt_call) Llamada iniciada para {} - Conversation ID: {}",
                    customer.name,
                    conversation_id
                );
                self.monitor
                    .monitor(&conversation_id, config.max_call_duration_sec)
                    .await
            }
            Err(e) => {
                log::error!("(attempt_call) Error llamando a {}: {}", customer.name, e);
                CallOutcome::placement_failed(&e.to_string())
            }
        }
    }
}
