use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use futures::FutureExt;
use tokio::time::sleep;
use uuid::Uuid;

use crate::config::app_config::AgentIds;
use crate::config::campaign_config::CampaignConfig;
use crate::errors::CampaignError;
use crate::models::campaign_model::{CampaignReport, CampaignResult, CustomerRunResult};
use crate::models::customer_model::Customer;
use crate::services::{
    attempt_tracker::AttemptTracker, call_log_service::CallLogSink, monitor_service::CallMonitor,
    provider_service::CallProvider, report_service::ReportSink,
    runner_service::CustomerCampaignRunner,
};

/// Reparte la lista en lotes de `concurrent_calls`, corre cada lote en
/// paralelo y espera `batch_delay` entre lotes.
pub struct CampaignScheduler {
    runner: CustomerCampaignRunner,
    tracker: Arc<AttemptTracker>,
    report_sink: Arc<dyn ReportSink>,
    agents: AgentIds,
}

impl CampaignScheduler {
    pub fn new(
        provider: Arc<dyn CallProvider>,
        call_log: Arc<dyn CallLogSink>,
        report_sink: Arc<dyn ReportSink>,
        agents: AgentIds,
    ) -> Self {
        let monitor = CallMonitor::new(provider.clone());
        Self::with_monitor(provider, monitor, call_log, report_sink, agents)
    }

    pub fn with_monitor(
        provider: Arc<dyn CallProvider>,
        monitor: CallMonitor,
        call_log: Arc<dyn CallLogSink>,
        report_sink: Arc<dyn ReportSink>,
        agents: AgentIds,
    ) -> Self {
        let tracker = Arc::new(AttemptTracker::new());
        let runner = CustomerCampaignRunner::new(provider, monitor, tracker.clone(), call_log);
        Self {
            runner,
            tracker,
            report_sink,
            agents,
        }
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &AttemptTracker {
        &self.tracker
    }

    /// Produce exactamente un resultado por entrada de `customers`, en el
    /// mismo orden, y deja persistido el reporte de la corrida.
    pub async fn run(&self, config: &CampaignConfig, customers: &[Customer]) -> Vec<CampaignResult> {
        let run_id = Uuid::new_v4();
        let start_time = Utc::now();
        let batch_size = config.concurrent_calls.max(1);
        let total_batches = customers.len().div_ceil(batch_size);

        log::info!("(run_campaign) Iniciando campaña: {}", config.campaign_name);
        log::info!("(run_campaign) Clientes: {}", customers.len());
        log::info!(
            "(run_campaign) Máximo de intentos por cliente: {}",
            config.max_attempts
        );
        log::info!("(run_campaign) Espera entre intentos: {}ms", config.retry_delay_ms);
        log::info!(
            "(run_campaign) Llamadas concurrentes: {} ({} lotes)",
            batch_size,
            total_batches
        );

        let duplicates = duplicate_indexes(customers);
        let mut results = Vec::with_capacity(customers.len());

        for (batch_index, batch) in customers.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;
            log::info!(
                "(run_campaign) Lote {}/{} con {} clientes",
                batch_index + 1,
                total_batches,
                batch.len()
            );

            let runs = batch.iter().enumerate().map(|(i, customer)| {
                self.run_isolated(customer, config, duplicates.contains(&(offset + i)))
            });
            results.extend(join_all(runs).await);

            if batch_index + 1 < total_batches {
                log::info!(
                    "(run_campaign) Esperando {}ms antes del siguiente lote",
                    config.batch_delay_ms
                );
                sleep(config.batch_delay()).await;
            }
        }

        let report =
            CampaignReport::build(&config.campaign_name, run_id, start_time, results.clone());
        log::info!(
            "(run_campaign) Resumen: {} exitosos, {} fallidos, {} sin respuesta, {} con error",
            report.successful,
            report.failed,
            report.no_answer,
            report.errored
        );
        match self.report_sink.write_report(&report).await {
            Ok(path) => log::info!("(run_campaign) Reporte de campaña guardado en {:?}", path),
            Err(e) => log::error!("(run_campaign) Error generando el reporte: {}", e),
        }

        log::info!("(run_campaign) Campaña completada.");
        results
    }

    /// Corre un cliente aislando sus errores y panics del resto del lote.
    async fn run_isolated(
        &self,
        customer: &Customer,
        config: &CampaignConfig,
        duplicate: bool,
    ) -> CampaignResult {
        let outcome = if duplicate {
            Err(CampaignError::DuplicateCustomer(customer.name.clone()).to_string())
        } else {
            AssertUnwindSafe(self.runner.run(customer, config, &self.agents))
                .catch_unwind()
                .await
                .map_err(|panic| {
                    format!("El runner falló inesperadamente: {}", panic_message(&*panic))
                })
                .and_then(|res| res.map_err(|e| e.to_string()))
        };

        let result = match outcome {
            Ok(result) => result,
            Err(message) => {
                log::error!("(run_campaign) Error con {}: {}", customer.name, message);
                if !duplicate {
                    // Un runner interrumpido no deja su entrada viva
                    if let Ok(key) = customer.key() {
                        self.tracker.release(&key);
                    }
                }
                CustomerRunResult::error(message)
            }
        };

        CampaignResult {
            customer: customer.clone(),
            result,
        }
    }
}

/// Posiciones de clientes cuya clave ya apareció antes en la lista.
fn duplicate_indexes(customers: &[Customer]) -> HashSet<usize> {
    let mut seen = HashSet::new();
    customers
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.key().ok().map(|key| (i, key)))
        .filter(|(_, key)| !seen.insert(key.clone()))
        .map(|(i, _)| i)
        .collect()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic sin mensaje".to_string()
    }
}
