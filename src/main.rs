use std::sync::Arc;

use anyhow::{Context, Result};
use dotenv::dotenv;

use crate::config::app_config::AppConfig;
use crate::config::campaign_config::{load_campaign_config, load_customer_list};
use crate::logger::init_logger;
use crate::services::call_log_service::spawn_call_log;
use crate::services::provider_service::ElevenLabsClient;
use crate::services::report_service::FileReportSink;
use crate::services::scheduler_service::CampaignScheduler;

mod config;
mod errors;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let app_config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Configura las variables de entorno requeridas: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(transfer) = &app_config.agents.transfer {
        // La transferencia a un segundo agente no está conectada todavía
        log::warn!(
            "TRANSFER_AGENT_ID={} configurado, pero la transferencia no está soportada; se ignora.",
            transfer
        );
    }

    let config = load_campaign_config(&app_config.campaign_config_path)
        .await
        .context("Error cargando la configuración de la campaña")?;
    let customers = load_customer_list(&app_config.customers_path)
        .await
        .context("Error cargando la lista de clientes")?;

    let provider = ElevenLabsClient::new(
        &app_config.base_url,
        &app_config.api_key,
        &app_config.phone_number_id,
        &app_config.telephony_provider,
    )
    .context("No se pudo inicializar el cliente de ElevenLabs")?;

    let (call_log, call_log_writer) = spawn_call_log(app_config.call_log_dir.clone());
    let scheduler = CampaignScheduler::new(
        Arc::new(provider),
        Arc::new(call_log),
        Arc::new(FileReportSink::new(app_config.reports_dir.clone())),
        app_config.agents.clone(),
    );

    let results = scheduler.run(&config, &customers).await;
    log::info!("Campaña '{}' finalizada: {} resultados", config.campaign_name, results.len());

    // Soltar el scheduler cierra la cola del log; esperamos que se vacíe
    drop(scheduler);
    call_log_writer
        .await
        .context("El escritor del log de llamadas terminó con error")?;

    Ok(())
}
