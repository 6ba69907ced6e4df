use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::CampaignError;
use crate::models::campaign_model::CampaignReport;

/// Destino del reporte final; se escribe una sola vez por corrida.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn write_report(&self, report: &CampaignReport) -> Result<PathBuf, CampaignError>;
}

/// Guarda `campaign_report_<epoch_ms>.json` en el directorio de reportes.
#[derive(Clone, Debug)]
pub struct FileReportSink {
    dir: PathBuf,
}

impl FileReportSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl ReportSink for FileReportSink {
    async fn write_report(&self, report: &CampaignReport) -> Result<PathBuf, CampaignError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CampaignError::Persistence(format!("creando {:?}: {}", self.dir, e)))?;

        let path = self.dir.join(format!(
            "campaign_report_{}.json",
            report.end_time.timestamp_millis()
        ));
        let json = serde_json::to_vec_pretty(report)
            .map_err(|e| CampaignError::Persistence(format!("serializando reporte: {}", e)))?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|e| CampaignError::Persistence(format!("escribiendo {:?}: {}", path, e)))?;

        Ok(path)
    }
}
