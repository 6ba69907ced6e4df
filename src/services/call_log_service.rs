use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
    sync::mpsc,
    task::JoinHandle,
};

use crate::errors::CampaignError;
use crate::models::campaign_model::CallLogEntry;

/// Capacidad de la cola hacia el escritor
const LOG_QUEUE_CAPACITY: usize = 256;

/// Destino de los registros por intento. Nunca falla hacia el llamador.
#[async_trait]
pub trait CallLogSink: Send + Sync {
    async fn record(&self, entry: CallLogEntry);
}

pub fn log_file_name(day: NaiveDate) -> String {
    format!("call_log_{}.jsonl", day.format("%Y-%m-%d"))
}

/// Extremo de envío hacia el escritor único del log diario.
#[derive(Clone)]
pub struct CallLogHandle {
    tx: mpsc::Sender<CallLogEntry>,
}

#[async_trait]
impl CallLogSink for CallLogHandle {
    async fn record(&self, entry: CallLogEntry) {
        if let Err(e) = self.tx.send(entry).await {
            log::error!(
                "(record) El escritor del log de llamadas ya no está activo: {}",
                e
            );
        }
    }
}

/// Lanza el escritor. Termina cuando se sueltan todos los `CallLogHandle`;
/// esperar el `JoinHandle` garantiza que todo lo encolado quedó escrito.
pub fn spawn_call_log(dir: PathBuf) -> (CallLogHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(LOG_QUEUE_CAPACITY);
    let writer = CallLogWriter { dir, current: None };
    let handle = tokio::spawn(writer.run(rx));
    (CallLogHandle { tx }, handle)
}

struct CallLogWriter {
    dir: PathBuf,
    /// Archivo abierto del día actual
    current: Option<(NaiveDate, File)>,
}

impl CallLogWriter {
    async fn run(mut self, mut rx: mpsc::Receiver<CallLogEntry>) {
        while let Some(entry) = rx.recv().await {
            if let Err(e) = self.append(&entry).await {
                log::error!(
                    "(call_log_writer) No se pudo registrar el intento {} de {}: {}",
                    entry.attempt,
                    entry.customer.name,
                    e
                );
                // Se reabre en el siguiente registro
                self.current = None;
            }
        }
        log::debug!("(call_log_writer) Cola cerrada, escritor finalizado.");
    }

    async fn append(&mut self, entry: &CallLogEntry) -> Result<(), CampaignError> {
        let day = entry.timestamp.date_naive();

        let mut line = serde_json::to_vec(entry)
            .map_err(|e| CampaignError::Persistence(format!("serializando registro: {}", e)))?;
        line.push(b'\n');

        let file = self.file_for(day).await?;
        file.write_all(&line)
            .await
            .map_err(|e| CampaignError::Persistence(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| CampaignError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Rota el archivo cuando cambia el día.
    async fn file_for(&mut self, day: NaiveDate) -> Result<&mut File, CampaignError> {
        let stale = !matches!(&self.current, Some((open_day, _)) if *open_day == day);
        if stale {
            let file = open_append(&self.dir, day).await?;
            self.current = Some((day, file));
        }

        match self.current.as_mut() {
            Some((_, file)) => Ok(file),
            None => Err(CampaignError::Persistence(
                "archivo de log no disponible".to_string(),
            )),
        }
    }
}

async fn open_append(dir: &Path, day: NaiveDate) -> Result<File, CampaignError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| CampaignError::Persistence(format!("creando {:?}: {}", dir, e)))?;

    let path = dir.join(log_file_name(day));
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .map_err(|e| CampaignError::Persistence(format!("abriendo {:?}: {}", path, e)))
}
