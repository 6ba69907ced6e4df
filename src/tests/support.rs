//! tests/support.rs
//! Dobles de prueba: proveedor con guion, sinks en memoria y helpers.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::config::app_config::AgentIds;
use crate::config::campaign_config::CampaignConfig;
use crate::errors::{CampaignError, ProviderError};
use crate::models::call_model::ProviderCallStatus;
use crate::models::campaign_model::{CallLogEntry, CampaignReport};
use crate::models::customer_model::Customer;
use crate::services::call_log_service::CallLogSink;
use crate::services::provider_service::CallProvider;
use crate::services::report_service::ReportSink;

/// Qué se está consultando: teléfono, número de intento y número de consulta
/// (todos 1-based).
#[derive(Debug, Clone)]
pub struct Poll {
    pub phone: String,
    pub attempt: u32,
    pub poll: u32,
}

type StatusScript = dyn Fn(&Poll) -> Result<ProviderCallStatus, ProviderError> + Send + Sync;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started { phone: String, at: Instant },
    Settled { phone: String, at: Instant },
}

struct Conversation {
    phone: String,
    attempt: u32,
    polls: u32,
}

/// Proveedor en memoria. El estado de cada consulta lo decide `script`.
pub struct StubProvider {
    script: Box<StatusScript>,
    /// (teléfono, intento) cuya colocación falla
    failing_starts: HashSet<(String, u32)>,
    /// Teléfonos cuya colocación hace panic
    panicking: HashSet<String>,
    /// Teléfonos cuyas consultas nunca responden
    hanging: HashSet<String>,
    conversations: Mutex<HashMap<String, Conversation>>,
    starts: Mutex<HashMap<String, u32>>,
    events: Mutex<Vec<Event>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubProvider {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&Poll) -> Result<ProviderCallStatus, ProviderError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            failing_starts: HashSet::new(),
            panicking: HashSet::new(),
            hanging: HashSet::new(),
            conversations: Mutex::new(HashMap::new()),
            starts: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn fail_start(mut self, phone: &str, attempt: u32) -> Self {
        self.failing_starts.insert((phone.to_string(), attempt));
        self
    }

    pub fn panic_on(mut self, phone: &str) -> Self {
        self.panicking.insert(phone.to_string());
        self
    }

    pub fn hang_on(mut self, phone: &str) -> Self {
        self.hanging.insert(phone.to_string());
        self
    }

    /// Cantidad de llamadas colocadas (o intentadas) a un teléfono
    pub fn starts_for(&self, phone: &str) -> u32 {
        self.starts.lock().unwrap().get(phone).copied().unwrap_or(0)
    }

    pub fn total_starts(&self) -> u32 {
        self.starts.lock().unwrap().values().sum()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn start_times(&self, phone: &str) -> Vec<Instant> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Started { phone: p, at } if p == phone => Some(at),
                _ => None,
            })
            .collect()
    }

    pub fn settle_times(&self, phone: &str) -> Vec<Instant> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Settled { phone: p, at } if p == phone => Some(at),
                _ => None,
            })
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallProvider for StubProvider {
    async fn start_call(&self, _agent_id: &str, to_number: &str) -> Result<String, ProviderError> {
        let attempt = {
            let mut starts = self.starts.lock().unwrap();
            let n = starts.entry(to_number.to_string()).or_insert(0);
            *n += 1;
            *n
        };

        if self.panicking.contains(to_number) {
            panic!("proveedor roto para {}", to_number);
        }
        if self
            .failing_starts
            .contains(&(to_number.to_string(), attempt))
        {
            return Err(ProviderError::Http {
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        self.events.lock().unwrap().push(Event::Started {
            phone: to_number.to_string(),
            at: Instant::now(),
        });
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        let id = format!("conv-{}-{}", to_number, attempt);
        self.conversations.lock().unwrap().insert(
            id.clone(),
            Conversation {
                phone: to_number.to_string(),
                attempt,
                polls: 0,
            },
        );
        Ok(id)
    }

    async fn get_call_status(
        &self,
        conversation_id: &str,
    ) -> Result<ProviderCallStatus, ProviderError> {
        let poll = {
            let mut conversations = self.conversations.lock().unwrap();
            let conv = conversations
                .get_mut(conversation_id)
                .expect("conversación desconocida");
            conv.polls += 1;
            Poll {
                phone: conv.phone.clone(),
                attempt: conv.attempt,
                poll: conv.polls,
            }
        };

        if self.hanging.contains(&poll.phone) {
            std::future::pending::<()>().await;
        }

        let reply = (self.script)(&poll);
        if let Ok(status) = &reply {
            if matches!(
                status.status.as_str(),
                "completed" | "ended" | "failed" | "error"
            ) {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                self.events.lock().unwrap().push(Event::Settled {
                    phone: poll.phone.clone(),
                    at: Instant::now(),
                });
            }
        }
        reply
    }
}

/// Conversación contestada: 3 turnos y 42 segundos
pub fn answered() -> Result<ProviderCallStatus, ProviderError> {
    Ok(ProviderCallStatus {
        status: "completed".to_string(),
        transcript: Some(vec![
            serde_json::json!({"role": "agent", "message": "Hola"}),
            serde_json::json!({"role": "user", "message": "Hola, diga"}),
            serde_json::json!({"role": "agent", "message": "Gracias"}),
        ]),
        duration: Some(42.0),
        ..Default::default()
    })
}

/// Terminó pero nadie habló: se clasifica como no_answer
pub fn unanswered() -> Result<ProviderCallStatus, ProviderError> {
    Ok(ProviderCallStatus {
        status: "ended".to_string(),
        transcript: Some(vec![serde_json::json!({"role": "agent", "message": "Hola"})]),
        duration: Some(2.0),
        ..Default::default()
    })
}

pub fn in_progress() -> Result<ProviderCallStatus, ProviderError> {
    Ok(ProviderCallStatus {
        status: "in-progress".to_string(),
        ..Default::default()
    })
}

pub fn provider_failed(error: &str) -> Result<ProviderCallStatus, ProviderError> {
    Ok(ProviderCallStatus {
        status: "failed".to_string(),
        error: Some(error.to_string()),
        ..Default::default()
    })
}

pub fn transport_error() -> Result<ProviderCallStatus, ProviderError> {
    Err(ProviderError::InvalidResponse("conexión reiniciada".to_string()))
}

#[derive(Default)]
pub struct MemoryCallLog {
    entries: Mutex<Vec<CallLogEntry>>,
}

impl MemoryCallLog {
    pub fn entries(&self) -> Vec<CallLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallLogSink for MemoryCallLog {
    async fn record(&self, entry: CallLogEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

#[derive(Default)]
pub struct MemoryReportSink {
    reports: Mutex<Vec<CampaignReport>>,
}

impl MemoryReportSink {
    pub fn reports(&self) -> Vec<CampaignReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for MemoryReportSink {
    async fn write_report(&self, report: &CampaignReport) -> Result<PathBuf, CampaignError> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(PathBuf::from("memoria"))
    }
}

pub struct FailingReportSink;

#[async_trait]
impl ReportSink for FailingReportSink {
    async fn write_report(&self, _report: &CampaignReport) -> Result<PathBuf, CampaignError> {
        Err(CampaignError::Persistence("disco lleno".to_string()))
    }
}

pub fn agents() -> AgentIds {
    AgentIds {
        screening: "agent_screening".to_string(),
        transfer: None,
    }
}

pub fn config(max_attempts: u32, retry_delay_ms: u64) -> CampaignConfig {
    CampaignConfig {
        campaign_name: "prueba".to_string(),
        max_attempts,
        retry_delay_ms,
        max_call_duration_sec: 60,
        concurrent_calls: 1,
        batch_delay_ms: 0,
    }
}

pub fn customers(n: usize) -> Vec<Customer> {
    (1..=n)
        .map(|i| {
            let id = format!("c{}", i);
            Customer::new(
                Some(id.as_str()),
                &format!("Cliente {}", i),
                &format!("+1555000{:04}", i),
            )
        })
        .collect()
}
