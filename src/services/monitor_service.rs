use std::sync::Arc;

use tokio::time::{sleep, timeout_at, Duration, Instant};

use crate::models::call_model::{CallAttemptState, CallOutcome, ProviderCallStatus};
use crate::services::provider_service::CallProvider;

/// Intervalo fijo entre consultas de estado
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Menos turnos que esto en la transcripción => nadie contestó
const MIN_TRANSCRIPT_TURNS: usize = 2;
/// Llamadas más cortas que esto (segundos) => nadie contestó
const MIN_CALL_DURATION_SEC: f64 = 5.0;

/// Clasifica una conversación terminada con éxito (`completed`/`ended`).
/// Sólo mira la forma de la llamada; la intención del cliente la resuelven
/// las herramientas del propio agente de voz.
pub fn classify_outcome(status: ProviderCallStatus) -> CallOutcome {
    let transcript = status.transcript.unwrap_or_default();
    let duration = status.duration.unwrap_or(0.0);

    if transcript.len() < MIN_TRANSCRIPT_TURNS || duration < MIN_CALL_DURATION_SEC {
        return CallOutcome::no_answer(transcript, duration);
    }
    CallOutcome::completed(transcript, duration)
}

#[derive(Clone)]
pub struct CallMonitor {
    provider: Arc<dyn CallProvider>,
    poll_interval: Duration,
}

impl CallMonitor {
    pub fn new(provider: Arc<dyn CallProvider>) -> Self {
        Self::with_poll_interval(provider, POLL_INTERVAL)
    }

    pub fn with_poll_interval(provider: Arc<dyn CallProvider>, poll_interval: Duration) -> Self {
        Self {
            provider,
            poll_interval,
        }
    }

    /// Consulta el estado hasta un estado terminal o hasta agotar
    /// `max_duration_sec`. El deadline se calcula una sola vez al entrar.
    pub async fn monitor(&self, conversation_id: &str, max_duration_sec: u64) -> CallOutcome {
        let state = CallAttemptState::new(conversation_id);
        let deadline = state.deadline(Duration::from_secs(max_duration_sec));

        log::info!(
            "(monitor) Monitoreando estado de la conversación {} (máx {}s)",
            state.conversation_id,
            max_duration_sec
        );

        while Instant::now() < deadline {
            // Un request colgado no puede pasarse del deadline
            let polled = timeout_at(
                deadline,
                self.provider.get_call_status(&state.conversation_id),
            )
            .await;

            match polled {
                Err(_) => break,
                Ok(Ok(status)) => {
                    log::debug!(
                        "(monitor) {} status={} último mensaje: {}",
                        state.conversation_id,
                        status.status,
                        status.last_message_content()
                    );
                    match status.status.as_str() {
                        "completed" | "ended" => return classify_outcome(status),
                        "failed" | "error" => {
                            log::warn!(
                                "(monitor) La conversación {} terminó con error: {:?}",
                                state.conversation_id,
                                status.error
                            );
                            return CallOutcome::failed(status.error.as_deref());
                        }
                        _ => {}
                    }
                }
                Ok(Err(e)) => {
                    // Error transitorio: se reintenta la consulta, no la llamada
                    log::warn!(
                        "(monitor) Error consultando {}: {}",
                        state.conversation_id,
                        e
                    );
                }
            }

            sleep(self.poll_interval).await;
        }

        log::warn!(
            "(monitor) La conversación {} superó {}s sin terminar",
            state.conversation_id,
            max_duration_sec
        );
        CallOutcome::timeout()
    }
}
