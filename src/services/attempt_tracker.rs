use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::customer_model::CustomerKey;

/// Contador de intentos por cliente durante una corrida.
/// Cada runner toca sólo su propia clave; el mutex protege el mapa, no la lógica.
#[derive(Debug, Default)]
pub struct AttemptTracker {
    attempts: Mutex<HashMap<CustomerKey, u32>>,
}

impl AttemptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un intento nuevo y devuelve su número (1-based).
    /// Devuelve `None` si ya se llegó a `max_attempts`, sin tocar el contador.
    pub fn begin_attempt(&self, key: &CustomerKey, max_attempts: u32) -> Option<u32> {
        let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let count = attempts.entry(key.clone()).or_insert(0);
        if *count >= max_attempts {
            return None;
        }
        *count += 1;
        Some(*count)
    }

    #[cfg(test)]
    pub fn attempts(&self, key: &CustomerKey) -> u32 {
        let attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        attempts.get(key).copied().unwrap_or(0)
    }

    /// Descarta la entrada de un cliente que ya terminó.
    pub fn release(&self, key: &CustomerKey) -> u32 {
        let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        attempts.remove(key).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.attempts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
