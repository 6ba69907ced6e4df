//! errors.rs
//! Taxonomía de errores de la campaña.
//!
//! Sólo `ConfigLoad` es fatal. Los errores del proveedor se convierten en
//! resultados reintentables y los de persistencia se registran en el log.

use thiserror::Error;

/// Errores del cliente del proveedor de llamadas (ElevenLabs).
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Respuesta HTTP no exitosa (no 2xx)
    #[error("El proveedor respondió {status}: {body}")]
    Http { status: u16, body: String },

    /// Fallo de red, timeout del request, etc.
    #[error("Fallo de transporte hacia el proveedor: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Respuesta inválida del proveedor: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Error cargando {path}: {message}")]
    ConfigLoad { path: String, message: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Error de persistencia: {0}")]
    Persistence(String),

    #[error("Cliente inválido: {0}")]
    InvalidCustomer(String),

    #[error("Cliente duplicado en la lista: {0}")]
    DuplicateCustomer(String),
}

impl CampaignError {
    pub fn config_load(path: impl Into<String>, message: impl ToString) -> Self {
        CampaignError::ConfigLoad {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
