//! models/customer_model.rs
//! Cliente de la campaña y su clave de seguimiento de intentos.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CampaignError;

/// El `id` de la lista puede venir como texto o como número.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerId {
    Text(String),
    Number(i64),
}

/// Entrada del archivo de clientes: `{ id?, name, phone }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    pub name: String,
    pub phone: String,
}

/// Clave `"{phone}_{id o name}"` del contador de intentos.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerKey(String);

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Customer {
    #[cfg(test)]
    pub fn new(id: Option<&str>, name: &str, phone: &str) -> Self {
        Customer {
            id: id.map(|s| CustomerId::Text(s.to_string())),
            name: name.to_string(),
            phone: phone.to_string(),
        }
    }

    /// Construye la clave de seguimiento. Un teléfono vacío no es marcable.
    pub fn key(&self) -> Result<CustomerKey, CampaignError> {
        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(CampaignError::InvalidCustomer(format!(
                "'{}' no tiene teléfono",
                self.name
            )));
        }

        // Un id vacío cuenta como ausente
        let identity = match &self.id {
            Some(CustomerId::Text(s)) if !s.trim().is_empty() => s.clone(),
            Some(CustomerId::Number(n)) => n.to_string(),
            _ => self.name.clone(),
        };

        Ok(CustomerKey(format!("{}_{}", phone, identity)))
    }
}
