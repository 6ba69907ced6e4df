//! config/mod.rs
//! Configuración del proceso (entorno) y de la campaña (archivo JSON).

pub mod app_config;
pub mod campaign_config;
