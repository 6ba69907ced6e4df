//! services/mod.rs
//! Módulo que agrupa los "servicios" de la campaña: proveedor de llamadas,
//! monitor, contador de intentos, runner por cliente, scheduler y sinks.

pub mod attempt_tracker;
pub mod call_log_service;
pub mod monitor_service;
pub mod provider_service;
pub mod report_service;
pub mod runner_service;
pub mod scheduler_service;
