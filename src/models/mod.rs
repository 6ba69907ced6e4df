//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod call_model;
pub mod campaign_model;
pub mod customer_model;
