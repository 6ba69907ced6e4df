//! tests/mod.rs
//! Pruebas unitarias de la campaña.

pub mod support;
