// src/config/mod.rs
//! Runtime configuration.

pub mod app;

pub use app::{AppConfig, DetectorKind, TranslatorKind};
