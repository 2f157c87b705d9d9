//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep HTTP and GUI layers decoupled from storage details.

pub mod account_service;
pub mod export_service;
pub mod favorite_service;
pub mod qr_service;
pub mod stats_service;
