//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate load -> mutate -> save cycles over competition records.
//! - Keep UI/CLI callers decoupled from storage details.

pub mod competition_service;
