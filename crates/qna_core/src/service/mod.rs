//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls around domain aggregate operations.
//! - Keep callers decoupled from storage details.

pub mod qna_service;
