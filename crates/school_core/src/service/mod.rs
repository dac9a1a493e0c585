//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, reconciler and snapshot calls into use cases.
//! - Keep front ends decoupled from storage details.

pub mod school_service;
