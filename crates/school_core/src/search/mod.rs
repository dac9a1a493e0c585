//! In-memory search over the loaded graph.
//!
//! # Responsibility
//! - Filter students, instructors and courses by free text.
//! - Keep result shaping inside core.

pub mod filter;
