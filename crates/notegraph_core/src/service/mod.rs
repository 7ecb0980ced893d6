//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into note use-cases.
//! - Expose the graph session entry points to the hosting view.

pub mod graph_service;
pub mod note_service;
