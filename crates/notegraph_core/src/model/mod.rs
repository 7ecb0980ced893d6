//! Domain model for notes and the relations derived from them.
//!
//! # Responsibility
//! - Define the note snapshot shape shared by store, inference and layout.
//! - Define derived connection records and their canonical pair keys.
//!
//! # Invariants
//! - Notes are owned by the store; the core only reads snapshots.
//! - Connections carry no identity across snapshots.

pub mod connection;
pub mod note;
