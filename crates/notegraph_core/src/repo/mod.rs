//! Note store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence collaborator the graph core consumes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Store writes validate notes before persistence.
//! - Store APIs return semantic errors (`DuplicateId`) in addition to DB
//!   transport errors.

pub mod note_store;
pub mod sqlite_store;
