//! Connection inference between notes.
//!
//! # Responsibility
//! - Turn free text into comparable keyword sets.
//! - Derive the weighted, explained edge set from a note snapshot.
//!
//! # Invariants
//! - Inference is a pure function of its input snapshot.
//! - The full set is rebuilt on every mutation; nothing is patched.

pub mod inference;
pub mod keywords;
