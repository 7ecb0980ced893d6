//! Force-directed layout and viewport interaction.
//!
//! # Responsibility
//! - Simulate node positions for the current note graph.
//! - Map pointer gestures onto simulation state and the viewport transform.
//! - Drive the simulation from a host frame clock.
//!
//! # Invariants
//! - All layout state lives in explicit context objects; nothing is global.
//! - Layout is never persisted.

pub mod frame_loop;
pub mod geometry;
pub mod interaction;
pub mod simulation;
pub mod viewport;
