//! Core domain logic for the notes graph.
//! This crate is the single source of truth for connection and layout invariants.

pub mod config;
pub mod db;
pub mod graph;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, GraphConfig, InteractionConfig, SimulationConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use graph::inference::{infer_connections, infer_pair};
pub use graph::keywords::extract_keywords;
pub use layout::frame_loop::{FrameClock, FrameLoop, FrameRequestId};
pub use layout::geometry::Point;
pub use layout::interaction::{InteractionController, PointerTarget};
pub use layout::simulation::{edges_from_connections, SimEdge, SimNode, Simulation};
pub use layout::viewport::ViewportTransform;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::connection::{Connection, ConnectionSet, ConnectionTier, PairKey};
pub use model::note::{Note, NoteId};
pub use repo::note_store::{MemoryNoteStore, NoteStore, RepoError, RepoResult};
pub use repo::sqlite_store::SqliteNoteStore;
pub use service::graph_service::{GraphWorkspace, NoteGraph, RenderEdge, RenderFrame};
pub use service::note_service::{NewNote, NoteService, NoteServiceError, SnapshotSource};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
