//! Host-facing graph session.
//!
//! # Responsibility
//! - Recompute connections on every snapshot change and feed the layout.
//! - Expose per-frame positions and edges for rendering.
//! - Wire a store-backed note service to a graph session.
//!
//! # Invariants
//! - Connections are always a function of the latest snapshot.
//! - Render frames never contain edges whose endpoint has no position.
//! - Interaction changes positions and pins, never topology.

use crate::config::GraphConfig;
use crate::graph::inference::infer_connections;
use crate::layout::geometry::Point;
use crate::layout::interaction::{InteractionController, PointerTarget};
use crate::layout::simulation::{edges_from_connections, Simulation};
use crate::layout::viewport::ViewportTransform;
use crate::model::connection::{ConnectionSet, ConnectionTier};
use crate::model::note::{Note, NoteId};
use crate::repo::note_store::NoteStore;
use crate::service::note_service::{NewNote, NoteService, NoteServiceError, SnapshotSource};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// One edge as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEdge {
    pub source: NoteId,
    pub target: NoteId,
    pub strength: f64,
    pub reason: String,
    pub tier: ConnectionTier,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Simulation-space position per note id.
    pub positions: BTreeMap<NoteId, Point>,
    pub edges: Vec<RenderEdge>,
    pub transform: ViewportTransform,
    pub selected: Option<NoteId>,
    /// Remaining active steps; zero means the layout is frozen.
    pub heat: u32,
}

/// Graph session: snapshot, connections, layout and interaction.
pub struct NoteGraph {
    notes: Vec<Note>,
    connections: ConnectionSet,
    simulation: Simulation,
    interaction: InteractionController,
}

impl NoteGraph {
    pub fn new(config: GraphConfig, width: f64, height: f64) -> Self {
        Self {
            notes: Vec::new(),
            connections: ConnectionSet::new(),
            simulation: Simulation::new(config.simulation, width, height),
            interaction: InteractionController::new(config.interaction),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    /// Replaces the snapshot, recomputes every connection and reheats.
    pub fn on_notes_changed(&mut self, snapshot: Vec<Note>) -> &ConnectionSet {
        self.connections = infer_connections(&snapshot);
        let ids = snapshot
            .iter()
            .map(|note| note.id.clone())
            .collect::<Vec<_>>();
        self.simulation
            .set_graph(&ids, edges_from_connections(&self.connections));
        self.notes = snapshot;
        info!(
            "event=graph_rebuild module=service status=ok notes={} connections={}",
            self.notes.len(),
            self.connections.len()
        );
        &self.connections
    }

    /// Re-centres gravity and re-places nodes added since the last resize.
    pub fn on_viewport_resized(&mut self, width: f64, height: f64) {
        self.simulation.resize(width, height);
    }

    /// Advances the layout by one step. Returns `false` when frozen.
    pub fn tick(&mut self) -> bool {
        self.simulation.step()
    }

    /// Steps once and returns the resulting frame.
    pub fn tick_frame(&mut self) -> RenderFrame {
        self.tick();
        self.frame()
    }

    /// Current render frame.
    pub fn frame(&self) -> RenderFrame {
        let positions = self.simulation.positions();
        let edges = self
            .connections
            .iter()
            .filter(|conn| {
                positions.contains_key(conn.source()) && positions.contains_key(conn.target())
            })
            .map(|conn| RenderEdge {
                source: conn.source().to_string(),
                target: conn.target().to_string(),
                strength: conn.strength,
                reason: conn.reason.clone(),
                tier: conn.tier,
            })
            .collect();
        RenderFrame {
            positions,
            edges,
            transform: self.interaction.transform(),
            selected: self.interaction.selected().map(str::to_string),
            heat: self.simulation.heat(),
        }
    }

    pub fn pointer_down(&mut self, client: Point) -> PointerTarget {
        self.interaction.pointer_down(&mut self.simulation, client)
    }

    pub fn pointer_move(&mut self, client: Point) {
        self.interaction.pointer_move(&mut self.simulation, client);
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up(&mut self.simulation);
    }

    pub fn wheel(&mut self, client: Point, delta_y: f64) {
        self.interaction.wheel(client, delta_y);
    }

    /// Zooms in around the viewport centre.
    pub fn zoom_in(&mut self) {
        let anchor = self.viewport_center();
        self.interaction.zoom_in(anchor);
    }

    /// Zooms out around the viewport centre.
    pub fn zoom_out(&mut self) {
        let anchor = self.viewport_center();
        self.interaction.zoom_out(anchor);
    }

    pub fn reset_view(&mut self) {
        self.interaction.reset_view();
    }

    /// Selects a note; returns it when present in the snapshot.
    pub fn select(&mut self, id: &str) -> Option<&Note> {
        self.interaction.select(&self.simulation, id)?;
        self.notes.iter().find(|note| note.id == id)
    }

    fn viewport_center(&self) -> Point {
        let (width, height) = self.simulation.viewport_size();
        Point::new(width / 2.0, height / 2.0)
    }
}

/// Store-backed note service wired to a graph session.
pub struct GraphWorkspace<S: NoteStore> {
    notes: NoteService<S>,
    graph: NoteGraph,
    source: SnapshotSource,
}

impl<S: NoteStore> GraphWorkspace<S> {
    /// Loads the store snapshot and builds the initial graph.
    pub fn open(store: S, config: GraphConfig, width: f64, height: f64) -> Self {
        let mut workspace = Self {
            notes: NoteService::new(store),
            graph: NoteGraph::new(config, width, height),
            source: SnapshotSource::LastKnown,
        };
        workspace.reload();
        workspace
    }

    pub fn graph(&self) -> &NoteGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut NoteGraph {
        &mut self.graph
    }

    /// Outcome of the most recent store load.
    pub fn snapshot_source(&self) -> SnapshotSource {
        self.source
    }

    pub fn notes(&self) -> &NoteService<S> {
        &self.notes
    }

    /// Direct service access; call `reload` afterwards to resync the graph.
    pub fn notes_mut(&mut self) -> &mut NoteService<S> {
        &mut self.notes
    }

    /// Reloads from the store (or keeps the last snapshot) and rebuilds.
    pub fn reload(&mut self) -> SnapshotSource {
        self.source = self.notes.refresh();
        self.graph.on_notes_changed(self.notes.snapshot().to_vec());
        self.source
    }

    /// Creates a note and rebuilds the graph.
    pub fn add_note(&mut self, input: NewNote) -> Result<Note, NoteServiceError> {
        let note = self.notes.create_note(input)?;
        self.graph.on_notes_changed(self.notes.snapshot().to_vec());
        Ok(note)
    }

    /// Imports a note with an existing id and rebuilds the graph.
    pub fn import_note(&mut self, note: Note) -> Result<Note, NoteServiceError> {
        let note = self.notes.import_note(note)?;
        self.graph.on_notes_changed(self.notes.snapshot().to_vec());
        Ok(note)
    }

    /// Deletes a note and rebuilds the graph. Returns whether it existed.
    pub fn delete_note(&mut self, id: &str) -> Result<bool, NoteServiceError> {
        let found = self.notes.delete_note(id)?;
        if found {
            self.graph.on_notes_changed(self.notes.snapshot().to_vec());
        }
        Ok(found)
    }
}
