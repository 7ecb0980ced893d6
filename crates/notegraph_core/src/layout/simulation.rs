//! Force-directed layout simulation.
//!
//! # Responsibility
//! - Own node positions/velocities, the current edge projection, the pin
//!   and the heat counter as one explicit context object.
//! - Advance the layout one fixed step at a time.
//!
//! # Invariants
//! - Node state is keyed by note id; ids that persist across `set_nodes`
//!   keep position and velocity.
//! - A pinned node is never moved by forces; only `set_position` moves it.
//! - Zero heat freezes the layout until a reheat.
//! - Speed is capped at `max_speed`, so one step moves an unpinned node by
//!   at most that distance.

use crate::config::SimulationConfig;
use crate::layout::geometry::Point;
use crate::model::connection::ConnectionSet;
use crate::model::note::NoteId;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Golden angle, used to spread coincident node pairs deterministically.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;
/// Distances below this are treated as coincident.
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Physical state of one note in the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SimNode {
    pub id: NoteId,
    pub position: Point,
    pub velocity: Point,
}

/// Spring between two nodes, weighted by connection strength.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEdge {
    pub source: NoteId,
    pub target: NoteId,
    pub strength: f64,
}

/// Projects a connection set onto simulation springs.
pub fn edges_from_connections(connections: &ConnectionSet) -> Vec<SimEdge> {
    connections
        .iter()
        .map(|conn| SimEdge {
            source: conn.source().to_string(),
            target: conn.target().to_string(),
            strength: conn.strength,
        })
        .collect()
}

/// Layout context: nodes, edges, pin and heat.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    width: f64,
    height: f64,
    nodes: Vec<SimNode>,
    index: HashMap<NoteId, usize>,
    edges: Vec<SimEdge>,
    pinned: Option<NoteId>,
    heat: u32,
    rng: StdRng,
    placed_since_resize: BTreeSet<NoteId>,
}

impl Simulation {
    /// Creates an empty, cold simulation for a viewport.
    pub fn new(config: SimulationConfig, width: f64, height: f64) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            width: width.max(0.0),
            height: height.max(0.0),
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            pinned: None,
            heat: 0,
            rng,
            placed_since_resize: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Viewport centre, the target of centering gravity.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SimEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.node(id).map(|node| node.position)
    }

    /// Snapshot of every node position, ordered by id.
    pub fn positions(&self) -> BTreeMap<NoteId, Point> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.position))
            .collect()
    }

    pub fn heat(&self) -> u32 {
        self.heat
    }

    pub fn is_active(&self) -> bool {
        self.heat > 0
    }

    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    /// Replaces the node set using identity-keyed upsert.
    ///
    /// Existing ids keep their state; new ids are placed on the circle;
    /// missing ids are dropped. Duplicate ids are collapsed. Resets heat.
    pub fn set_nodes(&mut self, ids: &[NoteId]) {
        let mut seen = BTreeSet::new();
        let ordered = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .collect::<Vec<_>>();
        let total = ordered.len();

        let mut previous = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect::<HashMap<_, _>>();
        let mut nodes = Vec::with_capacity(total);
        let mut added = 0usize;
        for (slot, id) in ordered.into_iter().enumerate() {
            match previous.remove(id) {
                Some(node) => nodes.push(node),
                None => {
                    let position = self.placement(slot, total);
                    self.placed_since_resize.insert(id.clone());
                    nodes.push(SimNode {
                        id: id.clone(),
                        position,
                        velocity: Point::ZERO,
                    });
                    added += 1;
                }
            }
        }
        let removed = previous.len();
        for id in previous.keys() {
            self.placed_since_resize.remove(id);
        }

        self.nodes = nodes;
        self.rebuild_index();
        if let Some(pinned) = self.pinned.as_deref() {
            if !self.index.contains_key(pinned) {
                self.pinned = None;
            }
        }

        debug!(
            "event=sim_set_nodes module=layout status=ok nodes={} added={} removed={}",
            self.nodes.len(),
            added,
            removed
        );
        self.restart();
    }

    /// Replaces the spring set and resets heat.
    ///
    /// Edges may reference ids that are not (or no longer) simulated; such
    /// edges are kept but skipped while stepping.
    pub fn set_edges(&mut self, edges: Vec<SimEdge>) {
        self.edges = edges;
        self.restart();
    }

    /// Applies a new node set and edge set in one reheat.
    pub fn set_graph(&mut self, ids: &[NoteId], edges: Vec<SimEdge>) {
        self.edges = edges;
        self.set_nodes(ids);
    }

    /// Updates viewport size and re-places nodes introduced since the last
    /// resize. Returns whether the size changed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let width = width.max(0.0);
        let height = height.max(0.0);
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;

        let total = self.nodes.len();
        let fresh = std::mem::take(&mut self.placed_since_resize);
        for slot in 0..total {
            let id = &self.nodes[slot].id;
            if !fresh.contains(id) || self.pinned.as_deref() == Some(id.as_str()) {
                continue;
            }
            let position = self.placement(slot, total);
            let node = &mut self.nodes[slot];
            node.position = position;
            node.velocity = Point::ZERO;
        }

        info!(
            "event=sim_resize module=layout status=ok width={} height={} replaced={}",
            width,
            height,
            fresh.len()
        );
        self.restart();
        true
    }

    /// Resets heat to its maximum.
    pub fn restart(&mut self) {
        self.heat = self.config.max_heat;
        debug!(
            "event=sim_reheat module=layout status=ok heat={} reason=restart",
            self.heat
        );
    }

    /// Raises heat to at least `heat` without cooling an already hot layout.
    pub fn reheat(&mut self, heat: u32) {
        let previous = self.heat;
        self.heat = self.heat.max(heat.min(self.config.max_heat));
        debug!(
            "event=sim_reheat module=layout status=ok heat={} previous={previous}",
            self.heat
        );
    }

    /// Pins a node so forces no longer move it. Replaces any previous pin.
    ///
    /// Returns `false` when the id is not simulated.
    pub fn pin(&mut self, id: &str) -> bool {
        let Some(&idx) = self.index.get(id) else {
            return false;
        };
        self.nodes[idx].velocity = Point::ZERO;
        self.pinned = Some(id.to_string());
        true
    }

    /// Releases the pin and partially reheats so neighbours settle.
    pub fn unpin(&mut self) -> Option<NoteId> {
        let released = self.pinned.take();
        if released.is_some() {
            self.reheat(self.config.release_heat);
        }
        released
    }

    /// Overwrites a node position from outside the physics (e.g. drag).
    pub fn set_position(&mut self, id: &str, position: Point) -> bool {
        let Some(&idx) = self.index.get(id) else {
            return false;
        };
        let node = &mut self.nodes[idx];
        node.position = position;
        node.velocity = Point::ZERO;
        true
    }

    /// Advances one step. Returns `false` when the layout is frozen.
    pub fn step(&mut self) -> bool {
        if self.heat == 0 {
            return false;
        }

        let pinned = self
            .pinned
            .as_deref()
            .and_then(|id| self.index.get(id).copied());
        self.apply_repulsion(pinned);
        self.apply_springs(pinned);
        self.apply_centering(pinned);
        self.integrate(pinned);

        self.heat -= 1;
        if self.heat == 0 {
            debug!(
                "event=sim_cooled module=layout status=ok nodes={}",
                self.nodes.len()
            );
        }
        true
    }

    /// Steps until cold or until `max_steps` have run. Returns steps taken.
    pub fn run(&mut self, max_steps: u32) -> u32 {
        let mut steps = 0;
        while steps < max_steps && self.step() {
            steps += 1;
        }
        steps
    }

    fn apply_repulsion(&mut self, pinned: Option<usize>) {
        let count = self.nodes.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let delta = self.nodes[i].position - self.nodes[j].position;
                let (direction, distance) =
                    separation(delta, i + j, self.config.min_distance);
                let push = direction * (self.config.repulsion / (distance * distance));
                if pinned != Some(i) {
                    self.nodes[i].velocity += push;
                }
                if pinned != Some(j) {
                    self.nodes[j].velocity -= push;
                }
            }
        }
    }

    fn apply_springs(&mut self, pinned: Option<usize>) {
        for edge in &self.edges {
            let (Some(&source), Some(&target)) =
                (self.index.get(&edge.source), self.index.get(&edge.target))
            else {
                continue;
            };
            if source == target {
                continue;
            }
            let delta = self.nodes[target].position - self.nodes[source].position;
            let (direction, distance) =
                separation(delta, source + target, self.config.min_distance);
            let displacement = distance - self.config.rest_length;
            let pull = direction * (self.config.spring_k * displacement * edge.strength);
            if pinned != Some(source) {
                self.nodes[source].velocity += pull;
            }
            if pinned != Some(target) {
                self.nodes[target].velocity -= pull;
            }
        }
    }

    fn apply_centering(&mut self, pinned: Option<usize>) {
        let center = self.center();
        let strength = self.config.centering;
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            if pinned == Some(idx) {
                continue;
            }
            node.velocity += (center - node.position) * strength;
        }
    }

    fn integrate(&mut self, pinned: Option<usize>) {
        let (min_x, max_x) = padded_range(self.width, self.config.padding);
        let (min_y, max_y) = padded_range(self.height, self.config.padding);
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            if pinned == Some(idx) {
                node.velocity = Point::ZERO;
                continue;
            }
            node.velocity =
                (node.velocity * self.config.damping).clamp_length(self.config.max_speed);
            node.position += node.velocity;
            node.position.x = node.position.x.clamp(min_x, max_x);
            node.position.y = node.position.y.clamp(min_y, max_y);
        }
    }

    fn placement(&mut self, slot: usize, total: usize) -> Point {
        let center = self.center();
        let radius = self.width.min(self.height) * self.config.placement_radius_ratio;
        let angle = std::f64::consts::TAU * slot as f64 / total.max(1) as f64;
        let jitter = self.config.jitter;
        let offset = Point::new(
            self.rng.gen_range(-jitter..=jitter),
            self.rng.gen_range(-jitter..=jitter),
        );
        center + Point::new(angle.cos(), angle.sin()) * radius + offset
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), idx))
            .collect();
    }
}

/// Unit direction and floored distance for a displacement vector.
///
/// Coincident points get a deterministic direction derived from `salt`.
fn separation(delta: Point, salt: usize, min_distance: f64) -> (Point, f64) {
    let length = delta.length();
    let direction = if length > COINCIDENT_EPSILON {
        delta / length
    } else {
        let angle = salt as f64 * GOLDEN_ANGLE;
        Point::new(angle.cos(), angle.sin())
    };
    (direction, length.max(min_distance))
}

fn padded_range(extent: f64, padding: f64) -> (f64, f64) {
    let low = padding;
    let high = extent - padding;
    if high < low {
        let mid = extent / 2.0;
        (mid, mid)
    } else {
        (low, high)
    }
}
