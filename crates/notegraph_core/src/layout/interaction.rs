//! Pointer and viewport interaction on top of a running simulation.
//!
//! # Responsibility
//! - Translate pan, zoom, drag and selection gestures into viewport
//!   transform changes and simulation pin/position updates.
//!
//! # Invariants
//! - The controller never changes graph topology.
//! - While a node drag is active, that node is the simulation's pin.
//! - Scale always stays inside the configured range.

use crate::config::InteractionConfig;
use crate::layout::geometry::Point;
use crate::layout::simulation::{SimNode, Simulation};
use crate::layout::viewport::ViewportTransform;
use crate::model::note::NoteId;
use log::debug;

/// What a pointer-down landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Canvas,
    Node(NoteId),
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Panning { last: Point },
    /// `grab` is the node position minus the pointer, in sim space.
    Dragging { id: NoteId, grab: Point },
}

/// Viewport and gesture state for one hosted graph view.
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: InteractionConfig,
    transform: ViewportTransform,
    gesture: Gesture,
    selected: Option<NoteId>,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            transform: ViewportTransform::IDENTITY,
            gesture: Gesture::Idle,
            selected: None,
        }
    }

    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Id of the node being dragged, if any.
    pub fn dragging(&self) -> Option<&str> {
        match &self.gesture {
            Gesture::Dragging { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// Maps a client point into simulation space.
    pub fn to_sim(&self, client: Point) -> Point {
        self.transform.to_sim(client)
    }

    /// Finds the closest node within the hit radius of a client point.
    pub fn node_at(&self, sim: &Simulation, client: Point) -> Option<NoteId> {
        let target = self.to_sim(client);
        sim.nodes()
            .iter()
            .map(|node| (node.position.distance(target), node))
            .filter(|(distance, _)| *distance <= self.config.node_radius)
            .min_by(|(left, _), (right, _)| left.total_cmp(right))
            .map(|(_, node)| node.id.clone())
    }

    /// Starts a node drag or a canvas pan depending on what is hit.
    pub fn pointer_down(&mut self, sim: &mut Simulation, client: Point) -> PointerTarget {
        self.finish_gesture(sim);
        match self.node_at(sim, client) {
            Some(id) => {
                let grab = sim
                    .position(&id)
                    .map_or(Point::ZERO, |position| position - self.to_sim(client));
                sim.pin(&id);
                self.selected = Some(id.clone());
                debug!("event=drag_start module=interaction status=ok node={id}");
                self.gesture = Gesture::Dragging {
                    id: id.clone(),
                    grab,
                };
                PointerTarget::Node(id)
            }
            None => {
                self.gesture = Gesture::Panning { last: client };
                PointerTarget::Canvas
            }
        }
    }

    /// Continues the active gesture.
    pub fn pointer_move(&mut self, sim: &mut Simulation, client: Point) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                let delta = client - *last;
                *last = client;
                self.transform.pan_by(delta);
            }
            Gesture::Dragging { id, grab } => {
                let position = self.transform.to_sim(client) + *grab;
                if !sim.set_position(id, position) {
                    // node vanished mid-drag
                    self.gesture = Gesture::Idle;
                }
            }
        }
    }

    /// Ends the active gesture; a released node is unpinned and reheated.
    pub fn pointer_up(&mut self, sim: &mut Simulation) {
        self.finish_gesture(sim);
    }

    /// Zooms by a wheel delta, keeping the point under the cursor fixed.
    ///
    /// Non-finite deltas are ignored.
    pub fn wheel(&mut self, client: Point, delta_y: f64) {
        if !delta_y.is_finite() {
            return;
        }
        let factor = (-delta_y * self.config.wheel_sensitivity).exp();
        self.zoom_to(client, self.transform.scale * factor);
    }

    /// Programmatic zoom in by one step around `anchor`.
    pub fn zoom_in(&mut self, anchor: Point) {
        self.zoom_to(anchor, self.transform.scale * self.config.zoom_step);
    }

    /// Programmatic zoom out by one step around `anchor`.
    pub fn zoom_out(&mut self, anchor: Point) {
        self.zoom_to(anchor, self.transform.scale / self.config.zoom_step);
    }

    /// Restores the identity transform.
    pub fn reset_view(&mut self) {
        self.transform = ViewportTransform::IDENTITY;
    }

    /// Marks a node as selected. Has no effect on the simulation.
    pub fn select<'a>(&mut self, sim: &'a Simulation, id: &str) -> Option<&'a SimNode> {
        let node = sim.node(id);
        self.selected = node.map(|node| node.id.clone());
        node
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn zoom_to(&mut self, anchor: Point, scale: f64) {
        if !scale.is_finite() {
            return;
        }
        let clamped = scale.clamp(self.config.min_scale, self.config.max_scale);
        self.transform.zoom_at(anchor, clamped);
    }

    fn finish_gesture(&mut self, sim: &mut Simulation) {
        if let Gesture::Dragging { id, .. } = std::mem::replace(&mut self.gesture, Gesture::Idle) {
            if sim.pinned() == Some(id.as_str()) {
                sim.unpin();
            }
            debug!("event=drag_end module=interaction status=ok node={id}");
        }
    }
}
