use eframe::egui::Vec2;
use tracing::trace;

use super::{Simulation, SimulationPhase};

impl Simulation {
    /// Pins bubble `index` where it currently is. The first concurrent drag
    /// reheats the layout so neighbours keep reacting while it moves.
    /// Returns false for unknown or already held bubbles.
    pub fn drag_start(&mut self, index: usize) -> bool {
        let Some(node) = self.nodes.get_mut(index) else {
            return false;
        };
        if node.pinned.is_some() {
            return false;
        }

        node.pinned = Some(node.position);
        node.velocity = Vec2::ZERO;

        if self.active_drags == 0 {
            self.alpha_target = self.config.drag_alpha_target;
        }
        self.active_drags += 1;
        self.phase = SimulationPhase::Dragging;
        trace!(index, active_drags = self.active_drags, "drag started");
        true
    }

    pub fn drag_to(&mut self, index: usize, target: Vec2) {
        let Some(node) = self.nodes.get_mut(index) else {
            return;
        };
        if node.pinned.is_none() {
            return;
        }

        node.pinned = Some(target);
        node.position = target;
        node.velocity = Vec2::ZERO;
    }

    pub fn drag_end(&mut self, index: usize) {
        let Some(node) = self.nodes.get_mut(index) else {
            return;
        };
        if node.pinned.take().is_none() {
            return;
        }

        self.active_drags = self.active_drags.saturating_sub(1);
        if self.active_drags == 0 {
            self.alpha_target = 0.0;
            self.phase = SimulationPhase::Running;
        }
        trace!(index, active_drags = self.active_drags, "drag ended");
    }

    pub fn is_dragging(&self) -> bool {
        self.active_drags > 0
    }
}
