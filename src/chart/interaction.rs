use eframe::egui::{self, PointerButton, Pos2, Rect, Ui, Vec2};

use super::ChartState;
use super::simulation::Bubble;

#[derive(Clone, Copy, Debug)]
pub(super) struct ActiveDrag {
    index: usize,
    grab_offset: Vec2,
}

pub(super) fn world_to_screen(rect: Rect, world: Vec2) -> Pos2 {
    rect.center() + world
}

pub(super) fn screen_to_world(rect: Rect, screen: Pos2) -> Vec2 {
    screen - rect.center()
}

/// Closest bubble whose circle contains `world`.
pub(super) fn hit_test(nodes: &[Bubble], world: Vec2) -> Option<usize> {
    nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let distance = (node.position - world).length();
            (distance <= node.radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

impl ChartState {
    pub(super) fn handle_drag(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(origin) = origin {
                self.grab(screen_to_world(rect, origin));
            }
        }

        if response.dragged_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.drag_pointer_to(screen_to_world(rect, pointer));
        }

        if response.drag_stopped() {
            self.release();
        }
    }

    /// Pins the bubble under `world`, remembering where it was grabbed.
    fn grab(&mut self, world: Vec2) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(index) = hit_test(self.simulation.nodes(), world) else {
            return false;
        };
        if !self.simulation.drag_start(index) {
            return false;
        }

        let grab_offset = self.simulation.nodes()[index].position - world;
        self.drag = Some(ActiveDrag { index, grab_offset });
        true
    }

    fn drag_pointer_to(&mut self, world: Vec2) {
        if let Some(drag) = self.drag {
            self.simulation.drag_to(drag.index, world + drag.grab_offset);
        }
    }

    fn release(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.simulation.drag_end(drag.index);
        }
    }

    pub(super) fn hovered_index(&self, ui: &Ui, rect: Rect) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }
        hit_test(self.simulation.nodes(), screen_to_world(rect, pointer))
    }
}
