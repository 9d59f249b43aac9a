use eframe::egui::{self, CursorIcon, PointerButton, Sense, Ui};

use super::interaction::{hit_test, screen_to_world};
use super::render::{paint_background, paint_bubbles, paint_message};
use super::{BubbleChart, BubbleChartProps, BubbleClick, CANVAS_SIZE};

impl BubbleChart {
    /// Lays out, paints and handles input for one frame.
    pub fn show(&mut self, ui: &mut Ui, mut props: BubbleChartProps<'_>) -> egui::Response {
        self.sync(props.data, props.sort_key, props.needs_redraw);

        let (rect, response) = ui.allocate_exact_size(CANVAS_SIZE, Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        paint_background(&painter, rect);

        if let Some(error) = &self.error {
            paint_message(&painter, rect, &error.to_string());
            return response;
        }

        let Some(state) = self.state.as_mut() else {
            return response;
        };

        state.handle_drag(ui, rect, &response);
        let dragging = state.simulation.is_dragging();
        let hovered = state.hovered_index(ui, rect).is_some();

        let mut pending_click = None;
        if response.clicked_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
            && let Some(index) = hit_test(state.simulation.nodes(), screen_to_world(rect, pointer))
        {
            pending_click = Some(BubbleClick { index, pointer });
        }

        if self.step() || dragging {
            ui.ctx().request_repaint();
        }

        if dragging || hovered {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }

        if let Some(state) = &self.state {
            paint_bubbles(&painter, rect, &state.elements, state.simulation.nodes());
        }

        if let Some(click) = pending_click {
            self.click(click, &mut props);
        }

        response
    }
}
