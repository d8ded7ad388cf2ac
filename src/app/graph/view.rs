use eframe::egui::{self, Align2, Color32, Context, FontId, Pos2, Sense, Stroke, Ui, vec2};

use crate::util::format_entropy;

use super::super::ViewModel;
use super::super::layout::{NODE_RADIUS, STATE_RADIUS};
use super::super::render_utils::{
    circle_visible, draw_arrow, draw_background, screen_to_world, world_to_screen,
};

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect);
        self.handle_zoom(ui, rect, &response);
        self.handle_pan(&response);

        // Both simulations are driven from this single frame tick. The state
        // step reads the physical positions the step just produced, so the
        // radial centers are refreshed before states move; positions are
        // published to the painter only after both have advanced.
        let physical_moving = self.physical.advance();
        let ViewModel {
            physical, states, ..
        } = self;
        let state_moving = states.advance(&|owner| physical.position(owner));

        let pointer_world = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .map(|pointer| screen_to_world(rect, self.pan, self.zoom, pointer));

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.begin_drag(screen_to_world(rect, self.pan, self.zoom, pointer));
        }
        if response.dragged_by(egui::PointerButton::Primary) && self.drag.is_some() {
            self.drag_by(response.drag_delta() / self.zoom);
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.end_drag();
        }

        let hovered = if self.drag.is_none() {
            pointer_world.and_then(|world| self.state_at(world))
        } else {
            None
        };
        self.update_hover(hovered);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if physical_moving || state_moving || response.dragged() {
            ui.ctx().request_repaint();
        }

        self.paint(&painter, rect);
    }

    fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        let zoom = self.zoom;
        let node_radius = NODE_RADIUS * zoom;
        let state_radius = STATE_RADIUS * zoom;

        let node_screen: Vec<Pos2> = self
            .physical
            .bodies
            .iter()
            .map(|body| world_to_screen(rect, self.pan, zoom, body.pos))
            .collect();
        let state_screen: Vec<Pos2> = self
            .states
            .bodies
            .iter()
            .map(|body| world_to_screen(rect, self.pan, zoom, body.pos))
            .collect();

        // physical nodes underneath, then links, then states on top
        for (index, node) in self.bundle.network.nodes.iter().enumerate() {
            let position = node_screen[index];
            if !circle_visible(rect, position, node_radius) {
                continue;
            }
            painter.circle(
                position,
                node_radius,
                Color32::from_rgb(0xfa, 0xfa, 0xfa),
                Stroke::new(1.0, Color32::from_rgb(0x88, 0x88, 0x88)),
            );
            painter.text(
                position,
                Align2::CENTER_CENTER,
                &node.name,
                FontId::proportional((23.0 * zoom).clamp(6.0, 46.0)),
                Color32::from_rgb(0x99, 0x99, 0x99),
            );
        }

        for (index, link) in self.bundle.network.links.iter().enumerate() {
            let from = state_screen[link.source];
            let to = state_screen[link.target];
            draw_arrow(
                painter,
                from,
                to,
                state_radius,
                (link.weight as f32 * zoom).clamp(0.3, 12.0),
                self.link_stroke[index],
            );
        }

        for (index, state) in self.bundle.network.states.iter().enumerate() {
            let position = state_screen[index];
            if !circle_visible(rect, position, state_radius) {
                continue;
            }
            let fill = self.state_fill[index];
            painter.circle(
                position,
                state_radius,
                Color32::from_rgba_unmultiplied(fill.r(), fill.g(), fill.b(), 178),
                Stroke::new((1.2 * zoom).clamp(0.6, 3.0), self.state_stroke[index]),
            );
            painter.text(
                position,
                Align2::CENTER_CENTER,
                state.id.to_string(),
                FontId::proportional((15.0 * zoom).clamp(5.0, 30.0)),
                Color32::BLACK,
            );
        }

        painter.text(
            rect.left_top() + vec2(5.0, 14.0),
            Align2::LEFT_CENTER,
            format!("Entropy rate: {}", format_entropy(self.entropy_rate)),
            FontId::proportional(14.0),
            Color32::from_rgb(0x44, 0x44, 0x44),
        );
        if let Some(partition) = &self.bundle.partition
            && let Some(codelength) = partition.codelength
        {
            painter.text(
                rect.left_top() + vec2(5.0, 32.0),
                Align2::LEFT_CENTER,
                format!("Codelength: {codelength}"),
                FontId::proportional(14.0),
                Color32::from_rgb(0x44, 0x44, 0x44),
            );
        }
    }
}
