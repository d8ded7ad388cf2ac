use eframe::egui::{self, Rect, Ui, Vec2};

use super::super::layout::{NODE_RADIUS, STATE_RADIUS};
use super::super::{DragTarget, ViewModel, highlight};

impl ViewModel {
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before =
            super::super::render_utils::screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 6.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Nearest state circle under `world`, states being the topmost layer.
    pub(in crate::app) fn state_at(&self, world: Vec2) -> Option<usize> {
        self.states
            .bodies
            .iter()
            .enumerate()
            .filter_map(|(index, body)| {
                let distance = (body.pos - world).length();
                (distance <= STATE_RADIUS).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn node_at(&self, world: Vec2) -> Option<usize> {
        self.physical
            .bodies
            .iter()
            .enumerate()
            .filter_map(|(index, body)| {
                let distance = (body.pos - world).length();
                (distance <= NODE_RADIUS).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Hover transition: reverse the previous highlight walk, then run the
    /// new one. Both walks only touch stroke colors.
    pub(in crate::app) fn update_hover(&mut self, hovered: Option<usize>) {
        if hovered == self.hovered_state {
            return;
        }

        if let Some(previous) = self.hovered_state {
            highlight::propagate(
                &self.bundle.network,
                previous,
                highlight::DEFAULT_STROKE,
                &mut self.state_stroke,
                &mut self.link_stroke,
            );
        }
        if let Some(next) = hovered {
            highlight::propagate(
                &self.bundle.network,
                next,
                highlight::HOVER_STROKE,
                &mut self.state_stroke,
                &mut self.link_stroke,
            );
        }
        self.hovered_state = hovered;
    }

    /// Starts a drag at `world`. A state hit pins just that state and barely
    /// re-heats the physical layout; a node hit pins the node plus all its
    /// states so they move rigidly, and re-heats both layouts.
    pub(in crate::app) fn begin_drag(&mut self, world: Vec2) {
        if let Some(state) = self.state_at(world) {
            self.drag = Some(DragTarget::State(state));
            self.states.bodies[state].pinned = Some(self.states.bodies[state].pos);
            self.physical.reheat(0.01);
            self.states.reheat(0.5);
        } else if let Some(node) = self.node_at(world) {
            self.drag = Some(DragTarget::Node(node));
            self.physical.bodies[node].pinned = Some(self.physical.bodies[node].pos);
            for &state in &self.bundle.network.nodes[node].states {
                self.states.bodies[state].pinned = Some(self.states.bodies[state].pos);
            }
            self.physical.reheat(0.3);
            self.states.reheat(0.8);
        }
    }

    /// Applies one pointer delta (world units) to every pinned position of
    /// the current drag target.
    pub(in crate::app) fn drag_by(&mut self, delta: Vec2) {
        match self.drag {
            Some(DragTarget::Node(node)) => {
                if let Some(pin) = &mut self.physical.bodies[node].pinned {
                    *pin += delta;
                }
                for &state in &self.bundle.network.nodes[node].states {
                    if let Some(pin) = &mut self.states.bodies[state].pinned {
                        *pin += delta;
                    }
                }
            }
            Some(DragTarget::State(state)) => {
                if let Some(pin) = &mut self.states.bodies[state].pinned {
                    *pin += delta;
                }
            }
            None => {}
        }
    }

    /// Clears all pins and lets both simulations decay back to rest.
    pub(in crate::app) fn end_drag(&mut self) {
        match self.drag.take() {
            Some(DragTarget::Node(node)) => {
                self.physical.bodies[node].pinned = None;
                for &state in &self.bundle.network.nodes[node].states {
                    self.states.bodies[state].pinned = None;
                }
            }
            Some(DragTarget::State(state)) => {
                self.states.bodies[state].pinned = None;
            }
            None => return,
        }
        self.physical.reheat(0.0);
        self.states.reheat(0.0);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, vec2};

    use crate::net::parse::parse_network;
    use crate::net::{NetworkBundle, StateNetwork};

    use super::super::super::{DragTarget, ViewModel};

    fn model() -> ViewModel {
        let raw = parse_network(
            "*Vertices\n1 \"a\"\n2 \"b\"\n*States\n10 1 \"a1\"\n11 1 \"a2\"\n20 2 \"b1\"\n*Links\n10 20 1.0\n",
        );
        let mut model = ViewModel::new(NetworkBundle {
            network: StateNetwork::connect(&raw).unwrap(),
            partition: None,
        });
        // spread entities out so hit tests are unambiguous
        model.physical.bodies[0].pos = vec2(0.0, 0.0);
        model.physical.bodies[1].pos = vec2(400.0, 0.0);
        model.states.bodies[0].pos = vec2(30.0, 20.0);
        model.states.bodies[1].pos = vec2(-25.0, -10.0);
        model.states.bodies[2].pos = vec2(420.0, 15.0);
        model
    }

    #[test]
    fn node_drag_moves_owned_states_rigidly() {
        let mut model = model();
        let node_pos = model.physical.bodies[0].pos;
        model.begin_drag(node_pos);
        assert_eq!(model.drag, Some(DragTarget::Node(0)));

        let offsets_at_start: Vec<Vec2> = model.bundle.network.nodes[0]
            .states
            .iter()
            .map(|&state| model.states.bodies[state].pinned.unwrap() - node_pos)
            .collect();

        let delta = vec2(37.0, -12.5);
        model.drag_by(delta);
        model.drag_by(delta);

        let node_pin = model.physical.bodies[0].pinned.unwrap();
        assert!((node_pin - (node_pos + delta * 2.0)).length() < 1e-4);

        for (&state, offset) in model.bundle.network.nodes[0]
            .states
            .iter()
            .zip(&offsets_at_start)
        {
            let pin = model.states.bodies[state].pinned.unwrap();
            assert!(((pin - node_pin) - *offset).length() < 1e-4);
        }
    }

    #[test]
    fn state_drag_pins_only_that_state() {
        let mut model = model();
        let state_pos = model.states.bodies[2].pos;
        model.begin_drag(state_pos);
        assert_eq!(model.drag, Some(DragTarget::State(2)));

        assert!(model.states.bodies[2].pinned.is_some());
        assert!(model.states.bodies[0].pinned.is_none());
        assert!(model.physical.bodies.iter().all(|body| body.pinned.is_none()));
    }

    #[test]
    fn end_drag_clears_every_pin() {
        let mut model = model();
        model.begin_drag(model.physical.bodies[0].pos);
        model.drag_by(vec2(5.0, 5.0));
        model.end_drag();

        assert_eq!(model.drag, None);
        assert!(model.physical.bodies.iter().all(|body| body.pinned.is_none()));
        assert!(model.states.bodies.iter().all(|body| body.pinned.is_none()));
    }

    #[test]
    fn hover_and_unhover_walk_the_outgoing_links() {
        use super::super::super::highlight::{DEFAULT_STROKE, HOVER_STROKE};

        let mut model = model();
        model.update_hover(Some(0));
        assert_eq!(model.state_stroke[0], HOVER_STROKE);
        assert_eq!(model.state_stroke[2], HOVER_STROKE);
        assert_eq!(model.state_stroke[1], DEFAULT_STROKE);
        assert_eq!(model.link_stroke[0], HOVER_STROKE);

        model.update_hover(None);
        assert!(model.state_stroke.iter().all(|&s| s == DEFAULT_STROKE));
        assert!(model.link_stroke.iter().all(|&s| s == DEFAULT_STROKE));
    }
}
