use std::collections::VecDeque;

use eframe::egui::Color32;

use crate::net::StateNetwork;

pub(super) const DEFAULT_STROKE: Color32 = Color32::BLACK;
pub(super) const HOVER_STROKE: Color32 = Color32::from_rgb(0xd0, 0x20, 0x20);

/// Recolors the border of `start` and, transitively along outgoing links,
/// every downstream link and target state. A state whose border already
/// matches the target color is not revisited, which both makes the walk
/// idempotent and terminates it on cycles. Running the same walk with the
/// default color reverses a previous highlight. Topology and positions are
/// never touched.
pub(super) fn propagate(
    network: &StateNetwork,
    start: usize,
    color: Color32,
    state_stroke: &mut [Color32],
    link_stroke: &mut [Color32],
) {
    let mut queue = VecDeque::from([start]);

    while let Some(index) = queue.pop_front() {
        if state_stroke[index] == color {
            continue;
        }
        state_stroke[index] = color;

        for &link_index in &network.states[index].outgoing {
            link_stroke[link_index] = color;
            queue.push_back(network.links[link_index].target);
        }
    }
}
