use eframe::egui::Vec2;

use crate::net::{NetworkBundle, entropy_rate};

use super::super::colors::StatePalette;
use super::super::highlight::DEFAULT_STROKE;
use super::super::layout::{PhysicalLayout, StateLayout};
use super::super::ViewModel;

impl ViewModel {
    /// Builds the two simulations and the derived presentation state from a
    /// freshly loaded bundle. Topology is frozen from here on; only positions
    /// and stroke colors mutate.
    pub(in crate::app) fn new(bundle: NetworkBundle) -> Self {
        let aggregated = bundle.network.aggregate_physical_links();
        let physical = PhysicalLayout::new(&bundle.network, &aggregated);
        let states = StateLayout::new(&bundle.network);

        let palette = match &bundle.partition {
            Some(partition) => StatePalette::from_partition(partition),
            None => StatePalette::empty(),
        };
        let state_fill = bundle
            .network
            .states
            .iter()
            .map(|state| palette.fill_for(state.id))
            .collect();
        let state_stroke = vec![DEFAULT_STROKE; bundle.network.states.len()];
        let link_stroke = vec![DEFAULT_STROKE; bundle.network.links.len()];
        let entropy_rate = entropy_rate(&bundle.network);

        Self {
            bundle,
            entropy_rate,
            physical,
            states,
            state_fill,
            state_stroke,
            link_stroke,
            hovered_state: None,
            drag: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}
