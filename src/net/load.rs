use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::graph::StateNetwork;
use super::parse::{Partition, parse_network, parse_tree};

/// Everything the app needs from disk: the connected graph plus the optional
/// hierarchical partition.
#[derive(Clone, Debug)]
pub struct NetworkBundle {
    pub network: StateNetwork,
    pub partition: Option<Partition>,
}

/// Default partition filename: the network filename with its extension
/// replaced by `_states.tree`.
pub fn default_tree_name(net_name: &str) -> String {
    let stem = match net_name.rfind('.') {
        Some(index) => &net_name[..index],
        None => net_name,
    };
    format!("{stem}_states.tree")
}

/// Reads and connects the network file, then the partition file. A missing or
/// unreadable network file is fatal; a missing partition is not, the layout
/// just proceeds without hierarchical coloring or codelength.
pub fn load_bundle(net_path: &str, tree_path: &str) -> Result<NetworkBundle> {
    let net_text = fs::read_to_string(net_path)
        .with_context(|| format!("failed to read network file {net_path}"))?;
    let network = StateNetwork::connect(&parse_network(&net_text))
        .with_context(|| format!("invalid state network in {net_path}"))?;

    let partition = match fs::read_to_string(tree_path) {
        Ok(text) => Some(parse_tree(&text)),
        Err(error) => {
            warn!(tree_path, %error, "no partition file; proceeding without coloring");
            None
        }
    };

    info!(
        nodes = network.nodes.len(),
        states = network.states.len(),
        links = network.links.len(),
        partition = partition.is_some(),
        "loaded state network"
    );

    Ok(NetworkBundle { network, partition })
}
