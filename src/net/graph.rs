use std::collections::HashMap;
use std::collections::hash_map::Entry;

use thiserror::Error;

use super::parse::RawNetwork;

/// Fatal id-resolution failures. The graph invariants must hold before any
/// layout is built, so these abort the current load instead of degrading to a
/// partial graph.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("state node {state_id} references missing physical node {physical_id}")]
    MissingPhysicalNode { state_id: u32, physical_id: u32 },
    #[error("link {source_id} -> {target_id} references missing state node {missing_id}")]
    DanglingLinkEndpoint {
        source_id: u32,
        target_id: u32,
        missing_id: u32,
    },
}

#[derive(Clone, Debug)]
pub struct PhysicalNode {
    pub id: u32,
    pub name: String,
    /// Indices into `StateNetwork::states`, in input order.
    pub states: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct StateNode {
    pub id: u32,
    pub name: String,
    /// Index of the owning physical node; never changes after construction.
    pub owner: usize,
    /// Indices into `StateNetwork::links` for which this state is the source.
    /// Built incrementally while links are attached.
    pub outgoing: Vec<usize>,
}

#[derive(Clone, Copy, Debug)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// One physical-level link per distinct (owner, owner) pair, weight summed
/// over all state-level links between the two. Parallel state-level links are
/// kept as-is; aggregation happens only here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregatedLink {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

#[derive(Clone, Debug, Default)]
pub struct StateNetwork {
    pub nodes: Vec<PhysicalNode>,
    pub states: Vec<StateNode>,
    pub links: Vec<Link>,
}

impl StateNetwork {
    /// Resolves textual ids into the connected graph. Two passes: physical
    /// nodes are indexed first, then states resolve against that index, then
    /// links resolve against the state index.
    pub fn connect(raw: &RawNetwork) -> Result<Self, GraphError> {
        let mut network = StateNetwork {
            nodes: Vec::with_capacity(raw.vertices.len()),
            states: Vec::with_capacity(raw.states.len()),
            links: Vec::with_capacity(raw.links.len()),
        };

        let mut node_index: HashMap<u32, usize> = HashMap::with_capacity(raw.vertices.len());
        for vertex in &raw.vertices {
            node_index.insert(vertex.id, network.nodes.len());
            network.nodes.push(PhysicalNode {
                id: vertex.id,
                name: vertex.name.clone(),
                states: Vec::new(),
            });
        }

        let mut state_index: HashMap<u32, usize> = HashMap::with_capacity(raw.states.len());
        for state in &raw.states {
            let owner = *node_index.get(&state.physical_id).ok_or(
                GraphError::MissingPhysicalNode {
                    state_id: state.id,
                    physical_id: state.physical_id,
                },
            )?;

            let index = network.states.len();
            network.nodes[owner].states.push(index);
            state_index.insert(state.id, index);
            network.states.push(StateNode {
                id: state.id,
                name: state.name.clone(),
                owner,
                outgoing: Vec::new(),
            });
        }

        for link in &raw.links {
            let resolve = |id: u32| {
                state_index
                    .get(&id)
                    .copied()
                    .ok_or(GraphError::DanglingLinkEndpoint {
                        source_id: link.source,
                        target_id: link.target,
                        missing_id: id,
                    })
            };
            let source = resolve(link.source)?;
            let target = resolve(link.target)?;

            let index = network.links.len();
            network.states[source].outgoing.push(index);
            network.links.push(Link {
                source,
                target,
                weight: link.weight,
            });
        }

        Ok(network)
    }

    /// Groups state-level links by owner pair, summing weights. Output order
    /// is first-seen order of each pair, so it is deterministic for a fixed
    /// input order.
    pub fn aggregate_physical_links(&self) -> Vec<AggregatedLink> {
        let mut by_pair: HashMap<(usize, usize), usize> = HashMap::new();
        let mut aggregated = Vec::new();

        for link in &self.links {
            let pair = (self.states[link.source].owner, self.states[link.target].owner);
            match by_pair.entry(pair) {
                Entry::Occupied(entry) => {
                    let slot: &mut AggregatedLink = &mut aggregated[*entry.get()];
                    slot.weight += link.weight;
                }
                Entry::Vacant(entry) => {
                    entry.insert(aggregated.len());
                    aggregated.push(AggregatedLink {
                        source: pair.0,
                        target: pair.1,
                        weight: link.weight,
                    });
                }
            }
        }

        aggregated
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse::parse_network;
    use super::*;

    fn two_node_network() -> StateNetwork {
        let raw = parse_network(
            "*Vertices\n1 \"a\"\n2 \"b\"\n*States\n10 1 \"a1\"\n11 1 \"a2\"\n20 2 \"b1\"\n*Links\n10 20 0.5\n11 20 1.5\n20 10 2.0\n10 11 0.25\n",
        );
        StateNetwork::connect(&raw).expect("valid network")
    }

    #[test]
    fn connect_resolves_every_reference() {
        let network = two_node_network();
        assert_eq!(network.nodes.len(), 2);
        assert_eq!(network.states.len(), 3);
        assert_eq!(network.links.len(), 4);

        for state in &network.states {
            assert!(state.owner < network.nodes.len());
            assert!(network.nodes[state.owner].states.contains(
                &network
                    .states
                    .iter()
                    .position(|other| other.id == state.id)
                    .unwrap()
            ));
        }
        for link in &network.links {
            assert!(link.source < network.states.len());
            assert!(link.target < network.states.len());
        }
    }

    #[test]
    fn outgoing_lists_match_link_sources() {
        let network = two_node_network();
        for (index, link) in network.links.iter().enumerate() {
            assert!(network.states[link.source].outgoing.contains(&index));
        }
        // state 10 has two outgoing links, state 11 one, state 20 one
        assert_eq!(network.states[0].outgoing.len(), 2);
        assert_eq!(network.states[1].outgoing.len(), 1);
        assert_eq!(network.states[2].outgoing.len(), 1);
    }

    #[test]
    fn missing_physical_node_is_fatal() {
        let raw = parse_network("*Vertices\n1 \"a\"\n*States\n10 9 \"ghost\"\n");
        assert_eq!(
            StateNetwork::connect(&raw).unwrap_err(),
            GraphError::MissingPhysicalNode {
                state_id: 10,
                physical_id: 9
            }
        );
    }

    #[test]
    fn dangling_link_endpoint_is_fatal() {
        let raw =
            parse_network("*Vertices\n1 \"a\"\n*States\n10 1 \"a1\"\n*Links\n10 99 1.0\n");
        assert_eq!(
            StateNetwork::connect(&raw).unwrap_err(),
            GraphError::DanglingLinkEndpoint {
                source_id: 10,
                target_id: 99,
                missing_id: 99
            }
        );
    }

    #[test]
    fn aggregation_preserves_total_weight() {
        let network = two_node_network();
        let aggregated = network.aggregate_physical_links();

        let input_total: f64 = network.links.iter().map(|link| link.weight).sum();
        let aggregated_total: f64 = aggregated.iter().map(|link| link.weight).sum();
        assert!((input_total - aggregated_total).abs() < 1e-12);

        // (a,b), (b,a) and (a,a) pairs, in first-seen order
        assert_eq!(aggregated.len(), 3);
        assert_eq!(aggregated[0], AggregatedLink { source: 0, target: 1, weight: 2.0 });
        assert_eq!(aggregated[1], AggregatedLink { source: 1, target: 0, weight: 2.0 });
        assert_eq!(aggregated[2], AggregatedLink { source: 0, target: 0, weight: 0.25 });
    }

    #[test]
    fn parallel_state_links_are_not_deduplicated() {
        let raw = parse_network(
            "*Vertices\n1 \"a\"\n2 \"b\"\n*States\n10 1 \"a1\"\n20 2 \"b1\"\n*Links\n10 20 1.0\n10 20 1.0\n",
        );
        let network = StateNetwork::connect(&raw).unwrap();
        assert_eq!(network.links.len(), 2);

        let aggregated = network.aggregate_physical_links();
        assert_eq!(aggregated.len(), 1);
        assert!((aggregated[0].weight - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let network = StateNetwork::connect(&RawNetwork::default()).unwrap();
        assert!(network.nodes.is_empty());
        assert!(network.states.is_empty());
        assert!(network.links.is_empty());
        assert!(network.aggregate_physical_links().is_empty());
    }
}
