use super::graph::StateNetwork;

fn plogp(p: f64) -> f64 {
    if p > 0.0 { p * p.log2() } else { 0.0 }
}

fn entropy(distribution: impl Iterator<Item = f64>) -> f64 {
    -distribution.map(plogp).sum::<f64>()
}

/// Entropy rate of the state-level transition structure: the Shannon entropy
/// of each state's outgoing distribution, weighted by the state's total
/// outgoing weight and normalized by the total link weight. A network with no
/// link weight returns 0 by convention.
pub fn entropy_rate(network: &StateNetwork) -> f64 {
    let mut total_weight = 0.0;
    let mut weighted_entropy = 0.0;

    for state in &network.states {
        let weights = || {
            state
                .outgoing
                .iter()
                .map(|&index| network.links[index].weight)
        };
        let out_weight: f64 = weights().sum();
        total_weight += out_weight;
        if out_weight <= 0.0 {
            continue;
        }

        // A distribution that already sums to 1 is used as-is.
        let state_entropy = if (out_weight - 1.0).abs() < 1e-6 {
            entropy(weights())
        } else {
            entropy(weights().map(|weight| weight / out_weight))
        };
        weighted_entropy += state_entropy * out_weight;
    }

    if total_weight <= 0.0 {
        return 0.0;
    }
    weighted_entropy / total_weight
}

#[cfg(test)]
mod tests {
    use super::super::graph::StateNetwork;
    use super::super::parse::parse_network;
    use super::*;

    fn network_from(text: &str) -> StateNetwork {
        StateNetwork::connect(&parse_network(text)).expect("valid network")
    }

    /// Ring of `count` states on one physical node, each with `fanout`
    /// equally-weighted outgoing links of weight `weight`.
    fn uniform_network(count: u32, fanout: u32, weight: f64) -> StateNetwork {
        let mut text = String::from("*Vertices\n1 \"n\"\n*States\n");
        for id in 0..count {
            text.push_str(&format!("{id} 1 \"s{id}\"\n"));
        }
        text.push_str("*Links\n");
        for id in 0..count {
            for step in 1..=fanout {
                let target = (id + step) % count;
                text.push_str(&format!("{id} {target} {weight}\n"));
            }
        }
        network_from(&text)
    }

    #[test]
    fn deterministic_transitions_have_zero_entropy() {
        for weight in [0.1, 1.0, 42.0] {
            let network = uniform_network(4, 1, weight);
            assert!(entropy_rate(&network).abs() < 1e-12);
        }
    }

    #[test]
    fn uniform_fanout_yields_log2_k() {
        for k in [1u32, 2, 4] {
            let network = uniform_network(8, k, 0.7);
            let expected = (k as f64).log2();
            assert!((entropy_rate(&network) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn no_links_yields_zero_not_nan() {
        let network = network_from("*Vertices\n1 \"n\"\n*States\n0 1 \"s\"\n");
        let rate = entropy_rate(&network);
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn zero_weight_state_does_not_divide_by_zero() {
        let network = network_from(
            "*Vertices\n1 \"n\"\n*States\n0 1 \"a\"\n1 1 \"b\"\n*Links\n0 1 0.0\n1 0 0.5\n1 1 0.5\n",
        );
        let rate = entropy_rate(&network);
        assert!(rate.is_finite());
        // only state b contributes: H = 1 bit over total weight 1
        assert!((rate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn already_normalized_distributions_are_used_as_is() {
        let network = network_from(
            "*Vertices\n1 \"n\"\n*States\n0 1 \"a\"\n1 1 \"b\"\n*Links\n0 0 0.5\n0 1 0.5\n",
        );
        assert!((entropy_rate(&network) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn states_are_weighted_by_outgoing_weight() {
        // state a: 2 uniform links, total weight 2 -> H = 1
        // state b: 1 link, total weight 2 -> H = 0
        // rate = (1*2 + 0*2) / 4 = 0.5
        let network = network_from(
            "*Vertices\n1 \"n\"\n*States\n0 1 \"a\"\n1 1 \"b\"\n*Links\n0 0 1.0\n0 1 1.0\n1 0 2.0\n",
        );
        assert!((entropy_rate(&network) - 0.5).abs() < 1e-9);
    }
}
