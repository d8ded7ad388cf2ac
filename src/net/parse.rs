use tracing::debug;

/// Section selector for the line-oriented network format. An unrecognized
/// `*Header` deactivates parsing so that following lines are ignored instead
/// of being misparsed under the previous section's grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Inactive,
    Vertices,
    States,
    Links,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawVertex {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawState {
    pub id: u32,
    pub physical_id: u32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawLink {
    pub source: u32,
    pub target: u32,
    pub weight: f64,
}

#[derive(Clone, Debug, Default)]
pub struct RawNetwork {
    pub vertices: Vec<RawVertex>,
    pub states: Vec<RawState>,
    pub links: Vec<RawLink>,
}

/// One leaf record of a hierarchical partition. For partitions computed over
/// state networks each leaf carries both a state id and its physical id; in
/// that five-field form `id` holds the physical node id and `state_id` the
/// state node id.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub path: Vec<u32>,
    pub flow: f64,
    pub name: String,
    pub id: u32,
    pub state_id: Option<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct Partition {
    pub codelength: Option<f64>,
    pub nodes: Vec<TreeNode>,
}

/// Parses `*Vertices/*States/*Links` text in one pass. Lines that do not
/// match the active section's grammar are skipped; a file without recognized
/// section headers yields empty collections.
pub fn parse_network(text: &str) -> RawNetwork {
    let mut network = RawNetwork::default();
    let mut section = Section::Inactive;
    let mut skipped = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('*') {
            section = match header.trim().to_ascii_lowercase().as_str() {
                "vertices" => Section::Vertices,
                "states" => Section::States,
                "links" => Section::Links,
                _ => Section::Inactive,
            };
            continue;
        }

        let parsed = match section {
            Section::Inactive => false,
            Section::Vertices => parse_vertex(line)
                .map(|vertex| network.vertices.push(vertex))
                .is_some(),
            Section::States => parse_state(line)
                .map(|state| network.states.push(state))
                .is_some(),
            Section::Links => parse_link(line)
                .map(|link| network.links.push(link))
                .is_some(),
        };

        if !parsed {
            skipped += 1;
        }
    }

    if skipped > 0 {
        debug!(skipped, "skipped lines that did not match the active section");
    }

    network
}

/// Parses a `.tree` partition. A comment line carrying the `codelength` token
/// sets the codelength (first match wins); data lines that do not match the
/// grammar are skipped without error.
pub fn parse_tree(text: &str) -> Partition {
    let mut partition = Partition::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            if partition.codelength.is_none() {
                partition.codelength = parse_codelength(line);
            }
            continue;
        }

        if let Some(node) = parse_tree_node(line) {
            partition.nodes.push(node);
        }
    }

    partition
}

fn parse_vertex(line: &str) -> Option<RawVertex> {
    let (id, rest) = leading_int(line)?;
    let (name, _) = quoted(rest)?;
    Some(RawVertex { id, name })
}

fn parse_state(line: &str) -> Option<RawState> {
    let (id, rest) = leading_int(line)?;
    let (physical_id, rest) = leading_int(rest)?;
    let (name, _) = quoted(rest)?;
    Some(RawState {
        id,
        physical_id,
        name,
    })
}

fn parse_link(line: &str) -> Option<RawLink> {
    let mut tokens = line.split_whitespace();
    let source = tokens.next()?.parse().ok()?;
    let target = tokens.next()?.parse().ok()?;
    let weight: f64 = tokens.next()?.parse().ok()?;
    if !weight.is_finite() {
        return None;
    }
    Some(RawLink {
        source,
        target,
        weight,
    })
}

fn parse_codelength(comment: &str) -> Option<f64> {
    let lower = comment.to_ascii_lowercase();
    let after = &comment[lower.find("codelength")? + "codelength".len()..];
    after
        .split(|c: char| c.is_whitespace() || c == '=')
        .find_map(|token| token.parse::<f64>().ok())
}

fn parse_tree_node(line: &str) -> Option<TreeNode> {
    let (path_token, rest) = leading_token(line)?;
    let path = path_token
        .split(':')
        .map(|part| part.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if path.is_empty() {
        return None;
    }
    let (flow_token, rest) = leading_token(rest)?;
    let flow: f64 = flow_token.parse().ok()?;
    let (name, rest) = quoted(rest)?;

    let mut trailing = rest.split_whitespace();
    let first: u32 = trailing.next()?.parse().ok()?;
    match trailing.next() {
        // Five-field form: the leading integer is the state id and the
        // trailing one the physical node id.
        Some(second) => {
            let physical_id: u32 = second.parse().ok()?;
            Some(TreeNode {
                path,
                flow,
                name,
                id: physical_id,
                state_id: Some(first),
            })
        }
        None => Some(TreeNode {
            path,
            flow,
            name,
            id: first,
            state_id: None,
        }),
    }
}

fn leading_token(text: &str) -> Option<(&str, &str)> {
    let mut parts = text.trim_start().splitn(2, char::is_whitespace);
    let token = parts.next().filter(|token| !token.is_empty())?;
    Some((token, parts.next().unwrap_or("")))
}

fn leading_int(text: &str) -> Option<(u32, &str)> {
    let (token, rest) = leading_token(text)?;
    Some((token.parse().ok()?, rest))
}

fn quoted(text: &str) -> Option<(String, &str)> {
    let rest = text.trim_start().strip_prefix('"')?;
    let end = rest.find('"')?;
    Some((rest[..end].to_string(), &rest[end + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK: &str = r#"# a state network
*Vertices
1 "Alpha"
2 "Beta"
*States
1 1 "Alpha 1"
2 1 "Alpha 2"
3 2 "Beta 1"
*Links
1 3 0.8
2 3 0.2
3 1 1.0
"#;

    #[test]
    fn parses_all_sections() {
        let network = parse_network(NETWORK);
        assert_eq!(network.vertices.len(), 2);
        assert_eq!(network.states.len(), 3);
        assert_eq!(network.links.len(), 3);

        assert_eq!(
            network.vertices[0],
            RawVertex {
                id: 1,
                name: "Alpha".to_string()
            }
        );
        assert_eq!(
            network.states[2],
            RawState {
                id: 3,
                physical_id: 2,
                name: "Beta 1".to_string()
            }
        );
        assert_eq!(
            network.links[0],
            RawLink {
                source: 1,
                target: 3,
                weight: 0.8
            }
        );
    }

    #[test]
    fn section_headers_are_case_insensitive() {
        let network = parse_network("*vertices\n1 \"a\"\n*LINKS\n1 1 1.0\n");
        assert_eq!(network.vertices.len(), 1);
        assert_eq!(network.links.len(), 1);
    }

    #[test]
    fn unknown_section_deactivates_parsing() {
        let network = parse_network("*Edges\n1 2 1.0\n*Links\n1 2 1.0\n");
        assert_eq!(network.links.len(), 1);
    }

    #[test]
    fn malformed_lines_do_not_abort_parsing() {
        let text = "*States\n1 1 Alpha without quotes\n2 1 \"ok\"\nnot numbers \"x\"\n3 2 \"also ok\"\n";
        let network = parse_network(text);
        let names: Vec<&str> = network.states.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["ok", "also ok"]);
    }

    #[test]
    fn file_without_sections_yields_empty_collections() {
        let network = parse_network("1 \"a\"\n2 3 0.5\n");
        assert!(network.vertices.is_empty());
        assert!(network.states.is_empty());
        assert!(network.links.is_empty());
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let network = parse_network("*Vertices\n# ignored\n\n1 \"a\"\n");
        assert_eq!(network.vertices.len(), 1);
    }

    #[test]
    fn tree_codelength_first_match_wins() {
        let tree = parse_tree("# Codelength = 3.25 bits\n# codelength = 9.0\n");
        assert_eq!(tree.codelength, Some(3.25));
    }

    #[test]
    fn tree_node_without_state_id() {
        let tree = parse_tree("1:2 0.25 \"Alpha\" 7\n");
        assert_eq!(
            tree.nodes,
            vec![TreeNode {
                path: vec![1, 2],
                flow: 0.25,
                name: "Alpha".to_string(),
                id: 7,
                state_id: None,
            }]
        );
    }

    #[test]
    fn tree_node_with_state_id_reinterprets_fields() {
        let tree = parse_tree("2:1:3 0.1 \"Beta 1\" 4 2\n");
        assert_eq!(
            tree.nodes,
            vec![TreeNode {
                path: vec![2, 1, 3],
                flow: 0.1,
                name: "Beta 1".to_string(),
                id: 2,
                state_id: Some(4),
            }]
        );
    }

    #[test]
    fn malformed_tree_lines_are_skipped() {
        let tree = parse_tree("not:a:path 0.1 \"x\" 1\n1:1 nope \"x\" 1\n1:1 0.5 \"ok\" 3\n");
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.nodes[0].name, "ok");
    }

    #[test]
    fn names_keep_inner_whitespace() {
        let tree = parse_tree("1 0.5 \"two  words\" 3\n");
        assert_eq!(tree.nodes[0].name, "two  words");
    }
}
