//! Bipartite mapping graph projected from the mapping state
//!
//! Source columns are left-hand nodes with an output port, target columns are
//! right-hand nodes with an input port, and every mapping entry whose
//! endpoints both exist becomes an edge. The graph is never edited in place:
//! [`MappingGraph::rebuild`] regenerates every handle from the column lists
//! and the mapping, and handles from an earlier rebuild no longer resolve.

use std::collections::HashMap;

use crate::mapping::{Mapping, MappingOrigin};

/// Which side of the graph a port belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Source node port, where edges start
    Output,
    /// Target node port, where edges end
    Input,
}

/// Transient port handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortId {
    generation: u32,
    index: u32,
    kind: PortKind,
}

/// Transient edge handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId {
    generation: u32,
    index: u32,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub column: String,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub source: String,
    pub target: String,
    pub origin: MappingOrigin,
}

/// Edge lifecycle while the user draws a connection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Idle,
    /// A connection is being dragged from a source port
    Proposed { from: PortId, source: String },
}

#[derive(Debug, Default)]
pub struct MappingGraph {
    generation: u32,
    sources: Vec<Node>,
    targets: Vec<Node>,
    edges: Vec<Edge>,
    ports: HashMap<PortId, String>,
    edge_index: HashMap<EdgeId, usize>,
    source_ports: HashMap<String, PortId>,
    target_ports: HashMap<String, PortId>,
}

impl MappingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throw away every node, edge and handle and project the mapping again
    pub fn rebuild(&mut self, sources: &[String], targets: &[String], mapping: &Mapping) {
        self.generation = self.generation.wrapping_add(1);
        self.sources.clear();
        self.targets.clear();
        self.edges.clear();
        self.ports.clear();
        self.edge_index.clear();
        self.source_ports.clear();
        self.target_ports.clear();

        let generation = self.generation;
        for (i, column) in sources.iter().enumerate() {
            let port = PortId {
                generation,
                index: i as u32,
                kind: PortKind::Output,
            };
            self.ports.insert(port, column.clone());
            self.source_ports.entry(column.clone()).or_insert(port);
            self.sources.push(Node {
                column: column.clone(),
            });
        }
        for (i, column) in targets.iter().enumerate() {
            let port = PortId {
                generation,
                index: i as u32,
                kind: PortKind::Input,
            };
            self.ports.insert(port, column.clone());
            self.target_ports.entry(column.clone()).or_insert(port);
            self.targets.push(Node {
                column: column.clone(),
            });
        }

        // Edges follow target order so the view is stable across rebuilds
        for target in &self.targets {
            let Some(source) = mapping.source_for(&target.column) else {
                continue;
            };
            if !self.source_ports.contains_key(source) {
                continue;
            }
            let id = EdgeId {
                generation,
                index: self.edges.len() as u32,
            };
            self.edge_index.insert(id, self.edges.len());
            self.edges.push(Edge {
                id,
                source: source.to_string(),
                target: target.column.clone(),
                origin: mapping.origin(&target.column).unwrap_or(MappingOrigin::Manual),
            });
        }

        log::debug!(
            "Rebuilt mapping graph (generation {}): {} sources, {} targets, {} edges",
            generation,
            self.sources.len(),
            self.targets.len(),
            self.edges.len()
        );
    }

    pub fn sources(&self) -> &[Node] {
        &self.sources
    }

    pub fn targets(&self) -> &[Node] {
        &self.targets
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn source_port(&self, column: &str) -> Option<PortId> {
        self.source_ports.get(column).copied()
    }

    pub fn target_port(&self, column: &str) -> Option<PortId> {
        self.target_ports.get(column).copied()
    }

    /// Column behind a port of the current generation
    pub fn port_column(&self, port: PortId) -> Option<&str> {
        if port.generation != self.generation {
            return None;
        }
        self.ports.get(&port).map(String::as_str)
    }

    /// Translate a dropped connection into (source, target) column names
    ///
    /// The connection may have been dragged in either direction, but it must
    /// join one output port and one input port of the current generation.
    pub fn resolve_link(&self, a: PortId, b: PortId) -> Option<(String, String)> {
        let (from, to) = match (a.kind, b.kind) {
            (PortKind::Output, PortKind::Input) => (a, b),
            (PortKind::Input, PortKind::Output) => (b, a),
            _ => return None,
        };
        let source = self.port_column(from)?;
        let target = self.port_column(to)?;
        Some((source.to_string(), target.to_string()))
    }

    /// Translate an edge handle into (source, target) column names
    pub fn resolve_edge(&self, id: EdgeId) -> Option<(String, String)> {
        self.edge_index
            .get(&id)
            .map(|&i| &self.edges[i])
            .map(|e| (e.source.clone(), e.target.clone()))
    }

    /// The single edge terminating at `target`, if any
    pub fn edge_into(&self, target: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.target == target)
    }

    /// Number of edges leaving `source`
    pub fn out_degree(&self, source: &str) -> usize {
        self.edges.iter().filter(|e| e.source == source).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn built(mapping: &Mapping) -> MappingGraph {
        let mut graph = MappingGraph::new();
        graph.rebuild(&cols(&["Name", "Age"]), &cols(&["id", "name", "age"]), mapping);
        graph
    }

    #[test]
    fn test_edges_mirror_mapping() {
        let mut mapping = Mapping::new();
        mapping.set("age", "Age");
        mapping.set("name", "Name");
        let graph = built(&mapping);

        assert_eq!(graph.sources().len(), 2);
        assert_eq!(graph.targets().len(), 3);

        let pairs: Vec<_> = graph
            .edges()
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Name", "name"), ("Age", "age")]);
    }

    #[test]
    fn test_entries_with_missing_endpoints_have_no_edge() {
        let mut mapping = Mapping::new();
        mapping.set("name", "FullName");
        mapping.set("email", "Name");
        let graph = built(&mapping);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_resolve_link_either_direction() {
        let graph = built(&Mapping::new());
        let from = graph.source_port("Name").unwrap();
        let to = graph.target_port("name").unwrap();

        let expected = Some(("Name".to_string(), "name".to_string()));
        assert_eq!(graph.resolve_link(from, to), expected);
        assert_eq!(graph.resolve_link(to, from), expected);
    }

    #[test]
    fn test_resolve_link_rejects_same_side() {
        let graph = built(&Mapping::new());
        let a = graph.source_port("Name").unwrap();
        let b = graph.source_port("Age").unwrap();
        assert_eq!(graph.resolve_link(a, b), None);

        let c = graph.target_port("id").unwrap();
        let d = graph.target_port("age").unwrap();
        assert_eq!(graph.resolve_link(c, d), None);
    }

    #[test]
    fn test_stale_handles_do_not_resolve() {
        let mut mapping = Mapping::new();
        mapping.set("name", "Name");
        let mut graph = built(&mapping);

        let old_port = graph.source_port("Name").unwrap();
        let old_target = graph.target_port("name").unwrap();
        let old_edge = graph.edges()[0].id;

        graph.rebuild(&cols(&["Name", "Age"]), &cols(&["id", "name", "age"]), &mapping);

        assert_eq!(graph.resolve_link(old_port, old_target), None);
        assert_eq!(graph.resolve_edge(old_edge), None);
        assert_eq!(
            graph.resolve_edge(graph.edges()[0].id),
            Some(("Name".to_string(), "name".to_string()))
        );
    }

    #[test]
    fn test_one_edge_per_target_many_per_source() {
        let mut mapping = Mapping::new();
        mapping.set("name", "Name");
        mapping.set("id", "Name");
        mapping.set("name", "Age");
        let graph = built(&mapping);

        assert_eq!(graph.edge_into("name").unwrap().source, "Age");
        assert_eq!(graph.out_degree("Name"), 1);
        assert_eq!(graph.out_degree("Age"), 1);
        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn test_edge_origin_tracks_mapping() {
        let mut mapping = Mapping::new();
        mapping.auto_map(&["name"], &["Name"]);
        let graph = built(&mapping);
        assert_eq!(graph.edges()[0].origin, MappingOrigin::Auto);
    }
}
