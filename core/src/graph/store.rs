use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{EdgePayload, NodePayload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge<E> {
    pub from: String,
    pub to: String,
    pub data: E,
}

/// Node table plus edge list.
#[derive(Debug, Clone)]
pub struct GraphStore<N, E> {
    nodes: HashMap<String, N>,

    /// Original insertion order (for stable iteration)
    insertion_order: Vec<String>,

    edges: Vec<GraphEdge<E>>,
}

impl<N, E> Default for GraphStore<N, E> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
            insertion_order: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<N: NodePayload, E: EdgePayload> GraphStore<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or merge into the existing node with the same id.
    ///
    /// Returns `true` when a new node was created.
    pub fn upsert_node(&mut self, id: impl Into<String>, data: N) -> bool {
        let id = id.into();
        match self.nodes.get_mut(&id) {
            Some(existing) => {
                existing.merge(data);
                false
            }
            None => {
                self.insertion_order.push(id.clone());
                self.nodes.insert(id, data);
                true
            }
        }
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>, data: E) {
        self.edges.push(GraphEdge {
            from: from.into(),
            to: to.into(),
            data,
        });
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &N)> + '_ {
        self.insertion_order
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|n| (id.as_str(), n)))
    }

    pub fn nodes_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = (&'a str, &'a N)> + 'a {
        self.nodes().filter(move |(_, n)| n.kind() == kind)
    }

    pub fn edges(&self) -> &[GraphEdge<E>] {
        &self.edges
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge<E>> + 'a {
        self.edges.iter().filter(move |e| e.from == id)
    }

    pub fn edges_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge<E>> + 'a {
        self.edges.iter().filter(move |e| e.to == id)
    }

    /// Edges whose endpoints are both in `ids`.
    pub fn edges_within<'a>(
        &'a self,
        ids: &'a HashSet<&'a str>,
    ) -> impl Iterator<Item = &'a GraphEdge<E>> + 'a {
        self.edges
            .iter()
            .filter(move |e| ids.contains(e.from.as_str()) && ids.contains(e.to.as_str()))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.insertion_order.clear();
        self.edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        kind: &'static str,
        hits: u32,
    }

    impl NodePayload for Tag {
        fn kind(&self) -> &str {
            self.kind
        }

        fn merge(&mut self, incoming: Self) {
            self.hits += incoming.hits;
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Link(&'static str);

    impl EdgePayload for Link {
        fn kind(&self) -> &str {
            self.0
        }
    }

    fn tag(kind: &'static str) -> Tag {
        Tag { kind, hits: 1 }
    }

    #[test]
    fn upsert_merges_instead_of_duplicating() {
        let mut g: GraphStore<Tag, Link> = GraphStore::new();
        assert!(g.upsert_node("a", tag("x")));
        assert!(!g.upsert_node("a", tag("x")));
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.node("a").unwrap().hits, 2);
    }

    #[test]
    fn nodes_iterate_in_insertion_order() {
        let mut g: GraphStore<Tag, Link> = GraphStore::new();
        for id in ["c", "a", "b"] {
            g.upsert_node(id, tag("x"));
        }
        g.upsert_node("a", tag("x"));
        let ids: Vec<&str> = g.nodes().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn multigraph_keeps_duplicate_and_dangling_edges() {
        let mut g: GraphStore<Tag, Link> = GraphStore::new();
        g.upsert_node("a", tag("x"));
        g.add_edge("a", "b", Link("calls"));
        g.add_edge("a", "b", Link("calls"));
        g.add_edge("a", "missing", Link("imports"));
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edges_from("a").count(), 3);
        assert_eq!(g.edges_to("b").count(), 2);
    }

    #[test]
    fn edges_within_requires_both_endpoints() {
        let mut g: GraphStore<Tag, Link> = GraphStore::new();
        for id in ["a", "b", "c"] {
            g.upsert_node(id, tag("x"));
        }
        g.add_edge("a", "b", Link("imports"));
        g.add_edge("b", "c", Link("imports"));
        let selected: HashSet<&str> = ["a", "b"].into_iter().collect();
        let within: Vec<_> = g.edges_within(&selected).collect();
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].to, "b");
    }

    #[test]
    fn nodes_of_kind_filters() {
        let mut g: GraphStore<Tag, Link> = GraphStore::new();
        g.upsert_node("f", tag("file"));
        g.upsert_node("d", tag("dependency"));
        assert_eq!(g.nodes_of_kind("file").count(), 1);
        g.clear();
        assert_eq!(g.node_count(), 0);
    }
}
