//! Fluent construction of a [`LiveGraph`].
//!
//! The builder collects declarations and validates them all in
//! [`build`](GraphBuilder::build); nothing is checked on the way in.
//! Every node starts with its declared colour as both the displayed and
//! the original colour, and an activation count of zero.

use indexmap::map::Entry;
use indexmap::IndexMap;
use strobe_core::{EdgeId, NodeId, Rgb};

use crate::error::BuildError;
use crate::live::{LiveEdge, LiveGraph, LiveNode, NodeData};

/// Builder for [`LiveGraph`].
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<(NodeId, Rgb, NodeData)>,
    edges: Vec<(EdgeId, NodeId, NodeId)>,
}

impl GraphBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node with its load-time colour.
    pub fn node(self, id: impl Into<NodeId>, color: Rgb) -> Self {
        self.node_with_data(id, color, NodeData::default())
    }

    /// Declare a node with its load-time colour and annotation data.
    pub fn node_with_data(mut self, id: impl Into<NodeId>, color: Rgb, data: NodeData) -> Self {
        self.nodes.push((id.into(), color, data));
        self
    }

    /// Declare a directed edge.
    pub fn edge(
        mut self,
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        self.edges.push((id.into(), source.into(), target.into()));
        self
    }

    /// Validate the declarations and build the graph.
    pub fn build(self) -> Result<LiveGraph, BuildError> {
        let mut graph = LiveGraph::default();

        for (id, color, data) in self.nodes {
            match graph.nodes.entry(id) {
                Entry::Occupied(e) => {
                    return Err(BuildError::DuplicateNode { id: e.key().clone() })
                }
                Entry::Vacant(e) => {
                    e.insert(LiveNode {
                        original_color: color,
                        color,
                        count: 0,
                        data,
                    });
                }
            }
        }

        let mut out_edges: IndexMap<NodeId, _> = IndexMap::new();
        for (id, source, target) in self.edges {
            for endpoint in [&source, &target] {
                if !graph.nodes.contains_key(endpoint) {
                    return Err(BuildError::UnknownEndpoint {
                        edge: id,
                        node: endpoint.clone(),
                    });
                }
            }
            if graph.edges.contains_key(&id) {
                return Err(BuildError::DuplicateEdge { id });
            }
            out_edges
                .entry(source.clone())
                .or_insert_with(smallvec::SmallVec::new)
                .push(id.clone());
            graph.edges.insert(
                id,
                LiveEdge {
                    source,
                    target,
                    color: None,
                },
            );
        }
        graph.out_edges = out_edges;

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strobe_core::GraphSurface;

    #[test]
    fn rejects_duplicate_node() {
        let err = GraphBuilder::new()
            .node("a", Rgb::BLACK)
            .node("a", Rgb::GREEN)
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::DuplicateNode { id: "a".into() });
    }

    #[test]
    fn rejects_duplicate_edge() {
        let err = GraphBuilder::new()
            .node("a", Rgb::BLACK)
            .edge("e", "a", "a")
            .edge("e", "a", "a")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::DuplicateEdge { id: "e".into() });
    }

    #[test]
    fn rejects_dangling_edge() {
        let err = GraphBuilder::new()
            .node("a", Rgb::BLACK)
            .edge("e", "a", "ghost")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownEndpoint {
                edge: "e".into(),
                node: "ghost".into()
            }
        );
    }

    #[test]
    fn keeps_node_data() {
        let g = GraphBuilder::new()
            .node_with_data(
                "r",
                Rgb::BLACK,
                NodeData {
                    symbol_set: "[a-z]".into(),
                    report_code: Some("7".into()),
                    start: None,
                },
            )
            .build()
            .unwrap();
        let data = g.node_data("r").unwrap();
        assert_eq!(data.symbol_set, "[a-z]");
        assert_eq!(data.report_code.as_deref(), Some("7"));
    }

    proptest! {
        #[test]
        fn out_degree_matches_declared_edges(
            n in 1usize..20,
            raw in proptest::collection::vec((0usize..20, 0usize..20), 0..60),
        ) {
            let mut builder = GraphBuilder::new();
            for i in 0..n {
                builder = builder.node(format!("n{i}"), Rgb::BLACK);
            }
            let mut expected = vec![0usize; n];
            for (k, (s, t)) in raw.iter().enumerate() {
                let (s, t) = (s % n, t % n);
                expected[s] += 1;
                builder = builder.edge(format!("e{k}"), format!("n{s}"), format!("n{t}"));
            }
            let g = builder.build().unwrap();
            prop_assert_eq!(g.edge_count(), raw.len());
            for (i, want) in expected.iter().enumerate() {
                prop_assert_eq!(g.outgoing_edges(&NodeId::from(format!("n{i}"))).len(), *want);
            }
        }
    }
}
