//! The live graph: topology plus mutable display state.

use indexmap::IndexMap;
use smallvec::SmallVec;
use strobe_core::{EdgeId, GraphError, GraphSurface, NodeId, NodeState, Rgb};

/// Static per-node metadata shown in node annotations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeData {
    /// The symbol set the node matches, as written in the automaton source.
    pub symbol_set: String,
    /// Report code, for reporting nodes.
    pub report_code: Option<String>,
    /// Start behaviour (e.g. `"start-of-data"`, `"all-input"`), for start nodes.
    pub start: Option<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct LiveNode {
    pub(crate) original_color: Rgb,
    pub(crate) color: Rgb,
    pub(crate) count: u64,
    pub(crate) data: NodeData,
}

#[derive(Clone, Debug)]
pub(crate) struct LiveEdge {
    pub(crate) source: NodeId,
    pub(crate) target: NodeId,
    pub(crate) color: Option<Rgb>,
}

/// Read-only view of one edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeView<'g> {
    /// Source node.
    pub source: &'g NodeId,
    /// Target node.
    pub target: &'g NodeId,
    /// Current colour; `None` is the renderer default.
    pub color: Option<Rgb>,
}

/// Outgoing adjacency. Most automaton nodes have a handful of
/// transitions, so four edges stay inline.
type OutEdges = SmallVec<[EdgeId; 4]>;

/// An automaton graph with mutable display state.
///
/// Node and edge maps preserve insertion order, so whole-graph repaints
/// and [`node_ids`](GraphSurface::node_ids) are deterministic.
#[derive(Clone, Debug, Default)]
pub struct LiveGraph {
    pub(crate) nodes: IndexMap<NodeId, LiveNode>,
    pub(crate) edges: IndexMap<EdgeId, LiveEdge>,
    pub(crate) out_edges: IndexMap<NodeId, OutEdges>,
}

impl LiveGraph {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Static metadata for a node.
    pub fn node_data(&self, id: &str) -> Option<&NodeData> {
        self.nodes.get(id).map(|n| &n.data)
    }

    /// Current colour of a node.
    pub fn node_color(&self, id: &str) -> Option<Rgb> {
        self.nodes.get(id).map(|n| n.color)
    }

    /// Current activation count of a node.
    pub fn node_count_of(&self, id: &str) -> Option<u64> {
        self.nodes.get(id).map(|n| n.count)
    }

    /// Read-only view of an edge.
    pub fn edge(&self, id: &str) -> Option<EdgeView<'_>> {
        self.edges.get(id).map(|e| EdgeView {
            source: &e.source,
            target: &e.target,
            color: e.color,
        })
    }

    /// Current colour of an edge. Outer `None`: no such edge; inner
    /// `None`: renderer default.
    pub fn edge_color(&self, id: &str) -> Option<Option<Rgb>> {
        self.edges.get(id).map(|e| e.color)
    }

    /// Remove an edge, keeping the outgoing index consistent.
    pub fn remove_edge(&mut self, id: &str) -> bool {
        let Some(edge) = self.edges.shift_remove(id) else {
            return false;
        };
        if let Some(out) = self.out_edges.get_mut(&edge.source) {
            out.retain(|e| e.as_str() != id);
        }
        true
    }
}

impl GraphSurface for LiveGraph {
    fn node(&self, id: &NodeId) -> Option<NodeState> {
        self.nodes.get(id).map(|n| NodeState {
            color: n.color,
            original_color: n.original_color,
            count: n.count,
        })
    }

    fn set_node_color(&mut self, id: &NodeId, color: Rgb) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::MissingNode { id: id.clone() })?;
        node.color = color;
        Ok(())
    }

    fn set_node_count(&mut self, id: &NodeId, count: u64) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::MissingNode { id: id.clone() })?;
        node.count = count;
        Ok(())
    }

    fn outgoing_edges(&self, id: &NodeId) -> &[EdgeId] {
        self.out_edges
            .get(id)
            .map(|out| out.as_slice())
            .unwrap_or(&[])
    }

    fn set_edge_color(&mut self, id: &EdgeId, color: Option<Rgb>) -> Result<(), GraphError> {
        let edge = self
            .edges
            .get_mut(id)
            .ok_or_else(|| GraphError::MissingEdge { id: id.clone() })?;
        edge.color = color;
        Ok(())
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().cloned().collect()
    }
}
