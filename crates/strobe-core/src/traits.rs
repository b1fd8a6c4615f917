//! Core abstraction traits: the rendered graph and the frame provider.

use crate::color::Rgb;
use crate::error::{FetchError, GraphError};
use crate::frame::{BatchRequest, FrameBatch};
use crate::id::{EdgeId, NodeId};

/// Display state of one node as seen through a [`GraphSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeState {
    /// Colour currently displayed.
    pub color: Rgb,
    /// Colour captured when the graph was loaded.
    pub original_color: Rgb,
    /// Highest activation count applied so far.
    pub count: u64,
}

/// The rendered graph as seen by the delta applier.
///
/// These are the only graph operations playback needs; any graph
/// representation that can answer them is sufficient. Implementations
/// must answer [`outgoing_edges`](Self::outgoing_edges) in time
/// proportional to the node's out-degree.
pub trait GraphSurface {
    /// Current display state of a node, or `None` if it does not exist.
    fn node(&self, id: &NodeId) -> Option<NodeState>;

    /// Set the displayed colour of a node.
    fn set_node_color(&mut self, id: &NodeId, color: Rgb) -> Result<(), GraphError>;

    /// Set the activation count of a node.
    fn set_node_count(&mut self, id: &NodeId, count: u64) -> Result<(), GraphError>;

    /// Edges leaving `id`. Empty for unknown nodes and sinks.
    fn outgoing_edges(&self, id: &NodeId) -> &[EdgeId];

    /// Set the displayed colour of an edge. `None` restores the
    /// renderer's default edge colour.
    fn set_edge_color(&mut self, id: &EdgeId, color: Option<Rgb>) -> Result<(), GraphError>;

    /// Every node id, for whole-graph repaints.
    fn node_ids(&self) -> Vec<NodeId>;

    /// Every edge id, for whole-graph repaints.
    fn edge_ids(&self) -> Vec<EdgeId>;
}

/// A provider of pre-computed frames.
///
/// `fetch` may block (network, disk); the engine calls it either inline
/// or from a background worker depending on the refill port in use.
pub trait FrameSource {
    /// Produce the batch starting at `request.start`.
    ///
    /// The batch may be shorter than `request.len` near the end of the
    /// input, but must not be empty.
    fn fetch(&mut self, request: BatchRequest) -> Result<FrameBatch, FetchError>;

    /// Total number of cycles in the input, if known.
    fn input_len(&self) -> Option<u64> {
        None
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn fetch(&mut self, request: BatchRequest) -> Result<FrameBatch, FetchError> {
        (**self).fetch(request)
    }

    fn input_len(&self) -> Option<u64> {
        (**self).input_len()
    }
}
