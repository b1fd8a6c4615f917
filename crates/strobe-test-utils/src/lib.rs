//! Test utilities and mock types for Strobe development.
//!
//! Provides a mock [`GraphSurface`] ([`MockGraph`]) that can simulate a
//! stale adjacency index, a hand-driven [`RefillPort`] ([`ManualRefill`])
//! for controlling exactly when refills land, and frame-source fixtures
//! in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::{HashMap, VecDeque};

use strobe_core::{
    EdgeId, FetchError, FrameBatch, FrameSource, GraphError, GraphSurface, NodeId, NodeState, Rgb,
};
use strobe_engine::{RefillPort, RefillReply, RefillTicket};

// ── MockGraph ──────────────────────────────────────────────────────

/// Mock implementation of [`GraphSurface`].
///
/// Backed by `HashMap`s, with write counters so tests can assert how
/// much of the graph a step touched. The adjacency index is kept
/// separately from the edge map: [`drop_edge`](MockGraph::drop_edge)
/// removes an edge but leaves it listed as outgoing, the way a graph
/// edited while playback is paused would look.
#[derive(Clone, Debug, Default)]
pub struct MockGraph {
    nodes: HashMap<NodeId, NodeState>,
    order: Vec<NodeId>,
    edges: HashMap<EdgeId, Option<Rgb>>,
    edge_order: Vec<EdgeId>,
    out: HashMap<NodeId, Vec<EdgeId>>,
    node_writes: usize,
    edge_writes: usize,
}

impl MockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with its load-time colour.
    pub fn with_node(mut self, id: &str, color: Rgb) -> Self {
        let id = NodeId::from(id);
        self.order.push(id.clone());
        self.nodes.insert(
            id,
            NodeState {
                color,
                original_color: color,
                count: 0,
            },
        );
        self
    }

    /// Add an edge. Endpoints are not checked.
    pub fn with_edge(mut self, id: &str, source: &str, _target: &str) -> Self {
        let id = EdgeId::from(id);
        self.edge_order.push(id.clone());
        self.edges.insert(id.clone(), None);
        self.out.entry(NodeId::from(source)).or_default().push(id);
        self
    }

    /// Remove an edge but keep it in its source's adjacency list.
    pub fn drop_edge(&mut self, id: &str) {
        self.edges.remove(id);
        self.edge_order.retain(|e| e.as_str() != id);
    }

    pub fn node_color(&self, id: &str) -> Option<Rgb> {
        self.nodes.get(id).map(|n| n.color)
    }

    pub fn node_count(&self, id: &str) -> Option<u64> {
        self.nodes.get(id).map(|n| n.count)
    }

    /// Outer `None`: no such edge.
    pub fn edge_color(&self, id: &str) -> Option<Option<Rgb>> {
        self.edges.get(id).copied()
    }

    /// Successful node colour and count writes since the last reset.
    pub fn node_writes(&self) -> usize {
        self.node_writes
    }

    /// Successful edge colour writes since the last reset.
    pub fn edge_writes(&self) -> usize {
        self.edge_writes
    }

    pub fn reset_write_counts(&mut self) {
        self.node_writes = 0;
        self.edge_writes = 0;
    }
}

impl GraphSurface for MockGraph {
    fn node(&self, id: &NodeId) -> Option<NodeState> {
        self.nodes.get(id).copied()
    }

    fn set_node_color(&mut self, id: &NodeId, color: Rgb) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::MissingNode { id: id.clone() })?;
        node.color = color;
        self.node_writes += 1;
        Ok(())
    }

    fn set_node_count(&mut self, id: &NodeId, count: u64) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::MissingNode { id: id.clone() })?;
        node.count = count;
        self.node_writes += 1;
        Ok(())
    }

    fn outgoing_edges(&self, id: &NodeId) -> &[EdgeId] {
        self.out.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn set_edge_color(&mut self, id: &EdgeId, color: Option<Rgb>) -> Result<(), GraphError> {
        let edge = self
            .edges
            .get_mut(id)
            .ok_or_else(|| GraphError::MissingEdge { id: id.clone() })?;
        *edge = color;
        self.edge_writes += 1;
        Ok(())
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.order.clone()
    }

    fn edge_ids(&self) -> Vec<EdgeId> {
        self.edge_order.clone()
    }
}

// ── ManualRefill ───────────────────────────────────────────────────

/// A [`RefillPort`] completed by hand.
///
/// Every accepted request is logged in [`requests`](Self::requests) and
/// stays outstanding until the test calls [`complete`](Self::complete),
/// [`complete_from`](Self::complete_from) or [`fail`](Self::fail).
#[derive(Debug, Default)]
pub struct ManualRefill {
    requests: Vec<RefillTicket>,
    outstanding: VecDeque<RefillTicket>,
    ready: VecDeque<RefillReply>,
    input_len: Option<u64>,
    reject: bool,
}

impl ManualRefill {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a known input length to the session.
    pub fn with_input_len(mut self, len: u64) -> Self {
        self.input_len = Some(len);
        self
    }

    /// Refuse new requests with [`FetchError::Disconnected`].
    pub fn reject_requests(&mut self, reject: bool) {
        self.reject = reject;
    }

    /// Every request accepted so far, oldest first.
    pub fn requests(&self) -> &[RefillTicket] {
        &self.requests
    }

    /// The oldest request not yet completed.
    pub fn outstanding(&self) -> Option<RefillTicket> {
        self.outstanding.front().copied()
    }

    /// Answer the oldest outstanding request with `batch`. Returns
    /// `false` if nothing was outstanding.
    pub fn complete(&mut self, batch: FrameBatch) -> bool {
        self.finish(Ok(batch))
    }

    /// Answer the oldest outstanding request by fetching from `source`.
    pub fn complete_from<S: FrameSource>(&mut self, source: &mut S) -> bool {
        let Some(ticket) = self.outstanding.front() else {
            return false;
        };
        let result = source.fetch(ticket.request);
        self.finish(result)
    }

    /// Fail the oldest outstanding request.
    pub fn fail(&mut self, error: FetchError) -> bool {
        self.finish(Err(error))
    }

    fn finish(&mut self, result: Result<FrameBatch, FetchError>) -> bool {
        let Some(ticket) = self.outstanding.pop_front() else {
            return false;
        };
        self.ready.push_back(RefillReply { ticket, result });
        true
    }
}

impl RefillPort for ManualRefill {
    fn request(&mut self, ticket: RefillTicket) -> Result<(), FetchError> {
        if self.reject {
            return Err(FetchError::Disconnected);
        }
        self.requests.push(ticket);
        self.outstanding.push_back(ticket);
        Ok(())
    }

    fn poll(&mut self) -> Option<RefillReply> {
        self.ready.pop_front()
    }

    fn input_len(&self) -> Option<u64> {
        self.input_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strobe_core::{BatchRequest, CycleId, Frame};

    #[test]
    fn dropped_edge_stays_in_adjacency() {
        let mut g = MockGraph::new()
            .with_node("a", Rgb::BLACK)
            .with_node("b", Rgb::BLACK)
            .with_edge("a-b", "a", "b");
        g.drop_edge("a-b");
        assert_eq!(g.outgoing_edges(&NodeId::from("a")).len(), 1);
        assert_eq!(
            g.set_edge_color(&EdgeId::from("a-b"), None),
            Err(GraphError::MissingEdge { id: "a-b".into() })
        );
        assert_eq!(g.edge_writes(), 0);
    }

    #[test]
    fn manual_refill_completes_in_order() {
        let mut port = ManualRefill::new();
        let ticket = |start| RefillTicket {
            generation: 0,
            request: BatchRequest {
                start: CycleId(start),
                len: 1,
            },
        };
        port.request(ticket(0)).unwrap();
        port.request(ticket(5)).unwrap();
        assert!(port.poll().is_none());

        let batch = FrameBatch::starting_at(CycleId(0), vec![Arc::new(Frame::new(b'a'))]).unwrap();
        assert!(port.complete(batch));
        assert!(port.fail(FetchError::Disconnected));
        assert!(!port.fail(FetchError::Disconnected));

        assert!(port.poll().unwrap().result.is_ok());
        let second = port.poll().unwrap();
        assert_eq!(second.ticket, ticket(5));
        assert!(second.result.is_err());
        assert_eq!(port.requests().len(), 2);
    }
}
