//! Error types for graph construction.

use std::fmt;

use strobe_core::{EdgeId, NodeId};

/// Errors arising while building a [`LiveGraph`](crate::LiveGraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Two nodes share the same id.
    DuplicateNode {
        /// The repeated id.
        id: NodeId,
    },
    /// Two edges share the same id.
    DuplicateEdge {
        /// The repeated id.
        id: EdgeId,
    },
    /// An edge refers to a node that was never declared.
    UnknownEndpoint {
        /// The offending edge.
        edge: EdgeId,
        /// The undeclared endpoint.
        node: NodeId,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode { id } => write!(f, "duplicate node id '{id}'"),
            Self::DuplicateEdge { id } => write!(f, "duplicate edge id '{id}'"),
            Self::UnknownEndpoint { edge, node } => {
                write!(f, "edge '{edge}' refers to unknown node '{node}'")
            }
        }
    }
}

impl std::error::Error for BuildError {}
