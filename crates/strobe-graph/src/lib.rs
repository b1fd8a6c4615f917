//! In-memory rendered graph for Strobe playback.
//!
//! [`LiveGraph`] holds the automaton topology together with the mutable
//! display state the delta applier paints onto it: per-node colour and
//! activation count, per-edge colour. It implements
//! [`GraphSurface`](strobe_core::GraphSurface) with an outgoing-edge
//! index so activation propagation costs O(out-degree) per node.
//!
//! Build one with [`GraphBuilder`]:
//!
//! ```
//! use strobe_core::{GraphSurface, NodeId, Rgb};
//! use strobe_graph::GraphBuilder;
//!
//! let graph = GraphBuilder::new()
//!     .node("s0", Rgb::new(200, 200, 200))
//!     .node("s1", Rgb::new(200, 200, 200))
//!     .edge("e0", "s0", "s1")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(graph.outgoing_edges(&NodeId::from("s0")).len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod error;
pub mod live;

pub use builder::GraphBuilder;
pub use error::BuildError;
pub use live::{EdgeView, LiveGraph, NodeData};
