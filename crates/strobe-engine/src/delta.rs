//! Incremental graph mutation: one frame at a time, touching only what
//! changed.
//!
//! The applier remembers the nodes and edges it painted on the last
//! step (the [`DeltaSet`]). In discrete mode those are reverted before
//! the next frame is painted, so the cost of a step is proportional to
//! the size of two frames, not the size of the graph. In heat mode
//! nothing is reverted: colours encode the cumulative activation count.
//!
//! Missing graph elements are never fatal. A node or edge that a frame
//! names but the graph no longer has is logged, counted in the
//! [`DeltaSummary`], and skipped.

use indexmap::IndexSet;
use smallvec::SmallVec;
use strobe_core::{EdgeId, Frame, GraphSurface, NodeId, Rgb};

use crate::config::PlaybackConfig;

// ── DrawMode / HeatRamp ────────────────────────────────────────────

/// How activated nodes are coloured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawMode {
    /// Each frame shows exactly its own activations; the previous
    /// frame's paint is reverted first.
    #[default]
    Discrete,
    /// Nodes show their cumulative activation count on a colour ramp.
    Heat,
}

/// Colour ramp for heat mode.
///
/// Red rises asymptotically with the count (`255 - 255/(count+1)`),
/// green rises linearly until `saturation` activations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeatRamp {
    /// Count at which the green channel saturates. Must be non-zero.
    pub saturation: u64,
}

impl Default for HeatRamp {
    fn default() -> Self {
        Self { saturation: 255 }
    }
}

impl HeatRamp {
    /// Colour for an activation count. Zero is black.
    pub fn color(&self, count: u64) -> Rgb {
        let sat = self.saturation.max(1) as f64;
        let c = count as f64;
        let red = (255.0 - 255.0 / (c + 1.0)).round();
        let green = (255.0 * c.min(sat) / sat).round();
        Rgb::new(red as u8, green as u8, 0)
    }
}

/// Everything the applier needs to decide a colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintStyle {
    /// Current draw mode.
    pub mode: DrawMode,
    /// Heat-mode ramp.
    pub heat: HeatRamp,
    /// Discrete colour that marks a node as active.
    pub active_node: Rgb,
    /// Colour for edges leaving an active node.
    pub active_edge: Rgb,
}

impl PaintStyle {
    /// The style described by a playback config.
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            mode: config.mode,
            heat: config.heat,
            active_node: config.active_node_color,
            active_edge: config.active_edge_color,
        }
    }
}

// ── DeltaSet / DeltaSummary ────────────────────────────────────────

/// Nodes and edges painted by the most recent step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaSet {
    nodes: IndexSet<NodeId>,
    edges: IndexSet<EdgeId>,
}

impl DeltaSet {
    /// Painted nodes, in paint order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes.iter()
    }

    /// Lit edges, in paint order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeId> + '_ {
        self.edges.iter()
    }

    /// Whether `id` was painted.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    /// Whether `id` was lit.
    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains(id)
    }

    /// Number of painted nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of lit edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether nothing was painted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

/// What one apply did to the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeltaSummary {
    /// Nodes restored to their original colour.
    pub reverted_nodes: usize,
    /// Edges restored to the default colour.
    pub reverted_edges: usize,
    /// Nodes painted from the frame.
    pub painted_nodes: usize,
    /// Edges lit because their source became active.
    pub lit_edges: usize,
    /// Node ids that were not in the graph.
    pub missing_nodes: usize,
    /// Edge ids that were not in the graph.
    pub missing_edges: usize,
}

// ── apply_frame ────────────────────────────────────────────────────

/// Paint `frame` onto `graph`, reverting `previous` first in discrete
/// mode, and return the new delta set.
///
/// Counts only ever go up: each activated node keeps the larger of its
/// current count and the frame's.
pub fn apply_frame<G: GraphSurface + ?Sized>(
    graph: &mut G,
    previous: &DeltaSet,
    frame: &Frame,
    style: &PaintStyle,
) -> (DeltaSet, DeltaSummary) {
    let mut summary = DeltaSummary::default();

    if style.mode == DrawMode::Discrete {
        for id in &previous.nodes {
            let restored = graph
                .node(id)
                .map(|state| graph.set_node_color(id, state.original_color));
            match restored {
                Some(Ok(())) => summary.reverted_nodes += 1,
                _ => {
                    tracing::warn!(node = %id, "cannot revert missing node; skipped");
                    summary.missing_nodes += 1;
                }
            }
        }
        for id in &previous.edges {
            match graph.set_edge_color(id, None) {
                Ok(()) => summary.reverted_edges += 1,
                Err(err) => {
                    tracing::warn!(%err, "cannot revert edge; skipped");
                    summary.missing_edges += 1;
                }
            }
        }
    }

    let mut next = DeltaSet::default();
    for activation in &frame.activated {
        let id = &activation.id;
        let Some(state) = graph.node(id) else {
            tracing::warn!(node = %id, "activated node not in graph; skipped");
            summary.missing_nodes += 1;
            continue;
        };
        let count = state.count.max(activation.count);
        let color = match style.mode {
            DrawMode::Discrete => activation.color,
            DrawMode::Heat => style.heat.color(count),
        };
        if let Err(err) = graph
            .set_node_count(id, count)
            .and_then(|()| graph.set_node_color(id, color))
        {
            tracing::warn!(%err, "cannot paint node; skipped");
            summary.missing_nodes += 1;
            continue;
        }
        summary.painted_nodes += 1;
        next.nodes.insert(id.clone());

        if style.mode == DrawMode::Discrete && color == style.active_node {
            let outgoing: SmallVec<[EdgeId; 8]> = graph.outgoing_edges(id).iter().cloned().collect();
            for edge in outgoing {
                match graph.set_edge_color(&edge, Some(style.active_edge)) {
                    Ok(()) => {
                        summary.lit_edges += 1;
                        next.edges.insert(edge);
                    }
                    Err(err) => {
                        tracing::warn!(%err, node = %id, "cannot light outgoing edge; skipped");
                        summary.missing_edges += 1;
                    }
                }
            }
        }
    }

    (next, summary)
}

// ── DeltaApplier ───────────────────────────────────────────────────

/// Stateful wrapper around [`apply_frame`] that owns the delta set.
#[derive(Clone, Debug)]
pub struct DeltaApplier {
    style: PaintStyle,
    delta: DeltaSet,
}

impl DeltaApplier {
    /// A fresh applier with an empty delta set.
    pub fn new(style: PaintStyle) -> Self {
        Self {
            style,
            delta: DeltaSet::default(),
        }
    }

    /// Paint `frame`, replacing the delta set.
    pub fn apply<G: GraphSurface + ?Sized>(&mut self, graph: &mut G, frame: &Frame) -> DeltaSummary {
        let (next, summary) = apply_frame(graph, &self.delta, frame, &self.style);
        self.delta = next;
        summary
    }

    /// Paint a freshly loaded graph for the current mode. In heat mode
    /// every node shows its count (black for an unplayed graph).
    pub fn prepare<G: GraphSurface + ?Sized>(&mut self, graph: &mut G) {
        self.repaint(graph);
    }

    /// Switch draw mode and repaint the whole graph.
    ///
    /// Heat: every node by its count. Discrete: every node back to its
    /// original colour. All edges go back to the default colour and the
    /// delta set is cleared either way. A no-op if `mode` is current.
    pub fn set_mode<G: GraphSurface + ?Sized>(&mut self, graph: &mut G, mode: DrawMode) {
        if self.style.mode == mode {
            return;
        }
        tracing::debug!(?mode, "draw mode changed");
        self.style.mode = mode;
        self.repaint(graph);
    }

    /// Zero every count and repaint, then forget the delta set.
    pub fn reset<G: GraphSurface + ?Sized>(&mut self, graph: &mut G) {
        for id in graph.node_ids() {
            if let Err(err) = graph.set_node_count(&id, 0) {
                tracing::warn!(%err, "cannot reset node count");
            }
        }
        self.repaint(graph);
    }

    /// Current draw mode.
    pub fn mode(&self) -> DrawMode {
        self.style.mode
    }

    /// Current paint style.
    pub fn style(&self) -> &PaintStyle {
        &self.style
    }

    /// The delta set from the most recent apply.
    pub fn delta(&self) -> &DeltaSet {
        &self.delta
    }

    fn repaint<G: GraphSurface + ?Sized>(&mut self, graph: &mut G) {
        for id in graph.node_ids() {
            let Some(state) = graph.node(&id) else {
                continue;
            };
            let color = match self.style.mode {
                DrawMode::Discrete => state.original_color,
                DrawMode::Heat => self.style.heat.color(state.count),
            };
            if let Err(err) = graph.set_node_color(&id, color) {
                tracing::warn!(%err, "cannot repaint node");
            }
        }
        for id in graph.edge_ids() {
            if let Err(err) = graph.set_edge_color(&id, None) {
                tracing::warn!(%err, "cannot repaint edge");
            }
        }
        self.delta.clear();
    }
}
