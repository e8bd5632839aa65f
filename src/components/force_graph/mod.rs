//! Force-directed node-link diagram on an HTML canvas.
//!
//! Nodes are laid out by the `force_graph` physics simulation. The canvas
//! supports dragging nodes, panning, zooming, hover highlighting, tooltips and
//! node selection.

mod component;
mod render;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use types::{GraphData, GraphLink, GraphNode, NodeKind};
