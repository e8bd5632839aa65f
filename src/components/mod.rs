//! UI components: the network diagram and the related-people sidebar.

pub mod force_graph;
pub mod related_list;
