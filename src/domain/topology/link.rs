use slotmap::new_key_type;

use super::node::NodeId;

new_key_type! {
    /// Arena key for a `Link`. Stable across the lifetime of a `Topology`.
    pub struct LinkId;
}

/// A directed link with a fixed byte/sec capacity.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: LinkId,
    pub src: NodeId,
    pub dst: NodeId,
    pub capacity: f64,
}

impl Link {
    pub fn new(id: LinkId, src: NodeId, dst: NodeId, capacity: f64) -> Self {
        Self { id, src, dst, capacity }
    }
}
