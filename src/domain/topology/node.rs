use slotmap::new_key_type;

use crate::domain::workload::rank::RankId;

new_key_type! {
    /// Arena key for a `Node`. Stable across the lifetime of a `Topology`.
    pub struct NodeId;
}

/// Kind of a topology node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    Host,
    Tor,
    Agg,
    Core,
}

/// A node in the datacenter topology. Immutable during simulation; the set
/// of outgoing links and the bound rank are fixed once the topology and
/// placement are constructed.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub outgoing_links: Vec<super::link::LinkId>,
    pub rank: Option<RankId>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self { id, kind, outgoing_links: Vec::new(), rank: None }
    }
}
