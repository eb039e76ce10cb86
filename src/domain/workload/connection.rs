use crate::domain::topology::link::LinkId;
use crate::domain::topology::node::NodeId;

use super::rank::RankId;

/// A directed src->dst pair within a group, with its routed path (spec
/// section 3). `node_path`/`link_path` are filled in by the routing
/// adapter after placement; they are empty until then.
#[derive(Debug, Clone)]
pub struct Connection {
    pub src: RankId,
    pub dst: RankId,
    pub node_path: Vec<NodeId>,
    pub link_path: Vec<LinkId>,
}

impl Connection {
    pub fn new(src: RankId, dst: RankId) -> Self {
        Self { src, dst, node_path: Vec::new(), link_path: Vec::new() }
    }
}
