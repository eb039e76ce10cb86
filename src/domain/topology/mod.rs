pub mod builder;
pub mod link;
pub mod node;

use slotmap::SlotMap;

use crate::error::{Error, Result};
use link::{Link, LinkId};
use node::{Node, NodeId, NodeKind};

/// Arena owning every `Node` and `Link` in the topology. Entities are never
/// removed during a simulation run, so plain `SlotMap` indexing gives O(1)
/// bidirectional navigation without reference cycles.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: SlotMap<NodeId, Node>,
    links: SlotMap<LinkId, Link>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.insert_with_key(|id| Node::new(id, kind))
    }

    /// Adds a directed link and registers it on the source node's outgoing
    /// list. Fails structurally if either endpoint is unknown or the
    /// capacity is not a finite, non-negative number.
    pub fn add_link(&mut self, src: NodeId, dst: NodeId, capacity: f64) -> Result<LinkId> {
        if !self.nodes.contains_key(src) || !self.nodes.contains_key(dst) {
            return Err(Error::Structural(format!("link endpoint not in node set: {:?} -> {:?}", src, dst)));
        }
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(Error::Numeric(format!("link capacity must be finite and non-negative, got {}", capacity)));
        }

        let id = self.links.insert_with_key(|id| Link::new(id, src, dst, capacity));
        self.nodes[src].outgoing_links.push(id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.iter().filter(|(_, n)| n.kind == kind).map(|(id, _)| id).collect();
        ids.sort();
        ids
    }

    pub fn outgoing_links(&self, node: NodeId) -> &[LinkId] {
        self.nodes.get(node).map(|n| n.outgoing_links.as_slice()).unwrap_or(&[])
    }

    /// Finds the link `src -> dst` among `src`'s outgoing links: the link
    /// carrying traffic for hop `i -> i+1` of a routed node path.
    pub fn link_between(&self, src: NodeId, dst: NodeId) -> Option<LinkId> {
        self.outgoing_links(src).iter().copied().find(|&id| self.links[id].dst == dst)
    }
}

impl std::ops::Index<NodeId> for Topology {
    type Output = Node;
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

impl std::ops::Index<LinkId> for Topology {
    type Output = Link;
    fn index(&self, id: LinkId) -> &Link {
        &self.links[id]
    }
}
