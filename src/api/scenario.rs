//! The top-level input document: one JSON file bundling a topology choice,
//! a workload description, and the routing RNG seed, deserialized then
//! lowered into the domain types the rest of the crate works with.

use serde::{Deserialize, Serialize};

use crate::domain::topology::builder;
use crate::domain::topology::node::NodeKind;
use crate::domain::topology::Topology;
use crate::domain::workload::config::WorkloadConfig;
use crate::error::{Error, Result};

/// One node in an explicit topology document: a kind and its directed links
/// to other nodes by index into the document's node list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDto {
    pub kind: NodeKind,
}

/// One directed link in an explicit topology document, referencing its
/// endpoints by index into the document's node list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDto {
    pub src: usize,
    pub dst: usize,
    pub capacity: f64,
}

/// A topology given as an explicit sequence of nodes and directed links,
/// for scenarios that don't fit either generator's shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyDto {
    pub nodes: Vec<NodeDto>,
    pub links: Vec<LinkDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyChoice {
    OneBigSwitch { num_hosts: usize, capacity: f64 },
    FatTree { switch_radix: usize, pods: usize, capacity: f64 },
    Explicit(TopologyDto),
}

impl TopologyChoice {
    pub fn build(&self) -> Result<Topology> {
        match self {
            TopologyChoice::OneBigSwitch { num_hosts, capacity } => builder::one_big_switch(*num_hosts, *capacity),
            TopologyChoice::FatTree { switch_radix, pods, capacity } => builder::fat_tree(*switch_radix, *pods, *capacity),
            TopologyChoice::Explicit(dto) => {
                let mut topo = Topology::new();
                let node_ids: Vec<_> = dto.nodes.iter().map(|n| topo.add_node(n.kind)).collect();
                for link in &dto.links {
                    let src = *node_ids.get(link.src).ok_or_else(|| {
                        Error::Structural(format!("link references unknown node index {}", link.src))
                    })?;
                    let dst = *node_ids.get(link.dst).ok_or_else(|| {
                        Error::Structural(format!("link references unknown node index {}", link.dst))
                    })?;
                    topo.add_link(src, dst, link.capacity)?;
                }
                Ok(topo)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub topology: TopologyChoice,
    pub workload: WorkloadConfig,
    /// Seeds the ECMP path selection; the only source of routing
    /// nondeterminism, so a fixed seed makes a scenario's path choices
    /// reproducible.
    pub seed: u64,
}
