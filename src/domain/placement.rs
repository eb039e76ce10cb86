//! Binds ranks to host nodes, independently of the simulation core so a
//! scenario can swap in a different placement strategy without touching
//! the engine.

use crate::domain::topology::node::NodeKind;
use crate::domain::topology::Topology;
use crate::domain::workload::Workload;
use crate::error::{Error, Result};

/// Binds every rank to a host node, round-robin by rank sequence number
/// modulo the host count (bijective when the counts match).
pub fn place(workload: &mut Workload, topology: &mut Topology) -> Result<()> {
    let hosts = topology.nodes_of_kind(NodeKind::Host);
    if hosts.is_empty() {
        return Err(Error::Structural("topology has no HOST nodes to place ranks on".into()));
    }

    let rank_ids = workload.rank_ids();
    for rank_id in rank_ids {
        let seq = workload.rank(rank_id).seq;
        let host = hosts[seq % hosts.len()];
        workload.rank_mut(rank_id).host = Some(host);
        topology.node_mut(host).unwrap().rank = Some(rank_id);
    }

    Ok(())
}
