pub mod ecmp;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::topology::Topology;
use crate::domain::workload::Workload;
use crate::error::{Error, Result};

/// Routes every connection of every group over the topology, using ECMP
/// path selection seeded by `seed`. The RNG seed is the only source of
/// nondeterminism in path selection; a fixed seed reproduces a fixed set
/// of paths across reruns, even on topologies with multiple equal-cost
/// routes between a pair of hosts.
pub fn route(workload: &mut Workload, topology: &Topology, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);

    for group_id in workload.group_ids() {
        let connection_count = workload.group(group_id).connections.len();
        for idx in 0..connection_count {
            let (src_rank, dst_rank) = {
                let conn = &workload.group(group_id).connections[idx];
                (conn.src, conn.dst)
            };

            let src_host = workload.rank(src_rank).host.ok_or_else(|| Error::Structural(format!("rank {:?} has no host", src_rank)))?;
            let dst_host = workload.rank(dst_rank).host.ok_or_else(|| Error::Structural(format!("rank {:?} has no host", dst_rank)))?;

            let node_path = ecmp::ecmp_path(topology, src_host, dst_host, &mut rng)
                .ok_or_else(|| Error::Structural(format!("no path between hosts {:?} and {:?}", src_host, dst_host)))?;

            let mut link_path = Vec::with_capacity(node_path.len().saturating_sub(1));
            for w in node_path.windows(2) {
                let link = topology
                    .link_between(w[0], w[1])
                    .ok_or_else(|| Error::Structural(format!("no direct link {:?} -> {:?} on routed path", w[0], w[1])))?;
                link_path.push(link);
            }

            let conn = &mut workload.group_mut(group_id).connections[idx];
            conn.node_path = node_path;
            conn.link_path = link_path;
        }
    }

    Ok(())
}
