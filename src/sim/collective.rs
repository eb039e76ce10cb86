use crate::domain::workload::config::WorkloadConfig;
use crate::domain::workload::group::{Group, GroupKind};
use crate::error::{Error, Result};

use super::flow::Flow;

/// One in-flight invocation of a group's collective operation: a microbatch
/// id and the flows carrying it over every connection in the group.
/// `accumulated_invocations` reaching `accumulated_size` is what promotes a
/// `GroupTask`'s pending collective from accumulating to waiting.
#[derive(Debug, Clone)]
pub struct Collective {
    pub microbatch: i64,
    pub flows: Vec<Flow>,
    pub accumulated_invocations: usize,
    pub accumulated_size: usize,
}

impl Collective {
    /// Builds a new collective for `group`'s ring (TP/DP) or single pair
    /// (PP), sizing each flow accordingly. The first invocation that
    /// creates a collective already counts towards its
    /// `accumulated_invocations`, so it starts at 1, not 0.
    pub fn new(group: &Group, microbatch: i64, config: &WorkloadConfig) -> Result<Self> {
        let (per_flow_size, accumulated_size) = match group.kind {
            GroupKind::Tp => {
                let base = if microbatch > 0 { config.fwd_tp_size } else { config.bwd_tp_size };
                (ring_volume(base, group.ranks.len()), group.ranks.len())
            }
            GroupKind::Dp => (ring_volume(config.dp_size, group.ranks.len()), group.ranks.len()),
            GroupKind::Pp => {
                let base = if microbatch > 0 { config.fwd_pp_size } else { config.bwd_pp_size };
                (base, 1)
            }
        };

        let mut flows = Vec::with_capacity(group.connections.len());
        for conn in &group.connections {
            let src = *conn.node_path.first().ok_or_else(|| {
                Error::Structural("collective built from an unrouted connection".into())
            })?;
            let dst = *conn.node_path.last().unwrap();
            flows.push(Flow::new(src, dst, conn.link_path.clone(), per_flow_size));
        }

        Ok(Self { microbatch, flows, accumulated_invocations: 1, accumulated_size })
    }

    /// Minimum time until any flow in this collective finishes at its
    /// currently assigned throughput. Group-atomic freezing means every
    /// flow in a ring finishes together, so the minimum coincides with any
    /// single flow's value; we still take the true minimum for robustness.
    pub fn stable_time(&self) -> f64 {
        self.flows.iter().map(Flow::stable_time).fold(f64::INFINITY, f64::min)
    }

    pub fn progress(&mut self, dt: f64) {
        for flow in &mut self.flows {
            flow.progress(dt);
        }
    }

    /// True once every flow has drained. Ring-atomic freezing means flows
    /// finish together, so checking the first flow would do, but checking
    /// all is no more expensive and does not rely on that invariant
    /// holding.
    pub fn is_complete(&self) -> bool {
        self.flows.iter().all(|f| f.remaining_size <= 1e-6)
    }
}

/// Ring all-reduce moves `2(N-1)/N` times the logical payload size per
/// link: each of the N members both sends and receives N-1 chunks around
/// the ring. `N == 1` degenerates to a zero-hop self-loop with no real
/// transfer, so the factor is simply zero.
fn ring_volume(base_size: f64, n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        base_size * 2.0 * (n - 1) as f64 / n as f64
    }
}
