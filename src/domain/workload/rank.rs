use slotmap::new_key_type;

use crate::domain::topology::node::NodeId;
use crate::domain::workload::group::GroupId;

new_key_type! {
    /// Arena key for a `Rank`. Stable across the lifetime of a `Workload`.
    pub struct RankId;
}

/// A rank's position in the 3D-parallel grid and its group memberships.
#[derive(Debug, Clone)]
pub struct Rank {
    pub id: RankId,
    /// Sequential construction order, used as the "rank id" for ring
    /// ordering and for deterministic logging/output.
    pub seq: usize,
    pub pp: usize,
    pub dp: usize,
    pub tp: usize,

    pub host: Option<NodeId>,

    pub tp_group: GroupId,
    pub dp_group: GroupId,
    /// `None` for the last pipeline stage (no forward downstream).
    pub pp_fwd_group: Option<GroupId>,
    /// `None` for the first pipeline stage (no backward downstream).
    pub pp_bwd_group: Option<GroupId>,
}
