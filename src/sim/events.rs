use crate::domain::workload::group::GroupKind;
use crate::domain::workload::rank::RankId;

/// Which side of a completed transfer an event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Sent,
    Recv,
}

/// An event delivered to a `RankTask`'s queue: `<endpoint, group_kind,
/// microbatch>`. The microbatch's sign encodes direction; 0 denotes the DP
/// invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankEvent {
    pub endpoint: Endpoint,
    pub group_kind: GroupKind,
    pub microbatch: i64,
}

/// An invocation event delivered to a `GroupTask`'s queue: `<from_rank,
/// microbatch>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupEvent {
    pub from_rank: RankId,
    pub microbatch: i64,
}
