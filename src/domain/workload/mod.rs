pub mod builder;
pub mod config;
pub mod connection;
pub mod group;
pub mod rank;

use slotmap::SlotMap;

use config::WorkloadConfig;
use group::{Group, GroupId};
use rank::{Rank, RankId};

/// Arena owning every `Rank` and `Group` for one workload, plus the
/// parameters they were built from.
#[derive(Debug, Clone)]
pub struct Workload {
    pub config: WorkloadConfig,
    ranks: SlotMap<RankId, Rank>,
    groups: SlotMap<GroupId, Group>,
}

impl Workload {
    pub fn rank(&self, id: RankId) -> &Rank {
        &self.ranks[id]
    }

    pub fn rank_mut(&mut self, id: RankId) -> &mut Rank {
        &mut self.ranks[id]
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id]
    }

    pub fn group_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id]
    }

    /// All rank ids, in construction order.
    pub fn rank_ids(&self) -> Vec<RankId> {
        let mut ids: Vec<_> = self.ranks.iter().map(|(id, r)| (id, r.seq)).collect();
        ids.sort_by_key(|(_, seq)| *seq);
        ids.into_iter().map(|(id, _)| id).collect()
    }

    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups.keys().collect()
    }

    pub fn num_ranks(&self) -> usize {
        self.ranks.len()
    }
}
