//! Builds ranks, groups and connections from a `WorkloadConfig`, independent
//! of the simulation core: the engine only ever sees the finished
//! `Workload`.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::Result;

use super::config::WorkloadConfig;
use super::group::{Group, GroupId, GroupKind};
use super::rank::{Rank, RankId};
use super::Workload;

pub fn build(config: WorkloadConfig) -> Result<Workload> {
    config.validate()?;

    let mut ranks: SlotMap<RankId, Rank> = SlotMap::with_key();
    let mut groups: SlotMap<GroupId, Group> = SlotMap::with_key();

    // Phase 1: ranks, in (pp, dp, tp) nesting order -> sequential id.
    let mut rank_by_coord: HashMap<(usize, usize, usize), RankId> = HashMap::new();
    let mut seq = 0usize;
    for pp in 0..config.pp {
        for dp in 0..config.dp {
            for tp in 0..config.tp {
                let id = ranks.insert_with_key(|id| Rank {
                    id,
                    seq,
                    pp,
                    dp,
                    tp,
                    host: None,
                    tp_group: GroupId::default(),
                    dp_group: GroupId::default(),
                    pp_fwd_group: None,
                    pp_bwd_group: None,
                });
                rank_by_coord.insert((pp, dp, tp), id);
                seq += 1;
            }
        }
    }

    // Phase 2: TP groups (one per (pp, dp)) and DP groups (one per (pp, tp)).
    let mut tp_group_by_coord: HashMap<(usize, usize), GroupId> = HashMap::new();
    for pp in 0..config.pp {
        for dp in 0..config.dp {
            let id = groups.insert_with_key(|id| Group::new(id, GroupKind::Tp));
            tp_group_by_coord.insert((pp, dp), id);
        }
    }

    let mut dp_group_by_coord: HashMap<(usize, usize), GroupId> = HashMap::new();
    for pp in 0..config.pp {
        for tp in 0..config.tp {
            let id = groups.insert_with_key(|id| Group::new(id, GroupKind::Dp));
            dp_group_by_coord.insert((pp, tp), id);
        }
    }

    // Phase 3: associate ranks with their TP/DP groups.
    for (&(pp, dp, tp), &rank_id) in &rank_by_coord {
        let tp_group = tp_group_by_coord[&(pp, dp)];
        let dp_group = dp_group_by_coord[&(pp, tp)];

        let rank = &mut ranks[rank_id];
        rank.tp_group = tp_group;
        rank.dp_group = dp_group;

        groups[tp_group].ranks.push(rank_id);
        groups[dp_group].ranks.push(rank_id);
    }

    // Phase 4: PP groups, one forward/backward pair per adjacent stage per
    // (dp, tp) pipeline replica.
    for dp in 0..config.dp {
        for tp in 0..config.tp {
            for pp in 0..config.pp.saturating_sub(1) {
                let r1 = rank_by_coord[&(pp, dp, tp)];
                let r2 = rank_by_coord[&(pp + 1, dp, tp)];

                let fwd_group = groups.insert_with_key(|id| Group::new(id, GroupKind::Pp));
                groups[fwd_group].ranks = vec![r1, r2];

                let bwd_group = groups.insert_with_key(|id| Group::new(id, GroupKind::Pp));
                groups[bwd_group].ranks = vec![r2, r1];

                ranks[r1].pp_fwd_group = Some(fwd_group);
                ranks[r2].pp_bwd_group = Some(bwd_group);
            }
        }
    }

    // Phase 5: connections, after every group has its final member list.
    let group_ids: Vec<GroupId> = groups.keys().collect();
    for id in group_ids {
        groups[id].create_connections(|rank_id| ranks[rank_id].seq);
    }

    Ok(Workload { config, ranks, groups })
}
