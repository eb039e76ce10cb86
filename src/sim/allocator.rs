use std::collections::{HashMap, HashSet};

use slotmap::SecondaryMap;

use crate::domain::topology::link::LinkId;
use crate::domain::topology::Topology;
use crate::domain::workload::group::GroupId;

use super::group_task::GroupTask;

/// Runs max-min fair water-filling over every flow of every group's active
/// collective, freezing whole collectives at once rather than individual
/// flows: ring all-reduce only preserves its equal-throughput guarantee if
/// every flow in the ring is saturated together, so a flow on a saturated
/// link drags its entire collective out of the water-filling pass in the
/// same step.
pub fn allocate(topology: &Topology, group_tasks: &mut SecondaryMap<GroupId, GroupTask>) {
    let mut active_flows: Vec<(GroupId, usize)> = Vec::new();
    for (group_id, task) in group_tasks.iter_mut() {
        if let Some(collective) = task.active.as_mut() {
            for (idx, flow) in collective.flows.iter_mut().enumerate() {
                flow.throughput = 0.0;
                active_flows.push((group_id, idx));
            }
        }
    }

    let mut link_flows: HashMap<LinkId, Vec<(GroupId, usize)>> = HashMap::new();
    for &(group_id, idx) in &active_flows {
        let flow = &group_tasks[group_id].active.as_ref().unwrap().flows[idx];
        for &link in &flow.link_path {
            link_flows.entry(link).or_default().push((group_id, idx));
        }
    }

    let mut link_throughput: HashMap<LinkId, f64> = link_flows.keys().map(|&l| (l, 0.0)).collect();
    let mut active_links: HashSet<LinkId> = link_flows.keys().copied().collect();

    while !active_flows.is_empty() && !active_links.is_empty() {
        let mut min_aug = f64::INFINITY;
        for &link in &active_links {
            let remaining = topology[link].capacity - link_throughput[&link];
            let share = remaining / link_flows[&link].len() as f64;
            if share < min_aug {
                min_aug = share;
            }
        }

        for &(group_id, idx) in &active_flows {
            group_tasks[group_id].active.as_mut().unwrap().flows[idx].throughput += min_aug;
        }
        for &link in &active_links {
            let n = link_flows[&link].len() as f64;
            *link_throughput.get_mut(&link).unwrap() += min_aug * n;
        }

        let frozen_links: Vec<LinkId> = active_links
            .iter()
            .copied()
            .filter(|l| link_throughput[l] >= topology[*l].capacity - 1e-6)
            .collect();

        let mut frozen_groups: HashSet<GroupId> = HashSet::new();
        for link in frozen_links {
            for &(group_id, _) in &link_flows[&link] {
                frozen_groups.insert(group_id);
            }
            active_links.remove(&link);
        }

        active_flows.retain(|(g, _)| !frozen_groups.contains(g));
    }

    // Flows that never touched a saturated link (including zero-hop
    // self-loops with an empty path) are unconstrained for this round.
    for (group_id, idx) in active_flows {
        group_tasks[group_id].active.as_mut().unwrap().flows[idx].throughput = f64::INFINITY;
    }
}
