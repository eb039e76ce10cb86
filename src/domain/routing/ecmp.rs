//! Equal-cost multi-path selection: enumerate every simple path between two
//! nodes by BFS, then pick one uniformly at random using an injected seeded
//! RNG so routing decisions stay reproducible across runs.

use std::collections::{HashSet, VecDeque};

use rand::Rng;

use crate::domain::topology::node::NodeId;
use crate::domain::topology::Topology;

pub fn ecmp_path(topology: &Topology, src: NodeId, dst: NodeId, rng: &mut impl Rng) -> Option<Vec<NodeId>> {
    let all_paths = all_simple_paths(topology, src, dst);
    if all_paths.is_empty() {
        return None;
    }

    let idx = rng.random_range(0..all_paths.len());
    Some(all_paths[idx].clone())
}

/// BFS over partial paths: a node already visited along the current path is
/// never revisited, so every discovered path is simple. Visitation is
/// tracked per path, not per BFS level, so the same node can appear on
/// multiple candidate paths as long as it's not repeated within one of
/// them.
fn all_simple_paths(topology: &Topology, src: NodeId, dst: NodeId) -> Vec<Vec<NodeId>> {
    let mut all_paths = Vec::new();
    let mut queue: VecDeque<Vec<NodeId>> = VecDeque::new();
    queue.push_back(vec![src]);

    while let Some(path) = queue.pop_front() {
        let current = *path.last().unwrap();

        if current == dst {
            all_paths.push(path);
            continue;
        }

        let mut visited: HashSet<NodeId> = path.iter().copied().collect();
        visited.insert(current);

        for &link_id in topology.outgoing_links(current) {
            let neighbor = topology[link_id].dst;
            if !visited.contains(&neighbor) {
                let mut next = path.clone();
                next.push(neighbor);
                queue.push_back(next);
            }
        }
    }

    all_paths
}
