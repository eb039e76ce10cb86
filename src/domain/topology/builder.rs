//! Topology generators. The simulation core never calls into this module,
//! it only consumes the `Topology` that comes out of it, so a scenario can
//! add a new generator without touching the engine.

use crate::error::Result;

use super::node::NodeKind;
use super::Topology;

/// A single switch connecting `num_hosts` hosts, each with a bidirectional
/// link of the given capacity. Used by scenario S4/S5/S6 (unique-path
/// topology).
pub fn one_big_switch(num_hosts: usize, capacity: f64) -> Result<Topology> {
    let mut topo = Topology::new();

    let hosts: Vec<_> = (0..num_hosts).map(|_| topo.add_node(NodeKind::Host)).collect();
    let switch = topo.add_node(NodeKind::Tor);

    for &host in &hosts {
        topo.add_link(host, switch, capacity)?;
        topo.add_link(switch, host, capacity)?;
    }

    Ok(topo)
}

/// A three-tier fat-tree: hosts attach to ToRs, ToRs attach to AGGs within
/// their pod, and AGGs attach to the first `switch_radix / 2` core
/// switches (not partitioned across pods, so AGGs in different pods share
/// core uplinks).
pub fn fat_tree(switch_radix: usize, pods: usize, capacity: f64) -> Result<Topology> {
    let half = switch_radix / 2;
    let num_hosts = pods * half * half;
    let num_tor = pods * half;
    let num_agg = pods * half;

    let mut topo = Topology::new();

    let hosts: Vec<_> = (0..num_hosts).map(|_| topo.add_node(NodeKind::Host)).collect();
    let tors: Vec<_> = (0..num_tor).map(|_| topo.add_node(NodeKind::Tor)).collect();
    let aggs: Vec<_> = (0..num_agg).map(|_| topo.add_node(NodeKind::Agg)).collect();
    let cores: Vec<_> = (0..(switch_radix * switch_radix / 4)).map(|_| topo.add_node(NodeKind::Core)).collect();

    for (i, &host) in hosts.iter().enumerate() {
        let tor = tors[i / half];
        topo.add_link(host, tor, capacity)?;
        topo.add_link(tor, host, capacity)?;
    }

    for (i, &tor) in tors.iter().enumerate() {
        let pod = i / half;
        for j in 0..half {
            let agg = aggs[pod * half + j];
            topo.add_link(tor, agg, capacity)?;
            topo.add_link(agg, tor, capacity)?;
        }
    }

    for &agg in &aggs {
        for j in 0..half {
            let core = cores[j];
            topo.add_link(agg, core, capacity)?;
            topo.add_link(core, agg, capacity)?;
        }
    }

    Ok(topo)
}
