use flowsim::domain::topology::builder::{fat_tree, one_big_switch};
use flowsim::domain::topology::node::NodeKind;

#[test]
fn one_big_switch_wires_every_host_to_the_shared_tor() {
    let topo = one_big_switch(4, 10.0).unwrap();

    let hosts = topo.nodes_of_kind(NodeKind::Host);
    let tors = topo.nodes_of_kind(NodeKind::Tor);
    assert_eq!(hosts.len(), 4);
    assert_eq!(tors.len(), 1);

    for &host in &hosts {
        assert_eq!(topo.outgoing_links(host).len(), 1);
        let link = topo.link(topo.outgoing_links(host)[0]).unwrap();
        assert_eq!(link.dst, tors[0]);
        assert_eq!(link.capacity, 10.0);
    }
    assert_eq!(topo.outgoing_links(tors[0]).len(), 4);
}

#[test]
fn one_big_switch_rejects_non_finite_capacity() {
    let err = one_big_switch(2, f64::NAN).unwrap_err();
    assert!(matches!(err, flowsim::error::Error::Numeric(_)));
}

#[test]
fn fat_tree_tier_counts_follow_switch_radix_and_pods() {
    let topo = fat_tree(4, 2, 1.0).unwrap();

    // half = 2; hosts = pods * half * half = 2*2*2 = 8; tor = agg = pods*half = 4.
    assert_eq!(topo.nodes_of_kind(NodeKind::Host).len(), 8);
    assert_eq!(topo.nodes_of_kind(NodeKind::Tor).len(), 4);
    assert_eq!(topo.nodes_of_kind(NodeKind::Agg).len(), 4);
    // cores = switch_radix^2 / 4 = 16/4 = 4.
    assert_eq!(topo.nodes_of_kind(NodeKind::Core).len(), 4);

    for &tor in &topo.nodes_of_kind(NodeKind::Tor) {
        // 2 hosts + 2 aggs, each direction, = 2 up + 2 down links.
        assert_eq!(topo.outgoing_links(tor).len(), 4);
    }
}
