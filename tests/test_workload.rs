use flowsim::domain::workload::builder::build;
use flowsim::domain::workload::config::WorkloadConfig;
use flowsim::domain::workload::group::GroupKind;
use flowsim::error::Error;

fn config(pp: usize, dp: usize, tp: usize, microbatches: usize) -> WorkloadConfig {
    WorkloadConfig {
        pp,
        dp,
        tp,
        microbatches,
        fwd_comp_time: 1.0,
        bwd_comp_time: 1.0,
        fwd_tp_size: 100.0,
        bwd_tp_size: 100.0,
        fwd_pp_size: 50.0,
        bwd_pp_size: 50.0,
        dp_size: 200.0,
    }
}

#[test]
fn three_d_parallel_grid_has_the_expected_rank_and_group_counts() {
    let cfg = config(2, 2, 2, 2);
    let workload = build(cfg).unwrap();

    assert_eq!(workload.num_ranks(), 8);
    // TP groups: one per (pp, dp) = 2*2 = 4, each with tp=2 ranks.
    // DP groups: one per (pp, tp) = 2*2 = 4, each with dp=2 ranks.
    // PP groups: (pp-1) adjacent stage pairs * dp * tp * 2 (fwd+bwd) = 1*2*2*2 = 8.
    let tp_groups: Vec<_> = workload.group_ids().into_iter().map(|id| workload.group(id)).filter(|g| g.kind == GroupKind::Tp).collect();
    let dp_groups: Vec<_> = workload.group_ids().into_iter().map(|id| workload.group(id)).filter(|g| g.kind == GroupKind::Dp).collect();
    let pp_groups: Vec<_> = workload.group_ids().into_iter().map(|id| workload.group(id)).filter(|g| g.kind == GroupKind::Pp).collect();

    assert_eq!(tp_groups.len(), 4);
    assert_eq!(dp_groups.len(), 4);
    assert_eq!(pp_groups.len(), 8);

    for g in &tp_groups {
        assert_eq!(g.ranks.len(), 2);
        assert_eq!(g.connections.len(), 2);
    }
    for g in &dp_groups {
        assert_eq!(g.ranks.len(), 2);
        assert_eq!(g.connections.len(), 2);
    }
    for g in &pp_groups {
        assert_eq!(g.ranks.len(), 2);
        assert_eq!(g.connections.len(), 1);
    }
}

#[test]
fn single_rank_workload_has_no_pp_groups_and_self_loop_rings() {
    let workload = build(config(1, 1, 1, 1)).unwrap();

    assert_eq!(workload.num_ranks(), 1);
    assert!(workload.group_ids().into_iter().all(|id| workload.group(id).kind != GroupKind::Pp));

    let rank_id = workload.rank_ids()[0];
    let rank = workload.rank(rank_id);
    assert!(rank.pp_fwd_group.is_none());
    assert!(rank.pp_bwd_group.is_none());

    let tp_group = workload.group(rank.tp_group);
    assert_eq!(tp_group.connections.len(), 1);
    assert_eq!(tp_group.connections[0].src, rank_id);
    assert_eq!(tp_group.connections[0].dst, rank_id);
}

#[test]
fn validate_rejects_fewer_microbatches_than_pipeline_stages() {
    let cfg = config(4, 1, 1, 2);
    let err = build(cfg).unwrap_err();
    assert!(matches!(err, Error::Structural(_)));
}

#[test]
fn validate_rejects_negative_sizes() {
    let mut cfg = config(1, 1, 1, 1);
    cfg.dp_size = -1.0;
    let err = build(cfg).unwrap_err();
    assert!(matches!(err, Error::Numeric(_)));
}
