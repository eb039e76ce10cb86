use flowsim::api::scenario::{Scenario, TopologyChoice};
use flowsim::domain::workload::config::WorkloadConfig;

fn base_workload() -> WorkloadConfig {
    WorkloadConfig {
        pp: 1,
        dp: 1,
        tp: 1,
        microbatches: 1,
        fwd_comp_time: 0.0,
        bwd_comp_time: 0.0,
        fwd_tp_size: 0.0,
        bwd_tp_size: 0.0,
        fwd_pp_size: 0.0,
        bwd_pp_size: 0.0,
        dp_size: 0.0,
    }
}

fn single_rank_scenario() -> Scenario {
    Scenario {
        topology: TopologyChoice::OneBigSwitch { num_hosts: 1, capacity: 10.0 },
        workload: WorkloadConfig {
            pp: 1,
            dp: 1,
            tp: 1,
            microbatches: 1,
            fwd_comp_time: 1.0,
            bwd_comp_time: 1.0,
            fwd_tp_size: 0.0,
            bwd_tp_size: 0.0,
            fwd_pp_size: 0.0,
            bwd_pp_size: 0.0,
            dp_size: 0.0,
        },
        seed: 1,
    }
}

/// A single rank with no pipeline/tensor/data parallelism degenerates to
/// one forward compute pass followed by one backward compute pass, with
/// every collective a zero-size self-loop. The only cost is compute time.
#[test]
fn single_rank_single_microbatch_costs_exactly_forward_plus_backward_time() {
    let global_time = flowsim::run_scenario(&single_rank_scenario()).unwrap();
    assert!((global_time - 2.0).abs() < 1e-6, "expected 2.0, got {global_time}");
}

#[test]
fn same_seed_reproduces_the_same_global_time() {
    let a = flowsim::run_scenario(&single_rank_scenario()).unwrap();
    let b = flowsim::run_scenario(&single_rank_scenario()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn global_time_is_monotone_in_compute_time() {
    let mut slower = single_rank_scenario();
    slower.workload.fwd_comp_time = 5.0;

    let fast = flowsim::run_scenario(&single_rank_scenario()).unwrap();
    let slow = flowsim::run_scenario(&slower).unwrap();
    assert!(slow > fast);
}

#[test]
fn rejects_a_scenario_with_zero_parallelism_degree() {
    let mut scenario = single_rank_scenario();
    scenario.workload.tp = 0;
    let err = flowsim::run_scenario(&scenario).unwrap_err();
    assert!(matches!(err, flowsim::error::Error::Structural(_)));
}

// The scenarios below each have a closed-form expected `global_time` that
// can be checked by hand, so they double as a regression net for the
// engine, allocator, and bootstrap wiring all at once.

/// No parallelism at all, M=1, zero network cost: the only work is one
/// forward compute pass and one backward compute pass back to back.
/// Expected global_time = 0.1 + 0.2 = 0.3.
#[test]
fn s1_single_rank_single_microbatch() {
    let scenario = Scenario {
        topology: TopologyChoice::OneBigSwitch { num_hosts: 1, capacity: 1.0 },
        workload: WorkloadConfig { fwd_comp_time: 0.1, bwd_comp_time: 0.2, ..base_workload() },
        seed: 1,
    };
    let global_time = flowsim::run_scenario(&scenario).unwrap();
    assert!((global_time - 0.3).abs() < 1e-6, "expected 0.3, got {global_time}");
}

/// A two-stage pipeline with a single microbatch walks through six
/// one-second legs in sequence: stage 0 forward compute, the PP forward
/// transfer, stage 1 forward compute, stage 1 backward compute, the PP
/// backward transfer, and stage 0 backward compute. Sizing fwd/bwd PP
/// transfers at 100 units over a 100-capacity link makes each transfer
/// cost exactly 1.0s, matching the compute legs.
#[test]
fn s2_two_stage_pipeline_single_microbatch() {
    let scenario = Scenario {
        topology: TopologyChoice::OneBigSwitch { num_hosts: 2, capacity: 100.0 },
        workload: WorkloadConfig {
            pp: 2,
            fwd_comp_time: 1.0,
            bwd_comp_time: 1.0,
            fwd_pp_size: 100.0,
            bwd_pp_size: 100.0,
            ..base_workload()
        },
        seed: 1,
    };
    let global_time = flowsim::run_scenario(&scenario).unwrap();
    assert!((global_time - 6.0).abs() < 1e-6, "expected 6.0, got {global_time}");
}

/// A two-stage, three-microbatch pipeline exercises the full 1F1B
/// warm-up/steady-state/cool-down schedule rather than just the trivial
/// M=1 case. With every PP transfer costing nothing, each of the
/// `M + PP - 1` micro-slots the pipeline drains still pays one forward and
/// one backward compute pass, so global_time = 2 * (M + PP - 1) * 1.0s.
#[test]
fn s3_two_stage_pipeline_three_microbatches() {
    let scenario = Scenario {
        topology: TopologyChoice::OneBigSwitch { num_hosts: 2, capacity: 1.0 },
        workload: WorkloadConfig { pp: 2, microbatches: 3, fwd_comp_time: 1.0, bwd_comp_time: 1.0, ..base_workload() },
        seed: 1,
    };
    let global_time = flowsim::run_scenario(&scenario).unwrap();
    assert!((global_time - 8.0).abs() < 1e-6, "expected 8.0, got {global_time}");
}

/// A 4-way TP ring with no compute cost isolates the forward all-reduce's
/// cost: each of the 4 ring flows is bottlenecked by its host uplink, so
/// the all-reduce takes `fwd_tp_size * 2*(TP-1)/TP / capacity` seconds.
/// With fwd_tp_size=4.0 and capacity=1.0 that's 4.0 * 1.5 = 6.0s.
#[test]
fn s4_tensor_parallel_ring_all_reduce_bottleneck() {
    let scenario = Scenario {
        topology: TopologyChoice::OneBigSwitch { num_hosts: 4, capacity: 1.0 },
        workload: WorkloadConfig { tp: 4, fwd_tp_size: 4.0, ..base_workload() },
        seed: 1,
    };
    let global_time = flowsim::run_scenario(&scenario).unwrap();
    assert!((global_time - 6.0).abs() < 1e-6, "expected 6.0, got {global_time}");
}

/// Two data-parallel ranks with every other cost zeroed out isolate the DP
/// all-reduce: a ring of size 2 has volume factor 2*(2-1)/2 = 1, so
/// global_time is exactly dp_size / capacity = 5.0 / 2.0 = 2.5.
#[test]
fn s5_data_parallel_all_reduce_only() {
    let scenario = Scenario {
        topology: TopologyChoice::OneBigSwitch { num_hosts: 2, capacity: 2.0 },
        workload: WorkloadConfig { dp: 2, dp_size: 5.0, ..base_workload() },
        seed: 1,
    };
    let global_time = flowsim::run_scenario(&scenario).unwrap();
    assert!((global_time - 2.5).abs() < 1e-6, "expected 2.5, got {global_time}");
}

/// Reruns S4's TP ring on a one-big-switch, where every rank pair has
/// exactly one path, so different ECMP seeds cannot change which path gets
/// picked and global_time must be identical across them. On a fat-tree,
/// where multiple core paths exist, the same seed must still reproduce the
/// same global_time on every rerun.
#[test]
fn s6_global_time_is_independent_of_ecmp_seed_on_a_unique_path_topology() {
    let scenario = |seed| Scenario {
        topology: TopologyChoice::OneBigSwitch { num_hosts: 4, capacity: 1.0 },
        workload: WorkloadConfig { tp: 4, fwd_tp_size: 4.0, ..base_workload() },
        seed,
    };
    let a = flowsim::run_scenario(&scenario(1)).unwrap();
    let b = flowsim::run_scenario(&scenario(2)).unwrap();
    assert!((a - b).abs() < 1e-6, "expected identical global_time across seeds, got {a} and {b}");
}

#[test]
fn s6_global_time_is_reproducible_across_reruns_with_the_same_seed_on_a_multi_path_topology() {
    let scenario = Scenario {
        topology: TopologyChoice::FatTree { switch_radix: 4, pods: 1, capacity: 1.0 },
        workload: WorkloadConfig { tp: 4, fwd_tp_size: 4.0, ..base_workload() },
        seed: 7,
    };
    let a = flowsim::run_scenario(&scenario).unwrap();
    let b = flowsim::run_scenario(&scenario).unwrap();
    assert_eq!(a, b);
}
