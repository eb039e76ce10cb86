use std::collections::HashMap;

use flowsim::domain::pipeline_schedule::build;

#[test]
fn single_stage_single_microbatch_runs_forward_then_backward() {
    let table = build(1, 1);
    let expected: HashMap<(usize, i64), i64> = [((0, 1), -1)].into_iter().collect();
    assert_eq!(table, expected);
}

#[test]
fn two_stage_three_microbatch_1f1b_schedule() {
    let table = build(2, 3);

    let expected: HashMap<(usize, i64), i64> = [
        ((0, 1), 2),
        ((0, 2), -1),
        ((0, -1), 3),
        ((0, 3), -2),
        ((0, -2), -3),
        ((1, 1), -1),
        ((1, -1), 2),
        ((1, 2), -2),
        ((1, -2), 3),
        ((1, 3), -3),
    ]
    .into_iter()
    .collect();

    assert_eq!(table, expected);
}

#[test]
fn every_stage_eventually_reaches_the_final_backward_microbatch() {
    let stages = 4;
    let microbatches = 6;
    let table = build(stages, microbatches);

    // Every stage's chain, started at mb=1, must terminate with no entry
    // (the point where the rank falls through to DP) after visiting
    // exactly 2*microbatches transitions (one per forward and backward).
    for stage in 0..stages {
        let mut mb = 1i64;
        let mut steps = 0;
        while let Some(&next) = table.get(&(stage, mb)) {
            mb = next;
            steps += 1;
            assert!(steps <= 2 * microbatches, "schedule for stage {stage} did not terminate");
        }
        assert_eq!(steps, 2 * microbatches - 1);
    }
}
