//! Builds the 1F1B `(stage, microbatch) -> next_microbatch` schedule table
//! consumed by `RankTask`. 1F1B interleaves one forward and one backward
//! microbatch per stage once the pipeline is full, which this builds by
//! filling backward diagonals from the bottom-right, then steady-state
//! forward diagonals, then the remaining forward warm-up from the
//! top-left, then reading off each row's consecutive non-zero entries as
//! `from -> to` pairs.

use std::collections::HashMap;

/// Maps `(stage, current_microbatch)` to the next microbatch that stage
/// should run, or has no entry if there is none.
pub type ScheduleTable = HashMap<(usize, i64), i64>;

pub fn build(stages: usize, microbatches: usize) -> ScheduleTable {
    let total_cols = 2 * (microbatches + stages - 1);
    let mut grid = vec![vec![0i64; total_cols]; stages];

    // Backward diagonals: mb in [1, microbatches], anchored at the
    // bottom-right, walking up-and-right.
    for mb in 1..=microbatches {
        let row = stages - 1;
        let col = stages + 2 * (mb - 1);
        for i in 0..stages {
            grid[row - i][col + i] = -(mb as i64);
        }
    }

    // Steady-state forward diagonals: mb in [stages+1, microbatches],
    // anchored at the top-left, walking down-and-right.
    if microbatches > stages {
        for mb in (stages + 1)..=microbatches {
            let row = 0;
            let col = stages * 2 + 2 * (mb - stages - 1);
            for i in 0..stages {
                grid[row + i][col + i] = mb as i64;
            }
        }
    }

    // Warm-up forward fill: mb in [1, min(stages, microbatches)], one per
    // row, placed in the first still-empty cell from the row's own column.
    let warmup = stages.min(microbatches);
    for (row, grid_row) in grid.iter_mut().enumerate() {
        let mut col = row;
        let mut mb = 1usize;
        while mb <= warmup {
            if grid_row[col] == 0 {
                grid_row[col] = mb as i64;
                col += 1;
                mb += 1;
            } else {
                col += 1;
            }
        }
    }

    // Read off consecutive non-zero entries per row as from -> to pairs.
    let mut table = ScheduleTable::new();
    for (s, grid_row) in grid.iter().enumerate() {
        let mut i = s;
        while i < total_cols {
            let mut j = i + 1;
            while j < total_cols && grid_row[j] == 0 {
                j += 1;
            }
            if j < total_cols {
                table.insert((s, grid_row[i]), grid_row[j]);
                i = j;
            } else {
                break;
            }
        }
    }

    table
}
