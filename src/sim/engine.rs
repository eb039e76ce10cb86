use slotmap::SecondaryMap;

use crate::domain::pipeline_schedule::ScheduleTable;
use crate::domain::topology::Topology;
use crate::domain::workload::group::{GroupId, GroupKind};
use crate::domain::workload::rank::RankId;
use crate::domain::workload::Workload;
use crate::error::{Error, Result};
use crate::logger;

use super::allocator;
use super::events::{Endpoint, RankEvent};
use super::group_task::GroupTask;
use super::rank_task::{RankState, RankTask};

/// Drives the whole simulation: a round-based loop alternating an
/// event-handling fixed point, a bandwidth allocation pass, and a jump to
/// the next stable time.
pub struct Engine {
    topology: Topology,
    workload: Workload,
    schedule: ScheduleTable,
    rank_tasks: SecondaryMap<RankId, RankTask>,
    group_tasks: SecondaryMap<GroupId, GroupTask>,
    global_time: f64,
    round: usize,
}

impl Engine {
    pub fn new(topology: Topology, workload: Workload, schedule: ScheduleTable) -> Result<Self> {
        let mut rank_tasks: SecondaryMap<RankId, RankTask> = SecondaryMap::new();
        for rank_id in workload.rank_ids() {
            rank_tasks.insert(rank_id, RankTask::new(rank_id));
        }

        let mut group_tasks: SecondaryMap<GroupId, GroupTask> = SecondaryMap::new();
        for group_id in workload.group_ids() {
            let group = workload.group(group_id);
            let senders = group.connections.iter().map(|c| c.src).collect();
            let receivers = group.connections.iter().map(|c| c.dst).collect();
            group_tasks.insert(group_id, GroupTask::new(senders, receivers));
        }

        let mut engine = Self { topology, workload, schedule, rank_tasks, group_tasks, global_time: 0.0, round: 0 };
        engine.bootstrap();
        Ok(engine)
    }

    /// Seeds every pipeline boundary rank with the synthetic events that
    /// make the pipeline appear to have infinite upstream input and a
    /// draining downstream sink: the first stage receives a forward
    /// "arrival" for every microbatch, and the last stage receives every
    /// backward "arrival".
    ///
    /// Both boundary stages also get a synthetic final backward SENT. The
    /// last stage's makes up for it doing backward work but having no
    /// downstream PP group to transmit its very last backward into, so
    /// nothing would otherwise carry that completion back to it. The first
    /// stage needs the same treatment for a different reason: it has no
    /// backward PP group at all (there's no stage before it to send to), so
    /// it can never generate its own DP_WAIT -> DP_COMM trigger naturally —
    /// without this it would sit in DP_WAIT forever and never reach DONE,
    /// which would make every multi-stage run look perpetually unfinished.
    fn bootstrap(&mut self) {
        let last_stage = self.workload.config.pp - 1;
        let microbatches = self.workload.config.microbatches as i64;

        for rank_id in self.workload.rank_ids() {
            let rank = self.workload.rank(rank_id);
            let tasks = &mut self.rank_tasks[rank_id];

            if rank.pp == 0 {
                for mb in 1..=microbatches {
                    tasks.events.push(RankEvent { endpoint: Endpoint::Recv, group_kind: GroupKind::Pp, microbatch: mb });
                }
                tasks.events.push(RankEvent { endpoint: Endpoint::Sent, group_kind: GroupKind::Pp, microbatch: -microbatches });
            }
            if rank.pp == last_stage {
                for mb in 1..=microbatches {
                    tasks.events.push(RankEvent { endpoint: Endpoint::Recv, group_kind: GroupKind::Pp, microbatch: -mb });
                }
                tasks.events.push(RankEvent { endpoint: Endpoint::Sent, group_kind: GroupKind::Pp, microbatch: -microbatches });
            }
        }
    }

    /// Runs to completion and returns the final global time. Terminates the
    /// moment no task can progress (`min_stable_time` is infinite); at that
    /// point every rank having reached `Done` is a consequence of a
    /// correctly wired workload, not a separate condition the loop waits
    /// on, so it's checked only once, on the way out, to tell a clean finish
    /// from a genuine deadlock.
    pub fn run(&mut self) -> Result<f64> {
        loop {
            let consumed = self.fixed_point()?;

            allocator::allocate(&self.topology, &mut self.group_tasks);

            let dt = self.min_stable_time();
            if !dt.is_finite() {
                if self.all_done() {
                    break;
                }
                return Err(Error::Deadlock(self.describe_stuck_tasks()));
            }

            self.global_time += dt;
            self.advance(dt);
            self.round += 1;
            logger::log_round(self.round, consumed, self.global_time, dt);
        }

        Ok(self.global_time)
    }

    /// Repeatedly hands every task's queue to it until a full pass consumes
    /// nothing. A single invocation landing in one task's queue can free up
    /// another's, so this must iterate to a fixed point rather than run once.
    /// Returns the total number of events consumed across every pass.
    fn fixed_point(&mut self) -> Result<usize> {
        let mut total = 0usize;
        loop {
            let mut consumed = 0usize;

            let workload = &self.workload;
            let schedule = &self.schedule;
            let rank_tasks = &mut self.rank_tasks;
            let group_tasks = &mut self.group_tasks;

            for rank_id in workload.rank_ids() {
                let rank = workload.rank(rank_id);
                consumed += rank_tasks[rank_id].handle_events(rank, &workload.config, schedule, group_tasks)?;
            }
            for group_id in workload.group_ids() {
                let group = workload.group(group_id);
                consumed += group_tasks[group_id].handle_events(group, &workload.config)?;
            }

            total += consumed;
            if consumed == 0 {
                break;
            }
        }
        Ok(total)
    }

    fn all_done(&self) -> bool {
        self.rank_tasks.values().all(|t| t.state == RankState::Done)
    }

    fn min_stable_time(&self) -> f64 {
        let ranks = self.rank_tasks.values().map(RankTask::stable_time);
        let groups = self.group_tasks.values().map(GroupTask::stable_time);
        ranks.chain(groups).fold(f64::INFINITY, f64::min)
    }

    /// Builds a diagnostic listing every rank not yet `Done` and every group
    /// still holding a collective, so a deadlock report names the stuck
    /// tasks rather than just the timestamp it was detected at.
    fn describe_stuck_tasks(&self) -> String {
        let mut stuck_ranks: Vec<String> = self
            .rank_tasks
            .iter()
            .filter(|(_, task)| task.state != RankState::Done)
            .map(|(id, task)| format!("{:?} in {:?} (microbatch {})", id, task.state, task.microbatch))
            .collect();
        stuck_ranks.sort();

        let mut stuck_groups: Vec<String> = self
            .group_tasks
            .iter()
            .filter(|(_, task)| task.has_pending_work())
            .map(|(id, _)| format!("{:?}", id))
            .collect();
        stuck_groups.sort();

        format!(
            "no task can progress at time {:.6}; stuck ranks: [{}]; stuck groups: [{}]",
            self.global_time,
            stuck_ranks.join(", "),
            stuck_groups.join(", ")
        )
    }

    fn advance(&mut self, dt: f64) {
        let workload = &self.workload;
        let rank_tasks = &mut self.rank_tasks;
        let group_tasks = &mut self.group_tasks;

        for rank_id in workload.rank_ids() {
            rank_tasks[rank_id].progress(dt, workload.rank(rank_id), group_tasks);
        }
        for group_id in workload.group_ids() {
            group_tasks[group_id].progress(dt, workload.group(group_id), rank_tasks);
        }
    }

    pub fn global_time(&self) -> f64 {
        self.global_time
    }
}
