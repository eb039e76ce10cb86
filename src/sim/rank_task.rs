use slotmap::SecondaryMap;

use crate::domain::pipeline_schedule::ScheduleTable;
use crate::domain::workload::config::WorkloadConfig;
use crate::domain::workload::group::{GroupId, GroupKind};
use crate::domain::workload::rank::{Rank, RankId};
use crate::error::{Error, Result};

use super::events::{Endpoint, GroupEvent, RankEvent};
use super::group_task::GroupTask;

/// A rank's position in the 1F1B state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankState {
    PpWait,
    Compute,
    TpComm,
    DpWait,
    DpComm,
    Done,
}

/// The per-rank state machine driving one pipeline stage through its
/// forward/backward microbatches and the TP/DP collectives they trigger.
#[derive(Debug, Clone)]
pub struct RankTask {
    pub rank: RankId,
    pub state: RankState,
    pub microbatch: i64,
    pub remaining_time: f64,
    pub events: Vec<RankEvent>,
}

impl RankTask {
    pub fn new(rank: RankId) -> Self {
        Self { rank, state: RankState::PpWait, microbatch: 1, remaining_time: 0.0, events: Vec::new() }
    }

    pub fn stable_time(&self) -> f64 {
        if self.state == RankState::Compute { self.remaining_time } else { f64::INFINITY }
    }

    /// Counts down compute time; on completion enters TP_COMM and invokes
    /// the rank's TP group.
    pub fn progress(&mut self, dt: f64, rank: &Rank, group_tasks: &mut SecondaryMap<GroupId, GroupTask>) {
        if self.state != RankState::Compute {
            return;
        }
        self.remaining_time -= dt;
        if self.remaining_time <= 1e-6 {
            self.state = RankState::TpComm;
            self.remaining_time = 0.0;
            group_tasks[rank.tp_group].events.push(GroupEvent { from_rank: rank.id, microbatch: self.microbatch });
        }
    }

    /// Consumes every event this rank's current state accepts. Returns the
    /// number consumed. Events that don't match the current state are left
    /// queued for a later round rather than dropped, since a state change
    /// elsewhere this round can make them consumable on the next pass.
    pub fn handle_events(
        &mut self,
        rank: &Rank,
        config: &WorkloadConfig,
        schedule: &ScheduleTable,
        group_tasks: &mut SecondaryMap<GroupId, GroupTask>,
    ) -> Result<usize> {
        let before = self.events.len();
        let mut i = 0;
        while i < self.events.len() {
            let ev = self.events[i];
            let consumed = self.try_consume(ev, rank, config, schedule, group_tasks)?;
            if consumed {
                self.events.remove(i);
            } else {
                i += 1;
            }
        }
        Ok(before - self.events.len())
    }

    fn try_consume(
        &mut self,
        ev: RankEvent,
        rank: &Rank,
        config: &WorkloadConfig,
        schedule: &ScheduleTable,
        group_tasks: &mut SecondaryMap<GroupId, GroupTask>,
    ) -> Result<bool> {
        match (ev.group_kind, ev.endpoint) {
            // TP_SENT is a fire-and-forget wake of the peers; this rank has
            // nothing to do with its own send completing.
            (GroupKind::Tp, Endpoint::Sent) => Ok(true),

            (GroupKind::Tp, Endpoint::Recv) => {
                if self.state != RankState::TpComm {
                    return Ok(false);
                }
                if ev.microbatch != self.microbatch {
                    return Err(Error::Invariant(format!(
                        "rank {:?}: TP_RECV for microbatch {} while running microbatch {}",
                        rank.id, ev.microbatch, self.microbatch
                    )));
                }

                let pp_group = if self.microbatch > 0 { rank.pp_fwd_group } else { rank.pp_bwd_group };
                if let Some(group) = pp_group {
                    group_tasks[group].events.push(GroupEvent { from_rank: rank.id, microbatch: self.microbatch });
                }

                match schedule.get(&(rank.pp, self.microbatch)) {
                    Some(&next) => {
                        self.microbatch = next;
                        self.state = RankState::PpWait;
                    }
                    None => self.state = RankState::DpWait,
                }
                Ok(true)
            }

            (GroupKind::Dp, Endpoint::Sent) => Ok(true),

            (GroupKind::Dp, Endpoint::Recv) => {
                if self.state == RankState::DpComm {
                    self.state = RankState::Done;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }

            (GroupKind::Pp, Endpoint::Sent) => {
                if ev.microbatch != -(config.microbatches as i64) {
                    return Ok(true);
                }
                if self.state != RankState::DpWait {
                    return Ok(false);
                }
                self.state = RankState::DpComm;
                group_tasks[rank.dp_group].events.push(GroupEvent { from_rank: rank.id, microbatch: 0 });
                Ok(true)
            }

            (GroupKind::Pp, Endpoint::Recv) => {
                if self.state == RankState::PpWait && ev.microbatch == self.microbatch {
                    self.state = RankState::Compute;
                    self.remaining_time = if self.microbatch > 0 { config.fwd_comp_time } else { config.bwd_comp_time };
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }
}
