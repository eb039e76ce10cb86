use std::collections::{BTreeMap, VecDeque};

use slotmap::SecondaryMap;

use crate::domain::workload::config::WorkloadConfig;
use crate::domain::workload::group::Group;
use crate::domain::workload::rank::RankId;
use crate::error::{Error, Result};
use crate::logger;

use super::collective::Collective;
use super::events::{Endpoint, GroupEvent, RankEvent};
use super::rank_task::RankTask;

/// The per-group state machine: invocations accumulate into a `Collective`
/// until every member has invoked it, then the collective waits its turn
/// and finally runs as the single `active` one.
#[derive(Debug, Clone)]
pub struct GroupTask {
    pub active: Option<Collective>,
    pub waiting: VecDeque<Collective>,
    /// Keyed by microbatch id and kept ordered so that when several
    /// collectives complete accumulation in the same round they join
    /// `waiting` in ascending microbatch order, a deterministic tie-break
    /// that keeps replays of the same scenario reproducible.
    accumulating: BTreeMap<i64, Collective>,
    pub events: Vec<GroupEvent>,
    pub senders: Vec<RankId>,
    pub receivers: Vec<RankId>,
}

impl GroupTask {
    pub fn new(senders: Vec<RankId>, receivers: Vec<RankId>) -> Self {
        Self {
            active: None,
            waiting: VecDeque::new(),
            accumulating: BTreeMap::new(),
            events: Vec::new(),
            senders,
            receivers,
        }
    }

    /// Folds every queued invocation into its collective (creating one on
    /// first invocation), then promotes any collective whose invocations
    /// reached the group size to the tail of `waiting`. Every event is
    /// always consumed. Returns the number of events consumed.
    pub fn handle_events(&mut self, group: &Group, config: &WorkloadConfig) -> Result<usize> {
        let consumed = self.events.len();

        for ev in self.events.drain(..) {
            match self.accumulating.get_mut(&ev.microbatch) {
                Some(collective) => {
                    collective.accumulated_invocations += 1;
                    if collective.accumulated_invocations > collective.accumulated_size {
                        return Err(Error::Invariant(format!(
                            "more than {} invocations accumulated for microbatch {} in one collective",
                            collective.accumulated_size, ev.microbatch
                        )));
                    }
                }
                None => {
                    let collective = Collective::new(group, ev.microbatch, config)?;
                    self.accumulating.insert(ev.microbatch, collective);
                }
            }
        }

        let ready: Vec<i64> = self
            .accumulating
            .iter()
            .filter(|(_, c)| c.accumulated_invocations == c.accumulated_size)
            .map(|(&mb, _)| mb)
            .collect();
        for mb in ready {
            let collective = self.accumulating.remove(&mb).unwrap();
            self.waiting.push_back(collective);
        }

        Ok(consumed)
    }

    /// True if this group has no active, waiting, or still-accumulating
    /// collective. Used to tell a genuinely idle group apart from one stuck
    /// mid-transfer when diagnosing a deadlock.
    pub fn has_pending_work(&self) -> bool {
        self.active.is_some() || !self.waiting.is_empty() || !self.accumulating.is_empty()
    }

    pub fn stable_time(&self) -> f64 {
        match &self.active {
            Some(collective) => collective.stable_time(),
            None => {
                if self.waiting.is_empty() {
                    f64::INFINITY
                } else {
                    0.0
                }
            }
        }
    }

    /// Advances the active collective (pulling one from `waiting` if idle)
    /// and, on completion, fans a SENT event out to every sender and a RECV
    /// event out to every receiver.
    pub fn progress(&mut self, dt: f64, group: &Group, rank_tasks: &mut SecondaryMap<RankId, RankTask>) {
        if self.active.is_none() {
            self.active = self.waiting.pop_front();
        }
        let Some(collective) = self.active.as_mut() else {
            return;
        };

        collective.progress(dt);
        if !collective.is_complete() {
            return;
        }

        let microbatch = collective.microbatch;
        for &rank in &self.senders {
            rank_tasks[rank].events.push(RankEvent { endpoint: Endpoint::Sent, group_kind: group.kind, microbatch });
        }
        for &rank in &self.receivers {
            rank_tasks[rank].events.push(RankEvent { endpoint: Endpoint::Recv, group_kind: group.kind, microbatch });
        }
        logger::log_collective_complete(group.kind, microbatch, self.senders.len() + self.receivers.len());

        self.active = self.waiting.pop_front();
    }
}
