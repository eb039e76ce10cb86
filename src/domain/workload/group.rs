use slotmap::new_key_type;

use super::connection::Connection;
use super::rank::RankId;

new_key_type! {
    /// Arena key for a `Group`. Stable across the lifetime of a `Workload`.
    pub struct GroupId;
}

/// Kind of communication group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Tp,
    Dp,
    Pp,
}

/// A communication group: a fixed set of member ranks and the ring (TP/DP)
/// or single-pair (PP) connections between them.
#[derive(Debug, Clone)]
pub struct Group {
    pub id: GroupId,
    pub kind: GroupKind,
    pub ranks: Vec<RankId>,
    pub connections: Vec<Connection>,
}

impl Group {
    pub fn new(id: GroupId, kind: GroupKind) -> Self {
        Self { id, kind, ranks: Vec::new(), connections: Vec::new() }
    }

    /// Builds this group's connections: a ring for TP/DP (members sorted by
    /// `seq` first, so the ring order is deterministic), a single
    /// producer->consumer pair for PP.
    pub fn create_connections(&mut self, seq_of: impl Fn(RankId) -> usize) {
        self.connections.clear();
        match self.kind {
            GroupKind::Tp | GroupKind::Dp => {
                self.ranks.sort_by_key(|&r| seq_of(r));
                let n = self.ranks.len();
                for i in 0..n {
                    let src = self.ranks[i];
                    let dst = self.ranks[(i + 1) % n];
                    self.connections.push(Connection::new(src, dst));
                }
            }
            GroupKind::Pp => {
                self.connections.push(Connection::new(self.ranks[0], self.ranks[1]));
            }
        }
    }
}
