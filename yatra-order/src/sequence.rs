use std::collections::HashMap;

use yatra_shared::CityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Hotels,
    Rooms,
    Sightseeing,
}

/// What a fetch is about. A newer fetch supersedes older ones of the same scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchScope {
    pub city_id: CityId,
    pub kind: FetchKind,
}

impl FetchScope {
    pub fn new(city_id: CityId, kind: FetchKind) -> Self {
        Self { city_id, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub scope: FetchScope,
    pub seq: u64,
}

/// Hands out per-scope sequence numbers so late responses of superseded
/// fetches can be recognised and discarded.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: HashMap<FetchScope, u64>,
    completed: HashMap<FetchScope, u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, scope: FetchScope) -> FetchTicket {
        let seq = self.issued.entry(scope).or_insert(0);
        *seq += 1;
        FetchTicket { scope, seq: *seq }
    }

    /// True when no newer ticket has been issued for the ticket's scope.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.issued.get(&ticket.scope) == Some(&ticket.seq)
    }

    /// Accepts the result of `ticket` at most once, and only while it is
    /// current.
    pub fn complete(&mut self, ticket: &FetchTicket) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                city_id = %ticket.scope.city_id,
                kind = ?ticket.scope.kind,
                seq = ticket.seq,
                "Discarding superseded fetch result"
            );
            return false;
        }
        if self.completed.get(&ticket.scope) == Some(&ticket.seq) {
            return false;
        }
        self.completed.insert(ticket.scope, ticket.seq);
        true
    }

    pub fn latest(&self, scope: FetchScope) -> Option<u64> {
        self.issued.get(&scope).copied()
    }
}
