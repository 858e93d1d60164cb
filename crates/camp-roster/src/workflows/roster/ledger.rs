use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::constraints::ConstraintIndex;
use super::domain::{Candidate, CandidateId};

/// Which of the three disjoint sets a candidate currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Pool,
    Registered,
    Rejected,
}

/// Candidates moved by a single `register` call, in the order they moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub requested: CandidateId,
    pub registered: Vec<CandidateId>,
    pub rejected: Vec<CandidateId>,
}

impl Registration {
    fn new(requested: CandidateId) -> Self {
        Self {
            requested,
            registered: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Candidates registered through group propagation rather than the request itself.
    pub fn cascaded(&self) -> impl Iterator<Item = CandidateId> + '_ {
        self.registered
            .iter()
            .copied()
            .filter(move |id| *id != self.requested)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("candidate {0} is not part of the roster")]
    UnknownCandidate(CandidateId),
    #[error("candidate {0} was rejected by a conflict and cannot be registered")]
    AlreadyRejected(CandidateId),
}

/// Pool / registered / rejected partitions over the original candidate set.
///
/// Every candidate lives in exactly one partition. Candidates only ever leave
/// the pool, and `registered` keeps registration order without duplicates.
#[derive(Debug, Clone)]
pub struct RegistrationLedger {
    candidates: BTreeMap<CandidateId, Candidate>,
    placement: HashMap<CandidateId, Partition>,
    pool: Vec<CandidateId>,
    registered: Vec<CandidateId>,
    rejected: Vec<CandidateId>,
}

impl RegistrationLedger {
    /// Places every candidate in the pool, keeping intake order.
    pub fn new(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut ledger = Self {
            candidates: BTreeMap::new(),
            placement: HashMap::new(),
            pool: Vec::new(),
            registered: Vec::new(),
            rejected: Vec::new(),
        };

        for candidate in candidates {
            let id = candidate.id();
            if ledger.candidates.contains_key(&id) {
                warn!(candidate = %id, "duplicate candidate id ignored");
                continue;
            }
            ledger.candidates.insert(id, candidate);
            ledger.placement.insert(id, Partition::Pool);
            ledger.pool.push(id);
        }

        ledger
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn contains(&self, id: CandidateId) -> bool {
        self.candidates.contains_key(&id)
    }

    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(&id)
    }

    pub fn partition(&self, id: CandidateId) -> Option<Partition> {
        self.placement.get(&id).copied()
    }

    pub fn pool_ids(&self) -> &[CandidateId] {
        &self.pool
    }

    pub fn registered_ids(&self) -> &[CandidateId] {
        &self.registered
    }

    pub fn rejected_ids(&self) -> &[CandidateId] {
        &self.rejected
    }

    pub fn pool(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.resolve(&self.pool)
    }

    pub fn registered(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.resolve(&self.registered)
    }

    pub fn rejected(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.resolve(&self.rejected)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    /// Extra passengers the registered candidates can carry.
    pub fn registered_seats(&self) -> u64 {
        self.registered()
            .map(|candidate| u64::from(candidate.seat_capacity()))
            .sum()
    }

    /// Registers `id`, then propagates conflicts and forced groups.
    ///
    /// Propagation runs on an explicit stack in the same order as a depth-first
    /// walk of the groups. A grouped peer is only registered if it is still in
    /// the pool when its turn comes. Registering an already registered
    /// candidate adds nothing to `registered` but propagates again.
    pub fn register(
        &mut self,
        id: CandidateId,
        constraints: &ConstraintIndex,
    ) -> Result<Registration, LedgerError> {
        match self.partition(id) {
            None => return Err(LedgerError::UnknownCandidate(id)),
            Some(Partition::Rejected) => return Err(LedgerError::AlreadyRejected(id)),
            Some(Partition::Pool) | Some(Partition::Registered) => {}
        }

        let mut registration = Registration::new(id);
        let mut pending: Vec<(CandidateId, Option<CandidateId>)> = vec![(id, None)];

        while let Some((current, grouped_with)) = pending.pop() {
            if let Some(anchor) = grouped_with {
                if self.partition(current) != Some(Partition::Pool) {
                    continue;
                }
                info!(
                    candidate = %self.display_name(current),
                    grouped_with = %self.display_name(anchor),
                    "registering grouped candidate"
                );
            }

            self.take_from_pool(current);

            for peer in constraints.conflicting_peers(current) {
                if self.take_from_pool(peer) {
                    self.placement.insert(peer, Partition::Rejected);
                    self.rejected.push(peer);
                    registration.rejected.push(peer);
                    info!(
                        candidate = %self.display_name(peer),
                        conflict_with = %self.display_name(current),
                        "removed from the pool due to conflict"
                    );
                }
            }

            if self.placement.get(&current) != Some(&Partition::Registered) {
                self.placement.insert(current, Partition::Registered);
                self.registered.push(current);
                registration.registered.push(current);
                info!(candidate = %self.display_name(current), "registered");
            }

            let peers: Vec<CandidateId> = constraints
                .grouped_peers(current)
                .filter(|peer| self.partition(*peer) == Some(Partition::Pool))
                .collect();
            for peer in peers.into_iter().rev() {
                pending.push((peer, Some(current)));
            }
        }

        Ok(registration)
    }

    /// Checks that the partitions are disjoint, cover every candidate, and
    /// agree with the placement map.
    pub fn is_consistent(&self) -> bool {
        let listed = self.pool.len() + self.registered.len() + self.rejected.len();
        if listed != self.candidates.len() || self.placement.len() != self.candidates.len() {
            return false;
        }

        [
            (Partition::Pool, &self.pool),
            (Partition::Registered, &self.registered),
            (Partition::Rejected, &self.rejected),
        ]
        .iter()
        .all(|(partition, ids)| {
            ids.iter()
                .all(|id| self.placement.get(id) == Some(partition))
        })
    }

    /// Removes `id` from the pool list. Returns false when it was not there.
    fn take_from_pool(&mut self, id: CandidateId) -> bool {
        if self.placement.get(&id) != Some(&Partition::Pool) {
            return false;
        }
        if let Some(position) = self.pool.iter().position(|pooled| *pooled == id) {
            self.pool.remove(position);
        }
        true
    }

    fn resolve<'a>(&'a self, ids: &'a [CandidateId]) -> impl Iterator<Item = &'a Candidate> + 'a {
        ids.iter().filter_map(move |id| self.candidates.get(id))
    }

    fn display_name(&self, id: CandidateId) -> String {
        self.candidate(id)
            .map(Candidate::full_name)
            .unwrap_or_else(|| id.to_string())
    }
}
