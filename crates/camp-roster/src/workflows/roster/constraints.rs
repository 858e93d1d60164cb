use std::collections::{BTreeSet, HashMap};

use super::domain::CandidateId;

/// Read-only lookup over conflict groups and forced groups, built once per run.
#[derive(Debug, Clone, Default)]
pub struct ConstraintIndex {
    conflicts: Vec<Vec<CandidateId>>,
    groups: Vec<Vec<CandidateId>>,
    conflict_membership: HashMap<CandidateId, Vec<usize>>,
    group_membership: HashMap<CandidateId, Vec<usize>>,
}

impl ConstraintIndex {
    pub fn new(conflicts: Vec<Vec<CandidateId>>, groups: Vec<Vec<CandidateId>>) -> Self {
        let conflicts: Vec<_> = conflicts.into_iter().map(dedup_preserving_order).collect();
        let groups: Vec<_> = groups.into_iter().map(dedup_preserving_order).collect();
        let conflict_membership = membership(&conflicts);
        let group_membership = membership(&groups);

        Self {
            conflicts,
            groups,
            conflict_membership,
            group_membership,
        }
    }

    /// Every candidate sharing at least one conflict group with `id`, in group order.
    pub fn conflicting_peers(&self, id: CandidateId) -> impl Iterator<Item = CandidateId> + '_ {
        peers(&self.conflicts, &self.conflict_membership, id)
    }

    /// Every candidate sharing at least one forced group with `id`, in group order.
    pub fn grouped_peers(&self, id: CandidateId) -> impl Iterator<Item = CandidateId> + '_ {
        peers(&self.groups, &self.group_membership, id)
    }
}

fn peers<'a>(
    sets: &'a [Vec<CandidateId>],
    membership: &'a HashMap<CandidateId, Vec<usize>>,
    id: CandidateId,
) -> impl Iterator<Item = CandidateId> + 'a {
    membership
        .get(&id)
        .into_iter()
        .flatten()
        .flat_map(move |index| sets[*index].iter().copied())
        .filter(move |peer| *peer != id)
}

fn membership(sets: &[Vec<CandidateId>]) -> HashMap<CandidateId, Vec<usize>> {
    let mut index: HashMap<CandidateId, Vec<usize>> = HashMap::new();
    for (position, set) in sets.iter().enumerate() {
        for id in set {
            index.entry(*id).or_default().push(position);
        }
    }
    index
}

fn dedup_preserving_order(ids: Vec<CandidateId>) -> Vec<CandidateId> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
