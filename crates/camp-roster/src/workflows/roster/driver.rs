use std::fmt;

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, debug_span, info, warn};

use super::constraints::ConstraintIndex;
use super::domain::{Candidate, CandidateId};
use super::ledger::{LedgerError, Registration, RegistrationLedger};
use super::probability::{Composition, WeightModel};
use crate::config::{ConfigReference, SelectionConfig};

/// Stages of a run. Each stage is entered once, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    OrganizerSeeding,
    CarryOverSeeding,
    WeightedFill,
    Complete,
}

impl SelectionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            SelectionPhase::OrganizerSeeding => "organizer seeding",
            SelectionPhase::CarryOverSeeding => "carry-over seeding",
            SelectionPhase::WeightedFill => "weighted fill",
            SelectionPhase::Complete => "complete",
        }
    }
}

impl fmt::Display for SelectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("{reference} references candidate {id}, which is not in the roster")]
    UnknownCandidate {
        id: CandidateId,
        reference: ConfigReference,
    },
    #[error("{phase} failed: {source}")]
    Ledger {
        phase: SelectionPhase,
        #[source]
        source: LedgerError,
    },
    #[error("candidate pool exhausted with {registered} of {target} places filled")]
    PoolExhausted { registered: usize, target: usize },
    #[error("unable to draw from candidate weights: {0}")]
    Distribution(String),
}

/// Final state of a completed run.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub ledger: RegistrationLedger,
    pub target: usize,
    pub draws: usize,
}

impl SelectionOutcome {
    pub fn overshoot(&self) -> usize {
        self.ledger.registered_count().saturating_sub(self.target)
    }
}

/// Seeds organizers and carry-overs, then fills the remaining places by weighted draw.
#[derive(Debug, Clone)]
pub struct SelectionDriver {
    ledger: RegistrationLedger,
    constraints: ConstraintIndex,
    model: WeightModel,
    organizers: Vec<CandidateId>,
    carry_over: Vec<CandidateId>,
    target: usize,
    phase: SelectionPhase,
    draws: usize,
}

impl SelectionDriver {
    /// Fails on the first config id that does not name a candidate, or when
    /// organizer and carry-over seeding would register a rejected candidate.
    pub fn new(
        config: &SelectionConfig,
        candidates: impl IntoIterator<Item = Candidate>,
    ) -> Result<Self, SelectionError> {
        let ledger = RegistrationLedger::new(candidates);
        if ledger.is_empty() {
            warn!("roster has no candidates");
        }

        if let Some((reference, id)) = config
            .references()
            .into_iter()
            .find(|(_, id)| !ledger.contains(*id))
        {
            return Err(SelectionError::UnknownCandidate { id, reference });
        }

        let driver = Self {
            ledger,
            constraints: config.constraint_index(),
            model: config.weight_model(),
            organizers: config.organizers.clone(),
            carry_over: config.carry_over().to_vec(),
            target: config.places as usize,
            phase: SelectionPhase::OrganizerSeeding,
            draws: 0,
        };
        driver.check_seeding()?;

        Ok(driver)
    }

    /// Seeding is deterministic, so it is replayed on a copy of the ledger.
    fn check_seeding(&self) -> Result<(), SelectionError> {
        let _span = debug_span!("seeding_check").entered();
        let mut ledger = self.ledger.clone();
        for (phase, ids) in [
            (SelectionPhase::OrganizerSeeding, &self.organizers),
            (SelectionPhase::CarryOverSeeding, &self.carry_over),
        ] {
            for id in ids {
                ledger
                    .register(*id, &self.constraints)
                    .map_err(|source| SelectionError::Ledger { phase, source })?;
            }
        }
        Ok(())
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn ledger(&self) -> &RegistrationLedger {
        &self.ledger
    }

    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<SelectionOutcome, SelectionError> {
        self.seed(SelectionPhase::OrganizerSeeding)?;
        self.seed(SelectionPhase::CarryOverSeeding)?;
        self.fill(rng)?;
        self.phase = SelectionPhase::Complete;

        let outcome = SelectionOutcome {
            ledger: self.ledger,
            target: self.target,
            draws: self.draws,
        };
        debug_assert!(outcome.ledger.is_consistent());
        if outcome.overshoot() > 0 {
            warn!(
                registered = outcome.ledger.registered_count(),
                target = outcome.target,
                "group registration overshot the number of places"
            );
        }
        info!(
            registered = outcome.ledger.registered_count(),
            pool = outcome.ledger.pool_ids().len(),
            rejected = outcome.ledger.rejected_ids().len(),
            draws = outcome.draws,
            "selection complete"
        );

        Ok(outcome)
    }

    fn seed(&mut self, phase: SelectionPhase) -> Result<(), SelectionError> {
        self.phase = phase;
        let ids = match phase {
            SelectionPhase::OrganizerSeeding => self.organizers.clone(),
            SelectionPhase::CarryOverSeeding => self.carry_over.clone(),
            SelectionPhase::WeightedFill | SelectionPhase::Complete => return Ok(()),
        };
        info!(%phase, candidates = ids.len(), "seeding");

        for id in ids {
            self.ledger
                .register(id, &self.constraints)
                .map_err(|source| SelectionError::Ledger { phase, source })?;
        }

        Ok(())
    }

    fn fill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SelectionError> {
        self.phase = SelectionPhase::WeightedFill;
        info!(
            phase = %self.phase,
            registered = self.ledger.registered_count(),
            target = self.target,
            "drawing participants"
        );

        while self.ledger.registered_count() < self.target {
            self.draw_once(rng)?;
        }

        Ok(())
    }

    fn draw_once<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Registration, SelectionError> {
        if self.ledger.pool_ids().is_empty() {
            return Err(SelectionError::PoolExhausted {
                registered: self.ledger.registered_count(),
                target: self.target,
            });
        }

        let composition = Composition::of(&self.ledger);
        let weights: Vec<f64> = self
            .ledger
            .pool()
            .map(|candidate| {
                let breakdown = self.model.explain(candidate, &composition);
                debug!(
                    candidate = %candidate.id(),
                    weight = breakdown.weight,
                    components = ?breakdown.components,
                    "weighted candidate"
                );
                breakdown.weight
            })
            .collect();

        let distribution = WeightedIndex::new(&weights)
            .map_err(|err| SelectionError::Distribution(err.to_string()))?;
        let drawn = self.ledger.pool_ids()[distribution.sample(rng)];
        self.draws += 1;

        let registration = self
            .ledger
            .register(drawn, &self.constraints)
            .map_err(|source| SelectionError::Ledger {
                phase: SelectionPhase::WeightedFill,
                source,
            })?;
        let cascaded: Vec<CandidateId> = registration.cascaded().collect();
        if !cascaded.is_empty() {
            info!(
                drawn = %drawn,
                grouped = ?cascaded,
                "draw registered a forced group"
            );
        }

        Ok(registration)
    }
}

/// Runs a full selection for `config` over `candidates`.
pub fn select<R: Rng + ?Sized>(
    config: &SelectionConfig,
    candidates: impl IntoIterator<Item = Candidate>,
    rng: &mut R,
) -> Result<SelectionOutcome, SelectionError> {
    SelectionDriver::new(config, candidates)?.run(rng)
}
