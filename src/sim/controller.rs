//! Round controller
//!
//! Owns the round lifecycle: picks the target and its distractors, judges
//! drops, keeps score and decides when the session is complete.
//!
//! ```text
//! Idle -> RoundActive -> Resolving -> Idle | Complete
//! ```
//!
//! Requests made in the wrong phase are rejected with
//! [`RoundError::InvalidTransition`] and leave the state untouched. The host
//! re-checks overlap while animations run, so duplicate drops are expected.

use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::{AnimalKind, Catalog};
use super::state::{DropOutcome, GameProgress, Round, RoundPhase, Settlement};
use crate::consts::{DEFAULT_ANIMALS_PER_ROUND, DEFAULT_REQUIRED_CORRECT};
use crate::error::RoundError;

/// Round sizing and win condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Distinct animals per round (target included)
    pub animals_per_round: usize,
    /// Correct answers that complete the session
    pub required_correct: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            animals_per_round: DEFAULT_ANIMALS_PER_ROUND,
            required_correct: DEFAULT_REQUIRED_CORRECT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoundController {
    catalog: Catalog,
    config: RoundConfig,
    /// Seed the RNG was created from (logged for reproducing a session)
    seed: u64,
    rng: Pcg32,
    phase: RoundPhase,
    round: Option<Round>,
    /// Outcome accepted by `propose_drop`, waiting for settlement
    pending: Option<DropOutcome>,
    progress: GameProgress,
}

impl RoundController {
    /// Create a controller. Fails if the catalog cannot fill a round.
    ///
    /// A `required_correct` of zero is raised to one, so a session always
    /// takes at least one correct answer to complete.
    pub fn new(catalog: Catalog, mut config: RoundConfig, seed: u64) -> Result<Self, RoundError> {
        if config.animals_per_round == 0 {
            return Err(RoundError::CatalogExhausted {
                required: 1,
                available: 0,
            });
        }
        catalog.ensure_fits(config.animals_per_round)?;
        if config.required_correct == 0 {
            log::warn!("required_correct of 0 raised to 1");
            config.required_correct = 1;
        }

        Ok(Self {
            catalog,
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RoundPhase::Idle,
            round: None,
            pending: None,
            progress: GameProgress::new(config.required_correct),
        })
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// The animal whose shadow is currently shown
    pub fn target(&self) -> Option<AnimalKind> {
        self.round.as_ref().map(|r| r.target)
    }

    pub fn progress(&self) -> GameProgress {
        self.progress
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Final score once the session is complete
    pub fn final_correct_count(&self) -> Option<u32> {
        (self.phase == RoundPhase::Complete).then_some(self.progress.correct_count)
    }

    /// Pick the animals for a new round and make it active
    pub fn start_round(&mut self) -> Result<&Round, RoundError> {
        if self.phase != RoundPhase::Idle {
            return Err(RoundError::InvalidTransition {
                action: "start a round",
                phase: self.phase,
            });
        }

        // Sample without replacement
        let mut participants = self.catalog.kinds().to_vec();
        participants.shuffle(&mut self.rng);
        participants.truncate(self.config.animals_per_round);

        let target = participants[self.rng.random_range(0..participants.len())];

        log::debug!(
            "Round started: target {} among {:?}",
            target,
            participants
        );

        self.phase = RoundPhase::RoundActive;
        self.pending = None;
        Ok(&*self.round.insert(Round {
            participants,
            target,
        }))
    }

    /// Judge an animal dropped onto the shadow. Only one drop per round.
    pub fn propose_drop(&mut self, kind: AnimalKind) -> Result<DropOutcome, RoundError> {
        if self.phase != RoundPhase::RoundActive {
            return Err(RoundError::InvalidTransition {
                action: "propose a drop",
                phase: self.phase,
            });
        }
        let Some(round) = &self.round else {
            return Err(RoundError::InvalidTransition {
                action: "propose a drop",
                phase: self.phase,
            });
        };
        if !round.contains(kind) {
            return Err(RoundError::NotInRound(kind));
        }

        let outcome = DropOutcome::judge(kind, round.target);
        self.pending = Some(outcome);
        self.phase = RoundPhase::Resolving;
        Ok(outcome)
    }

    /// Apply a resolved outcome once its feedback has finished playing
    pub fn on_outcome_settled(&mut self, outcome: DropOutcome) -> Result<Settlement, RoundError> {
        if self.phase != RoundPhase::Resolving || self.pending != Some(outcome) {
            return Err(RoundError::InvalidTransition {
                action: "settle an outcome",
                phase: self.phase,
            });
        }

        if outcome.is_correct() {
            self.progress.correct_count += 1;
        }
        self.pending = None;
        self.round = None;

        if self.progress.is_complete() {
            self.phase = RoundPhase::Complete;
            log::info!(
                "Session complete: {}/{} correct",
                self.progress.correct_count,
                self.progress.required_correct
            );
            Ok(Settlement::Complete {
                final_correct_count: self.progress.correct_count,
            })
        } else {
            self.phase = RoundPhase::Idle;
            Ok(Settlement::NextRound)
        }
    }

    /// Clear progress and return to Idle (valid from any phase)
    pub fn reset(&mut self) {
        self.progress = GameProgress::new(self.config.required_correct);
        self.round = None;
        self.pending = None;
        self.phase = RoundPhase::Idle;
    }

    /// Start over from the completion screen
    pub fn retry(&mut self) -> Result<&Round, RoundError> {
        self.reset();
        self.start_round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn controller(required_correct: u32) -> RoundController {
        let config = RoundConfig {
            required_correct,
            ..Default::default()
        };
        RoundController::new(Catalog::full(), config, 12345).unwrap()
    }

    fn drop_target(c: &mut RoundController) -> Settlement {
        let target = c.start_round().unwrap().target;
        let outcome = c.propose_drop(target).unwrap();
        c.on_outcome_settled(outcome).unwrap()
    }

    #[test]
    fn test_start_round_shape() {
        let mut c = controller(7);
        assert_eq!(c.phase(), RoundPhase::Idle);

        let round = c.start_round().unwrap().clone();
        assert_eq!(round.participants.len(), 3);
        assert!(round.participants.contains(&round.target));
        assert_eq!(c.phase(), RoundPhase::RoundActive);
        assert_eq!(c.target(), Some(round.target));
    }

    #[test]
    fn test_start_round_twice_rejected() {
        let mut c = controller(7);
        let first = c.start_round().unwrap().clone();
        assert!(matches!(
            c.start_round(),
            Err(RoundError::InvalidTransition { .. })
        ));
        assert_eq!(c.round(), Some(&first));
    }

    #[test]
    fn test_zero_required_correct_needs_one_answer() {
        let mut c = controller(0);
        assert_eq!(c.progress().required_correct, 1);
        assert!(!c.progress().is_complete());
        assert_eq!(c.final_correct_count(), None);

        assert_eq!(
            drop_target(&mut c),
            Settlement::Complete {
                final_correct_count: 1
            }
        );

        // Survives a retry
        c.retry().unwrap();
        assert_eq!(c.progress().required_correct, 1);
        assert!(!c.progress().is_complete());
    }

    #[test]
    fn test_drop_judging() {
        let mut c = controller(7);
        let round = c.start_round().unwrap().clone();
        let outcome = c.propose_drop(round.target).unwrap();
        assert!(outcome.is_correct());

        let mut c = controller(7);
        let round = c.start_round().unwrap().clone();
        let other = round.distractors().next().unwrap();
        let outcome = c.propose_drop(other).unwrap();
        assert!(!outcome.is_correct());
        assert_eq!(outcome.target(), round.target);
    }

    #[test]
    fn test_second_drop_rejected() {
        let mut c = controller(7);
        let target = c.start_round().unwrap().target;
        let outcome = c.propose_drop(target).unwrap();
        assert_eq!(c.phase(), RoundPhase::Resolving);

        let again = c.propose_drop(target);
        assert!(matches!(again, Err(RoundError::InvalidTransition { .. })));

        c.on_outcome_settled(outcome).unwrap();
        assert_eq!(c.progress().correct_count, 1);
        // Settling the same outcome twice does not score twice
        assert!(c.on_outcome_settled(outcome).is_err());
        assert_eq!(c.progress().correct_count, 1);
    }

    #[test]
    fn test_drop_not_in_round() {
        let mut c = controller(7);
        let round = c.start_round().unwrap().clone();
        let outsider = AnimalKind::ALL
            .into_iter()
            .find(|k| !round.contains(*k))
            .unwrap();
        assert_eq!(c.propose_drop(outsider), Err(RoundError::NotInRound(outsider)));
        assert_eq!(c.phase(), RoundPhase::RoundActive);
    }

    #[test]
    fn test_drop_before_round_rejected() {
        let mut c = controller(7);
        assert!(matches!(
            c.propose_drop(AnimalKind::Bear),
            Err(RoundError::InvalidTransition {
                phase: RoundPhase::Idle,
                ..
            })
        ));
    }

    #[test]
    fn test_seven_correct_completes() {
        let mut c = controller(7);
        for i in 1..=6 {
            assert_eq!(drop_target(&mut c), Settlement::NextRound);
            assert_eq!(c.progress().correct_count, i);
            assert_eq!(c.phase(), RoundPhase::Idle);
        }
        assert_eq!(
            drop_target(&mut c),
            Settlement::Complete {
                final_correct_count: 7
            }
        );
        assert_eq!(c.phase(), RoundPhase::Complete);
        assert_eq!(c.final_correct_count(), Some(7));

        assert!(c.start_round().is_err());
        assert!(c.start_round().is_err());
        assert_eq!(c.phase(), RoundPhase::Complete);

        c.reset();
        assert_eq!(c.phase(), RoundPhase::Idle);
        assert_eq!(c.progress().correct_count, 0);
        assert_eq!(c.final_correct_count(), None);
        assert!(c.start_round().is_ok());
    }

    #[test]
    fn test_incorrect_drop_small_catalog() {
        let catalog = Catalog::new([AnimalKind::Bear, AnimalKind::Cat, AnimalKind::Cow]);
        let config = RoundConfig {
            animals_per_round: 3,
            required_correct: 1,
        };
        let mut c = RoundController::new(catalog, config, 7).unwrap();

        let round = c.start_round().unwrap().clone();
        let mut sorted = round.participants.clone();
        sorted.sort();
        assert_eq!(sorted, vec![AnimalKind::Bear, AnimalKind::Cat, AnimalKind::Cow]);

        let wrong = round.distractors().next().unwrap();
        let outcome = c.propose_drop(wrong).unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Incorrect {
                dropped: wrong,
                target: round.target
            }
        );
        assert_eq!(c.on_outcome_settled(outcome), Ok(Settlement::NextRound));
        assert_eq!(c.progress().correct_count, 0);
        assert_eq!(c.phase(), RoundPhase::Idle);
        assert!(c.start_round().is_ok());
    }

    #[test]
    fn test_catalog_exhausted() {
        let catalog = Catalog::new([AnimalKind::Bear, AnimalKind::Cat]);
        let err = RoundController::new(catalog, RoundConfig::default(), 1).unwrap_err();
        assert_eq!(
            err,
            RoundError::CatalogExhausted {
                required: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_zero_animals_rejected() {
        let config = RoundConfig {
            animals_per_round: 0,
            required_correct: 7,
        };
        assert!(RoundController::new(Catalog::full(), config, 1).is_err());
    }

    #[test]
    fn test_reset_mid_round() {
        let mut c = controller(7);
        drop_target(&mut c);
        let target = c.start_round().unwrap().target;
        c.propose_drop(target).unwrap();

        c.reset();
        assert_eq!(c.phase(), RoundPhase::Idle);
        assert_eq!(c.round(), None);
        assert_eq!(c.progress().correct_count, 0);
    }

    #[test]
    fn test_retry_starts_round() {
        let mut c = controller(1);
        drop_target(&mut c);
        assert_eq!(c.phase(), RoundPhase::Complete);

        let round = c.retry().unwrap().clone();
        assert_eq!(c.phase(), RoundPhase::RoundActive);
        assert_eq!(c.round(), Some(&round));
        assert_eq!(c.progress().correct_count, 0);
    }

    #[test]
    fn test_determinism() {
        // Same seed, same rounds
        let mut a = controller(7);
        let mut b = controller(7);
        for _ in 0..5 {
            let ra = a.start_round().unwrap().clone();
            let rb = b.start_round().unwrap().clone();
            assert_eq!(ra, rb);
            let oa = a.propose_drop(ra.target).unwrap();
            let ob = b.propose_drop(rb.target).unwrap();
            a.on_outcome_settled(oa).unwrap();
            b.on_outcome_settled(ob).unwrap();
        }
    }

    #[test]
    fn test_configurable_round_size() {
        let config = RoundConfig {
            animals_per_round: 5,
            required_correct: 3,
        };
        let mut c = RoundController::new(Catalog::full(), config, 99).unwrap();
        let round = c.start_round().unwrap();
        assert_eq!(round.participants.len(), 5);
        assert_eq!(round.distractors().count(), 4);
    }

    proptest! {
        #[test]
        fn prop_rounds_are_well_formed(seed in any::<u64>(), per_round in 1usize..=15) {
            let config = RoundConfig { animals_per_round: per_round, required_correct: 100 };
            let mut c = RoundController::new(Catalog::full(), config, seed).unwrap();
            for _ in 0..10 {
                let round = c.start_round().unwrap().clone();
                let mut unique = round.participants.clone();
                unique.sort();
                unique.dedup();
                prop_assert_eq!(round.participants.len(), per_round);
                prop_assert_eq!(unique.len(), per_round);
                prop_assert!(round.contains(round.target));

                let dropped = round.participants[0];
                let outcome = c.propose_drop(dropped).unwrap();
                c.on_outcome_settled(outcome).unwrap();
            }
        }

        #[test]
        fn prop_score_counts_only_correct(seed in any::<u64>(), picks in proptest::collection::vec(0usize..3, 1..20)) {
            let config = RoundConfig { animals_per_round: 3, required_correct: 1000 };
            let mut c = RoundController::new(Catalog::full(), config, seed).unwrap();
            let mut expected = 0;
            for pick in picks {
                let round = c.start_round().unwrap().clone();
                let dropped = round.participants[pick];
                let before = c.progress().correct_count;
                let outcome = c.propose_drop(dropped).unwrap();
                prop_assert_eq!(outcome.is_correct(), dropped == round.target);

                // Duplicate drop while resolving changes nothing
                prop_assert!(c.propose_drop(dropped).is_err());
                prop_assert_eq!(c.progress().correct_count, before);

                c.on_outcome_settled(outcome).unwrap();
                if outcome.is_correct() {
                    expected += 1;
                }
                prop_assert_eq!(c.progress().correct_count, expected);
                prop_assert!(c.progress().correct_count >= before);
            }
        }
    }
}
