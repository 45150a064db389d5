//! Error taxonomy for round management
//!
//! Nothing here does I/O, so every failure is a local state guard.

use thiserror::Error;

use crate::sim::{AnimalKind, RoundPhase};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    /// Action requested in a phase that forbids it (e.g. a duplicate drop
    /// while the previous one is still resolving). Callers ignore these.
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: RoundPhase,
    },

    /// The dropped animal is not part of the current round
    #[error("{0} is not part of the current round")]
    NotInRound(AnimalKind),

    /// Fewer distinct animals than a round needs. Fatal at startup.
    #[error("catalog has {available} animals, rounds need {required}")]
    CatalogExhausted { required: usize, available: usize },
}

impl RoundError {
    /// Harmless rejections caused by re-entrant UI events
    pub fn is_ignorable(&self) -> bool {
        matches!(
            self,
            RoundError::InvalidTransition { .. } | RoundError::NotInRound(_)
        )
    }
}
