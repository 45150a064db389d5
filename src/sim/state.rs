//! Round state and core matching types
//!
//! Rounds hold animal kinds only. Whatever the host draws for them is
//! tracked by the host.

use serde::{Deserialize, Serialize};

use super::catalog::AnimalKind;

/// Lifecycle of the round controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Ready for the next round
    Idle,
    /// Animals are on screen, waiting for a drop onto the shadow
    RoundActive,
    /// A drop was accepted and its feedback is playing
    Resolving,
    /// Enough correct answers; terminal until reset
    Complete,
}

/// One "whose shadow is this?" round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Animals on offer, in display order (distinct)
    pub participants: Vec<AnimalKind>,
    /// The animal whose shadow is shown
    pub target: AnimalKind,
}

impl Round {
    /// Non-target animals of the round
    pub fn distractors(&self) -> impl Iterator<Item = AnimalKind> + '_ {
        self.participants
            .iter()
            .copied()
            .filter(move |kind| *kind != self.target)
    }

    pub fn contains(&self, kind: AnimalKind) -> bool {
        self.participants.contains(&kind)
    }
}

/// Score across the rounds of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    pub correct_count: u32,
    pub required_correct: u32,
}

impl GameProgress {
    pub fn new(required_correct: u32) -> Self {
        Self {
            correct_count: 0,
            required_correct,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.correct_count >= self.required_correct
    }

    /// Correct answers still needed
    pub fn remaining(&self) -> u32 {
        self.required_correct.saturating_sub(self.correct_count)
    }
}

/// Outcome kind without payload (timelines are keyed by this)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    Correct,
    Incorrect,
}

/// Result of dropping an animal onto the shadow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropOutcome {
    Correct {
        dropped: AnimalKind,
        target: AnimalKind,
    },
    Incorrect {
        dropped: AnimalKind,
        target: AnimalKind,
    },
}

impl DropOutcome {
    /// Judge a drop against the round target
    pub fn judge(dropped: AnimalKind, target: AnimalKind) -> Self {
        if dropped == target {
            DropOutcome::Correct { dropped, target }
        } else {
            DropOutcome::Incorrect { dropped, target }
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            DropOutcome::Correct { .. } => OutcomeKind::Correct,
            DropOutcome::Incorrect { .. } => OutcomeKind::Incorrect,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.kind() == OutcomeKind::Correct
    }

    pub fn dropped(&self) -> AnimalKind {
        match *self {
            DropOutcome::Correct { dropped, .. } | DropOutcome::Incorrect { dropped, .. } => dropped,
        }
    }

    pub fn target(&self) -> AnimalKind {
        match *self {
            DropOutcome::Correct { target, .. } | DropOutcome::Incorrect { target, .. } => target,
        }
    }
}

/// What happens after an outcome has been settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// Start another round
    NextRound,
    /// Session finished; show the completion screen
    Complete { final_correct_count: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge() {
        let correct = DropOutcome::judge(AnimalKind::Bear, AnimalKind::Bear);
        assert!(correct.is_correct());
        assert_eq!(correct.kind(), OutcomeKind::Correct);

        let wrong = DropOutcome::judge(AnimalKind::Cow, AnimalKind::Bear);
        assert_eq!(wrong.kind(), OutcomeKind::Incorrect);
        assert_eq!(wrong.dropped(), AnimalKind::Cow);
        assert_eq!(wrong.target(), AnimalKind::Bear);
    }

    #[test]
    fn test_progress_completion() {
        let mut progress = GameProgress::new(2);
        assert!(!progress.is_complete());
        assert_eq!(progress.remaining(), 2);
        progress.correct_count = 2;
        assert!(progress.is_complete());
        assert_eq!(progress.remaining(), 0);
    }

    #[test]
    fn test_distractors() {
        let round = Round {
            participants: vec![AnimalKind::Lion, AnimalKind::Elephant, AnimalKind::Hippo],
            target: AnimalKind::Elephant,
        };
        let distractors: Vec<_> = round.distractors().collect();
        assert_eq!(distractors, vec![AnimalKind::Lion, AnimalKind::Hippo]);
    }
}
