//! Feedback timelines
//!
//! `build_timeline` turns a drop outcome into an ordered list of timed
//! effects. It is a pure function of the outcome kind: offsets, cues and
//! roles never depend on the animals involved or on screen geometry. Pixel
//! destinations are left to the host through [`Anchor`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DECORATIVE_CLONES;
use crate::sim::{DropOutcome, OutcomeKind};

/// Slide of the dropped animal into the silhouette
pub const SETTLE_MS: u32 = 200;
/// One half of a wobble swing
pub const WOBBLE_HALF_PERIOD_MS: u32 = 120;
/// Extra swings after the first one
pub const WOBBLE_REPEATS: u32 = 6;
/// Vertical wobble displacement in pixels
pub const WOBBLE_OFFSET: Vec2 = Vec2::new(0.0, 10.0);
/// Fade in/out duration
pub const FADE_MS: u32 = 800;
/// Delay before the answer cue (chime or buzzer)
pub const ANSWER_CUE_MS: u32 = 1600;
/// Delay of the first praise voice
pub const PRAISE_CUE_MS: u32 = 2500;
/// Delay of the second praise voice
pub const PRAISE_FOLLOWUP_CUE_MS: u32 = 3300;
/// Move of the matched pair to the screen center
pub const CENTER_MS: u32 = 800;
/// Exit of the matched pair to the left
pub const EXIT_MS: u32 = 1000;
/// Delay between decorative duplicates
pub const CLONE_STAGGER_MS: u32 = 200;
/// Run of one decorative duplicate across the screen
pub const CLONE_RUN_MS: u32 = 1600;

/// Total length of a wobble
pub const fn wobble_duration_ms() -> u32 {
    WOBBLE_HALF_PERIOD_MS * 2 * (WOBBLE_REPEATS + 1)
}

/// Sound cues (host audio keys)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Animal lands on the shadow
    Drop,
    /// Wobble rattle
    Wobble,
    /// Correct-answer chime
    Chime,
    /// "Yatta ne!" praise voice
    Praise,
    /// "Seikai!" praise voice
    PraiseFollowup,
    /// Wrong-answer buzzer
    Buzzer,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Drop => "drop",
            Cue::Wobble => "wobble",
            Cue::Chime => "quiz-pinpon",
            Cue::Praise => "voice-yattane",
            Cue::PraiseFollowup => "voice-seikai",
            Cue::Buzzer => "quiz-bu",
        }
    }
}

/// Which on-screen entities an effect applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The animal that was dropped onto the shadow
    Dropped,
    /// The round's correct animal
    Target,
    /// The silhouette
    Shadow,
    /// Every participant that is not the target
    Distractors,
}

/// Symbolic screen positions, resolved to pixels by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Shadow,
    ScreenCenter,
    OffscreenLeft,
    OffscreenRight,
}

/// Tween easing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    Power2,
    SineInOut,
    Linear,
}

/// A tween applied to an existing entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    MoveTo {
        to: Anchor,
        duration_ms: u32,
        ease: Ease,
    },
    /// Yoyo displacement around the current position
    Wobble {
        offset: Vec2,
        half_period_ms: u32,
        repeats: u32,
    },
    Fade {
        to_alpha: f32,
        duration_ms: u32,
    },
}

impl Motion {
    pub fn duration_ms(&self) -> u32 {
        match *self {
            Motion::MoveTo { duration_ms, .. } | Motion::Fade { duration_ms, .. } => duration_ms,
            Motion::Wobble {
                half_period_ms,
                repeats,
                ..
            } => half_period_ms * 2 * (repeats + 1),
        }
    }
}

/// A freshly spawned entity and how it travels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub from: Anchor,
    pub to: Anchor,
    pub duration_ms: u32,
    /// Start transparent and fade in
    pub fade_in: bool,
}

/// One primitive feedback effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    Cue(Cue),
    Animate { who: Role, motion: Motion },
    Destroy { who: Role },
    /// Spawn a copy of the animal playing `of`
    Spawn { of: Role, spec: SpawnSpec },
    /// One more star on the progress HUD
    StarIncrement,
    /// Timeline finished; settle the outcome
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    /// Milliseconds after the drop was resolved
    pub offset_ms: u32,
    pub effect: Effect,
}

/// Effects sorted by ascending offset, always ending with `Effect::End`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub kind: OutcomeKind,
    effects: Vec<TimedEffect>,
}

impl Timeline {
    fn new(kind: OutcomeKind) -> Self {
        Self {
            kind,
            effects: Vec::new(),
        }
    }

    fn at(&mut self, offset_ms: u32, effect: Effect) -> &mut Self {
        self.effects.push(TimedEffect { offset_ms, effect });
        self
    }

    /// Sort by offset (stable) and close with the end signal
    fn finish(mut self) -> Self {
        let end = self
            .effects
            .iter()
            .map(|e| e.offset_ms + effect_duration(&e.effect))
            .max()
            .unwrap_or(0);
        self.effects.sort_by_key(|e| e.offset_ms);
        self.effects.push(TimedEffect {
            offset_ms: end,
            effect: Effect::End,
        });
        self
    }

    pub fn effects(&self) -> &[TimedEffect] {
        &self.effects
    }

    /// Offset of the end signal
    pub fn duration_ms(&self) -> u32 {
        self.effects.last().map(|e| e.offset_ms).unwrap_or(0)
    }

    /// Cues in playback order
    pub fn cues(&self) -> impl Iterator<Item = (u32, Cue)> + '_ {
        self.effects.iter().filter_map(|e| match e.effect {
            Effect::Cue(cue) => Some((e.offset_ms, cue)),
            _ => None,
        })
    }
}

/// How long an effect keeps the screen busy
fn effect_duration(effect: &Effect) -> u32 {
    match effect {
        Effect::Animate { motion, .. } => motion.duration_ms(),
        Effect::Spawn { spec, .. } => spec.duration_ms,
        _ => 0,
    }
}

fn wobble() -> Motion {
    Motion::Wobble {
        offset: WOBBLE_OFFSET,
        half_period_ms: WOBBLE_HALF_PERIOD_MS,
        repeats: WOBBLE_REPEATS,
    }
}

fn fade_out() -> Motion {
    Motion::Fade {
        to_alpha: 0.0,
        duration_ms: FADE_MS,
    }
}

/// Build the feedback timeline for a drop outcome
pub fn build_timeline(outcome: &DropOutcome) -> Timeline {
    match outcome.kind() {
        OutcomeKind::Correct => correct_timeline(),
        OutcomeKind::Incorrect => incorrect_timeline(),
    }
}

fn correct_timeline() -> Timeline {
    let wobble_start = SETTLE_MS;
    let wobble_end = wobble_start + wobble_duration_ms();
    // Rounded up to the next 100 ms after the wobble
    let reward_start = wobble_end.div_ceil(100) * 100;
    let center_start = reward_start + 500;
    let exit_start = center_start + CENTER_MS + 600;

    let mut t = Timeline::new(OutcomeKind::Correct);
    t.at(
        0,
        Effect::Animate {
            who: Role::Dropped,
            motion: Motion::MoveTo {
                to: Anchor::Shadow,
                duration_ms: SETTLE_MS,
                ease: Ease::Power2,
            },
        },
    )
    .at(
        wobble_start,
        Effect::Animate {
            who: Role::Dropped,
            motion: wobble(),
        },
    )
    .at(wobble_start, Effect::Cue(Cue::Drop))
    .at(wobble_start, Effect::Cue(Cue::Wobble))
    .at(ANSWER_CUE_MS, Effect::Cue(Cue::Chime))
    .at(PRAISE_CUE_MS, Effect::Cue(Cue::Praise))
    .at(PRAISE_FOLLOWUP_CUE_MS, Effect::Cue(Cue::PraiseFollowup))
    .at(reward_start, Effect::StarIncrement)
    .at(
        reward_start,
        Effect::Animate {
            who: Role::Distractors,
            motion: fade_out(),
        },
    )
    .at(
        reward_start + FADE_MS,
        Effect::Destroy {
            who: Role::Distractors,
        },
    );

    for who in [Role::Dropped, Role::Shadow] {
        t.at(
            center_start,
            Effect::Animate {
                who,
                motion: Motion::MoveTo {
                    to: Anchor::ScreenCenter,
                    duration_ms: CENTER_MS,
                    ease: Ease::Power2,
                },
            },
        )
        .at(
            exit_start,
            Effect::Animate {
                who,
                motion: Motion::MoveTo {
                    to: Anchor::OffscreenLeft,
                    duration_ms: EXIT_MS,
                    ease: Ease::Power2,
                },
            },
        );
    }

    for i in 0..DECORATIVE_CLONES {
        t.at(
            exit_start + i * CLONE_STAGGER_MS,
            Effect::Spawn {
                of: Role::Target,
                spec: SpawnSpec {
                    from: Anchor::OffscreenRight,
                    to: Anchor::OffscreenLeft,
                    duration_ms: CLONE_RUN_MS,
                    fade_in: false,
                },
            },
        );
    }

    t.finish()
}

fn incorrect_timeline() -> Timeline {
    let wobble_end = wobble_duration_ms();

    let mut t = Timeline::new(OutcomeKind::Incorrect);
    t.at(
        0,
        Effect::Animate {
            who: Role::Dropped,
            motion: wobble(),
        },
    )
    .at(0, Effect::Cue(Cue::Drop))
    .at(ANSWER_CUE_MS, Effect::Cue(Cue::Buzzer))
    .at(
        wobble_end,
        Effect::Spawn {
            of: Role::Target,
            spec: SpawnSpec {
                from: Anchor::Shadow,
                to: Anchor::Shadow,
                duration_ms: FADE_MS,
                fade_in: true,
            },
        },
    )
    .at(
        wobble_end,
        Effect::Animate {
            who: Role::Dropped,
            motion: fade_out(),
        },
    )
    .at(wobble_end + FADE_MS, Effect::Destroy { who: Role::Dropped });

    t.finish()
}
