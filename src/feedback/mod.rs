//! Drop feedback
//!
//! A drop outcome becomes a declarative timeline of `(offset, effect)` pairs
//! (`timeline`), which a single scheduler loop plays against the host clock
//! (`scheduler`). Nothing here reads or mutates round state; the only
//! output back to the session is the `End` effect.

pub mod scheduler;
pub mod timeline;

pub use scheduler::{Scheduler, TimelineTicket};
pub use timeline::{
    Anchor, Cue, Ease, Effect, Motion, Role, SpawnSpec, TimedEffect, Timeline, build_timeline,
};
