//! Timeline scheduler
//!
//! Plays one timeline at a time against the host clock. Starting a new
//! timeline invalidates the previous one (cancellation, not queuing).
//!
//! Two driving styles are supported:
//! - Frame loop: call [`Scheduler::poll`] with the current time each frame.
//! - Timer callbacks: schedule each effect on a host timer and call
//!   [`Scheduler::fire`] with the ticket when it goes off. Callbacks carrying
//!   a stale ticket get `None` and must do nothing.

use serde::{Deserialize, Serialize};

use super::timeline::{Effect, TimedEffect, Timeline};

/// Handle to a timeline issued by [`Scheduler::play`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineTicket(u64);

impl TimelineTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Playing {
    ticket: TimelineTicket,
    timeline: Timeline,
    started_at_ms: f64,
    fired: Vec<bool>,
}

impl Playing {
    fn take(&mut self, index: usize) -> Option<TimedEffect> {
        let effect = *self.timeline.effects().get(index)?;
        if std::mem::replace(&mut self.fired[index], true) {
            return None;
        }
        Some(effect)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_ticket: u64,
    playing: Option<Playing>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing a timeline, replacing any unfinished one
    pub fn play(&mut self, timeline: Timeline, now_ms: f64) -> TimelineTicket {
        if let Some(old) = self.cancel() {
            log::debug!("Timeline {} replaced before it finished", old.id());
        }

        self.next_ticket += 1;
        let ticket = TimelineTicket(self.next_ticket);
        log::debug!(
            "Timeline {} started ({:?}, {} effects, {} ms)",
            ticket.id(),
            timeline.kind,
            timeline.effects().len(),
            timeline.duration_ms()
        );

        self.playing = Some(Playing {
            ticket,
            fired: vec![false; timeline.effects().len()],
            timeline,
            started_at_ms: now_ms,
        });
        ticket
    }

    /// Drop the active timeline; its pending effects become no-ops
    pub fn cancel(&mut self) -> Option<TimelineTicket> {
        self.playing.take().map(|p| p.ticket)
    }

    /// Whether `ticket` refers to the timeline currently playing
    pub fn is_live(&self, ticket: TimelineTicket) -> bool {
        self.playing.as_ref().is_some_and(|p| p.ticket == ticket)
    }

    /// The timeline currently playing
    pub fn active(&self) -> Option<(TimelineTicket, &Timeline)> {
        self.playing.as_ref().map(|p| (p.ticket, &p.timeline))
    }

    /// Effects due at `now_ms`, in offset order. The timeline is released
    /// once its end signal has been handed out.
    pub fn poll(&mut self, now_ms: f64) -> Vec<TimedEffect> {
        let Some(playing) = &mut self.playing else {
            return Vec::new();
        };

        let elapsed = now_ms - playing.started_at_ms;
        let mut due = Vec::new();
        for index in 0..playing.timeline.effects().len() {
            let offset = playing.timeline.effects()[index].offset_ms;
            if f64::from(offset) > elapsed {
                break;
            }
            if let Some(effect) = playing.take(index) {
                due.push(effect);
            }
        }

        if due.iter().any(|e| e.effect == Effect::End) {
            self.playing = None;
        }
        due
    }

    /// Timer-callback entry: the effect at `index` if `ticket` is still live
    /// and the effect has not run yet
    pub fn fire(&mut self, ticket: TimelineTicket, index: usize) -> Option<TimedEffect> {
        let playing = self.playing.as_mut().filter(|p| p.ticket == ticket)?;
        let effect = playing.take(index)?;
        if effect.effect == Effect::End {
            self.playing = None;
        }
        Some(effect)
    }
}
