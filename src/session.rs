//! Game session
//!
//! One owned object per play-through. It wires the round controller, the
//! feedback scheduler and the host together:
//!
//! 1. `start_game` starts a round and asks the host to render it.
//! 2. `report_drag_end` turns an overlapping drop into an outcome and starts
//!    its feedback timeline.
//! 3. `tick` plays due effects; the end signal settles the outcome and either
//!    renders the next round or shows the completion screen.

use crate::error::RoundError;
use crate::feedback::{Effect, Role, Scheduler, Timeline, TimelineTicket, build_timeline};
use crate::host::{EntityHandle, Host, RoundEntities};
use crate::settings::Settings;
use crate::sim::{AnimalKind, DropOutcome, RoundController, Settlement};

/// Which screen the session is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Start button
    Title,
    /// Rounds in progress
    Playing,
    /// All stars collected
    Complete,
}

pub struct GameSession<H: Host> {
    host: H,
    controller: RoundController,
    scheduler: Scheduler,
    screen: Screen,
    entities: RoundEntities,
    /// Outcome whose feedback is playing
    resolving: Option<(TimelineTicket, DropOutcome)>,
    stars: u32,
    rounds_played: u32,
    home_prompt: bool,
    settings: Settings,
}

impl<H: Host> GameSession<H> {
    /// Create a session from settings. Fails if the catalog is too small.
    pub fn new(host: H, settings: &Settings, seed: u64) -> Result<Self, RoundError> {
        let controller = RoundController::new(settings.catalog(), settings.round_config(), seed)?;
        Ok(Self::with_controller(host, controller, settings.clone()))
    }

    pub fn with_controller(host: H, controller: RoundController, settings: Settings) -> Self {
        Self {
            host,
            controller,
            scheduler: Scheduler::new(),
            screen: Screen::Title,
            entities: RoundEntities::default(),
            resolving: None,
            stars: 0,
            rounds_played: 0,
            home_prompt: false,
            settings,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn controller(&self) -> &RoundController {
        &self.controller
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Handles of the round on screen
    pub fn entities(&self) -> &RoundEntities {
        &self.entities
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_home_prompt_visible(&self) -> bool {
        self.home_prompt
    }

    /// Timeline in flight, for hosts that drive effects with their own timers
    pub fn active_timeline(&self) -> Option<(TimelineTicket, &Timeline)> {
        self.scheduler.active()
    }

    /// Leave the title screen and show the first round
    pub fn start_game(&mut self) {
        if self.screen != Screen::Title {
            log::debug!("start_game ignored on {:?}", self.screen);
            return;
        }
        log::info!("Game started (seed {})", self.controller.seed());
        self.screen = Screen::Playing;
        self.host.set_stars(0);
        self.begin_round();
    }

    fn begin_round(&mut self) {
        match self.controller.start_round() {
            Ok(round) => {
                self.rounds_played += 1;
                log::info!(
                    "Round {}: whose shadow is the {}?",
                    self.rounds_played,
                    round.target
                );
                self.show_round();
            }
            Err(e) => log::debug!("Round not started: {}", e),
        }
    }

    /// Draw the active round. If the host cannot, the play-through is
    /// abandoned rather than left with a round nobody can answer.
    fn show_round(&mut self) {
        let Some(round) = self.controller.round() else {
            return;
        };
        self.entities = self.host.render(round);
        if self.entities.covers(round) {
            return;
        }
        log::error!(
            "Host could not draw round {}, returning to the title screen",
            self.rounds_played
        );
        self.abandon();
    }

    /// A drag gesture ended. Only drops overlapping the shadow count.
    pub fn report_drag_end(
        &mut self,
        handle: EntityHandle,
        overlaps_target: bool,
        now_ms: f64,
    ) -> Option<DropOutcome> {
        if !overlaps_target || self.screen != Screen::Playing || self.home_prompt {
            return None;
        }
        let Some(kind) = self.entities.kind_of(handle) else {
            log::debug!("Drag end on unknown entity {:?}", handle);
            return None;
        };

        match self.controller.propose_drop(kind) {
            Ok(outcome) => {
                log::info!(
                    "Dropped {} on the {} shadow: {:?}",
                    kind,
                    outcome.target(),
                    outcome.kind()
                );
                let ticket = self.scheduler.play(build_timeline(&outcome), now_ms);
                self.resolving = Some((ticket, outcome));
                // Effects at offset zero start right away
                self.tick(now_ms);
                Some(outcome)
            }
            Err(e) if e.is_ignorable() => {
                log::debug!("Drop ignored: {}", e);
                None
            }
            Err(e) => {
                log::warn!("Drop rejected: {}", e);
                None
            }
        }
    }

    /// Advance the feedback timeline to `now_ms`
    pub fn tick(&mut self, now_ms: f64) {
        for due in self.scheduler.poll(now_ms) {
            self.execute(due.effect);
        }
    }

    /// Run one effect delivered by a host timer. Stale tickets do nothing.
    pub fn fire(&mut self, ticket: TimelineTicket, index: usize) {
        if let Some(due) = self.scheduler.fire(ticket, index) {
            self.execute(due.effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        let Some((_, outcome)) = self.resolving else {
            return;
        };
        log::trace!("Effect {:?}", effect);

        match effect {
            Effect::Cue(cue) => self.host.play_cue(cue),
            Effect::Animate { who, motion } => {
                for handle in self.resolve(who, &outcome) {
                    self.host.animate(handle, &motion);
                }
            }
            Effect::Destroy { who } => {
                for handle in self.resolve(who, &outcome) {
                    self.host.destroy(handle);
                    self.entities.forget(handle);
                }
            }
            Effect::Spawn { of, spec } => {
                let kind = self.kind_for(of, &outcome);
                let handle = self.host.spawn_decorative(kind, &spec);
                self.entities.spawned.push(handle);
            }
            Effect::StarIncrement => {
                self.stars += 1;
                self.host.set_stars(self.stars);
            }
            Effect::End => self.settle(outcome),
        }
    }

    /// Handles playing a role in the current round
    fn resolve(&self, who: Role, outcome: &DropOutcome) -> Vec<EntityHandle> {
        match who {
            Role::Dropped => self.entities.handle_of(outcome.dropped()).into_iter().collect(),
            Role::Target => self.entities.handle_of(outcome.target()).into_iter().collect(),
            Role::Shadow => self.entities.shadow.into_iter().collect(),
            Role::Distractors => self
                .entities
                .animals
                .iter()
                .filter(|(kind, _)| *kind != outcome.target())
                .map(|(_, handle)| *handle)
                .collect(),
        }
    }

    fn kind_for(&self, role: Role, outcome: &DropOutcome) -> AnimalKind {
        match role {
            Role::Dropped => outcome.dropped(),
            Role::Target | Role::Shadow | Role::Distractors => outcome.target(),
        }
    }

    fn settle(&mut self, outcome: DropOutcome) {
        self.resolving = None;
        match self.controller.on_outcome_settled(outcome) {
            Ok(Settlement::NextRound) => {
                log::debug!("{} correct to go", self.controller.progress().remaining());
                self.clear_round();
                self.begin_round();
            }
            Ok(Settlement::Complete {
                final_correct_count,
            }) => {
                self.clear_round();
                self.screen = Screen::Complete;
                self.host.show_completion(final_correct_count);
            }
            Err(e) => log::debug!("Settlement ignored: {}", e),
        }
    }

    /// Destroy whatever is left of the round on screen
    fn clear_round(&mut self) {
        for handle in self.entities.all() {
            self.host.destroy(handle);
        }
        self.entities = RoundEntities::default();
    }

    /// Cancel feedback, clear the screen and score, and go back to the title
    fn abandon(&mut self) {
        if let Some(ticket) = self.scheduler.cancel() {
            log::debug!("Timeline {} cancelled", ticket.id());
        }
        self.resolving = None;
        self.clear_round();
        self.controller.reset();
        self.stars = 0;
        self.rounds_played = 0;
        self.host.set_stars(0);
        self.screen = Screen::Title;
    }

    /// Start over with zero stars
    pub fn retry(&mut self) {
        self.dismiss_exit();
        self.abandon();
        log::info!("Retry");

        match self.controller.retry() {
            Ok(_) => {
                self.screen = Screen::Playing;
                self.rounds_played = 1;
                self.show_round();
            }
            Err(e) => log::error!("Retry failed: {}", e),
        }
    }

    /// Mute button: flip the mute setting and remember it
    pub fn toggle_mute(&mut self) {
        self.settings.muted = !self.settings.muted;
        log::info!("Sound {}", if self.settings.muted { "off" } else { "on" });
        self.host.set_volume(self.settings.effective_volume());
        self.settings.save();
    }

    /// Home button: ask before leaving
    pub fn request_exit(&mut self) {
        if !self.home_prompt {
            self.home_prompt = true;
            self.host.show_home_prompt(true);
        }
    }

    /// "No" or close on the home prompt
    pub fn dismiss_exit(&mut self) {
        if self.home_prompt {
            self.home_prompt = false;
            self.host.show_home_prompt(false);
        }
    }

    /// "Yes" on the home prompt
    pub fn confirm_exit(&mut self) {
        if self.home_prompt {
            self.dismiss_exit();
            self.exit();
        }
    }

    /// Leave the game without asking. The session is back on the title
    /// screen in case the host stays on this page.
    pub fn exit(&mut self) {
        self.dismiss_exit();
        self.abandon();
        log::info!("Leaving for {}", self.settings.home_url);
        self.host.navigate(&self.settings.home_url);
    }
}
