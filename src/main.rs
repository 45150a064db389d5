//! Shadow Match entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use shadow_match::Settings;
    use shadow_match::host::EntityHandle;
    use shadow_match::platform::web::WebHost;
    use shadow_match::session::GameSession;

    type Game = GameSession<WebHost>;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Shadow Match starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let host = WebHost::new(settings.effective_volume());
        let game = match GameSession::new(host, &settings, seed) {
            Ok(game) => Rc::new(RefCell::new(game)),
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };

        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_buttons(game.clone());
        setup_drag_hook(game.clone());
        request_animation_frame(game);

        log::info!("Shadow Match running!");
    }

    fn on_click(id: &str, game: Rc<RefCell<Game>>, action: fn(&mut Game)) {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                action(&mut game.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Button #{} not found", id);
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        on_click("start-btn", game.clone(), |g| g.start_game());
        on_click("retry-btn", game.clone(), |g| g.retry());
        on_click("exit-btn", game.clone(), |g| g.exit());
        on_click("mute-btn", game.clone(), |g| g.toggle_mute());
        on_click("home-btn", game.clone(), |g| g.request_exit());
        on_click("home-yes", game.clone(), |g| g.confirm_exit());
        on_click("home-no", game.clone(), |g| g.dismiss_exit());
        on_click("modal-close", game, |g| g.dismiss_exit());
    }

    /// Scene engine reports drags via `window.shadowMatchDragEnd(handle, overlaps)`
    fn setup_drag_hook(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(u32, bool)>::new(move |handle: u32, overlaps: bool| {
            let now = js_sys::Date::now();
            game.borrow_mut()
                .report_drag_end(EntityHandle(handle), overlaps, now);
        });
        let _ = js_sys::Reflect::set(
            &window,
            &JsValue::from_str("shadowMatchDragEnd"),
            closure.as_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        // Same clock as drag events
        game.borrow_mut().tick(js_sys::Date::now());
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shadow Match (native) starting...");
    log::info!("Native mode runs a headless demo - serve the web build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(7);

    match demo::run(seed) {
        Ok(summary) => println!("\n{}", summary),
        Err(e) => {
            log::error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless play-through that logs every host call
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::SeedableRng;
    use rand::seq::IndexedRandom;
    use rand_pcg::Pcg32;

    use shadow_match::feedback::{Cue, Motion, SpawnSpec};
    use shadow_match::host::{EntityHandle, Host, RoundEntities};
    use shadow_match::session::{GameSession, Screen};
    use shadow_match::sim::{AnimalKind, Round};
    use shadow_match::{RoundError, Settings};

    /// Frame step of the simulated clock
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this many rounds
    const MAX_ROUNDS: u32 = 100;

    #[derive(Default)]
    struct LogHost {
        next_handle: u32,
        cues: u32,
    }

    impl LogHost {
        fn handle(&mut self) -> EntityHandle {
            self.next_handle += 1;
            EntityHandle(self.next_handle)
        }
    }

    impl Host for LogHost {
        fn render(&mut self, round: &Round) -> RoundEntities {
            log::info!("render: shadow-{} over {:?}", round.target, round.participants);
            let shadow = Some(self.handle());
            let animals = round
                .participants
                .iter()
                .map(|kind| (*kind, self.handle()))
                .collect();
            RoundEntities {
                shadow,
                animals,
                spawned: Vec::new(),
            }
        }

        fn play_cue(&mut self, cue: Cue) {
            self.cues += 1;
            log::debug!("cue: {}", cue.as_str());
        }

        fn set_volume(&mut self, volume: f32) {
            log::info!("volume: {}", volume);
        }

        fn animate(&mut self, target: EntityHandle, motion: &Motion) {
            log::debug!("animate {:?}: {:?}", target, motion);
        }

        fn spawn_decorative(&mut self, kind: AnimalKind, spec: &SpawnSpec) -> EntityHandle {
            let handle = self.handle();
            log::debug!("spawn {} as {:?}: {:?}", kind, handle, spec);
            handle
        }

        fn destroy(&mut self, handle: EntityHandle) {
            log::debug!("destroy {:?}", handle);
        }

        fn set_stars(&mut self, count: u32) {
            log::info!("stars: {}", count);
        }

        fn show_completion(&mut self, final_correct_count: u32) {
            log::info!("completion screen: {} stars", final_correct_count);
        }

        fn show_home_prompt(&mut self, visible: bool) {
            log::debug!("home prompt visible: {}", visible);
        }

        fn navigate(&mut self, url: &str) {
            log::info!("navigate to {}", url);
        }
    }

    /// Play until completion, dropping a random animal each round
    pub fn run(seed: u64) -> Result<String, RoundError> {
        let settings = Settings::load();
        let mut game = GameSession::new(LogHost::default(), &settings, seed)?;
        let mut child = Pcg32::seed_from_u64(seed.wrapping_add(1));
        let mut now = 0.0;

        game.start_game();
        while game.screen() == Screen::Playing && game.rounds_played() <= MAX_ROUNDS {
            let choice = game
                .entities()
                .animals
                .choose(&mut child)
                .map(|(_, handle)| *handle);
            let Some(handle) = choice else {
                break;
            };
            if game.report_drag_end(handle, true, now).is_none() {
                log::warn!("Drop on {:?} was not accepted", handle);
                break;
            }

            while game.active_timeline().is_some() {
                now += FRAME_MS;
                game.tick(now);
            }
        }

        let progress = game.controller().progress();
        Ok(format!(
            "Seed {}: {}/{} correct in {} rounds, {} cues, {:.1}s of feedback",
            seed,
            progress.correct_count,
            progress.required_correct,
            game.rounds_played(),
            game.host().cues,
            now / 1000.0
        ))
    }
}
