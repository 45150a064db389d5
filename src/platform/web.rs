//! Browser host
//!
//! Forwards host calls to a global `shadowMatchHost` object provided by the
//! page's scene engine. Structured payloads cross the boundary as JSON.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::feedback::{Cue, Motion, SpawnSpec};
use crate::host::{EntityHandle, Host, RoundEntities};
use crate::sim::{AnimalKind, Round};

#[wasm_bindgen(inline_js = "
    function host() {
        const h = globalThis.shadowMatchHost;
        if (!h) {
            throw new Error('shadowMatchHost is not installed');
        }
        return h;
    }

    export function host_render(request) {
        return JSON.stringify(host().renderRound(JSON.parse(request)));
    }

    export function host_play_cue(name, volume) {
        host().playCue(name, volume);
    }

    export function host_animate(handle, motion) {
        host().animate(handle, JSON.parse(motion));
    }

    export function host_spawn(kind, spec) {
        return host().spawnDecorative(kind, JSON.parse(spec));
    }

    export function host_destroy(handle) {
        host().destroy(handle);
    }

    export function host_set_stars(count) {
        host().setStars(count);
    }

    export function host_show_completion(count) {
        host().showCompletion(count);
    }

    export function host_show_home_prompt(visible) {
        host().showHomePrompt(visible);
    }
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn host_render(request: &str) -> Result<String, JsValue>;
    #[wasm_bindgen(catch)]
    fn host_play_cue(name: &str, volume: f32) -> Result<(), JsValue>;
    #[wasm_bindgen(catch)]
    fn host_animate(handle: u32, motion: &str) -> Result<(), JsValue>;
    #[wasm_bindgen(catch)]
    fn host_spawn(kind: &str, spec: &str) -> Result<u32, JsValue>;
    #[wasm_bindgen(catch)]
    fn host_destroy(handle: u32) -> Result<(), JsValue>;
    #[wasm_bindgen(catch)]
    fn host_set_stars(count: u32) -> Result<(), JsValue>;
    #[wasm_bindgen(catch)]
    fn host_show_completion(count: u32) -> Result<(), JsValue>;
    #[wasm_bindgen(catch)]
    fn host_show_home_prompt(visible: bool) -> Result<(), JsValue>;
}

/// What the page needs to draw a round
#[derive(Serialize)]
struct RenderRequest<'a> {
    target: &'a str,
    shadow: String,
    participants: Vec<&'a str>,
}

impl<'a> RenderRequest<'a> {
    fn new(round: &'a Round) -> Self {
        Self {
            target: round.target.texture_key(),
            shadow: round.target.shadow_key(),
            participants: round
                .participants
                .iter()
                .map(AnimalKind::texture_key)
                .collect(),
        }
    }
}

fn report(call: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("Host {} failed: {:?}", call, e);
    }
}

/// `Host` backed by the page's scene engine
pub struct WebHost {
    volume: f32,
}

impl WebHost {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

impl Host for WebHost {
    fn render(&mut self, round: &Round) -> RoundEntities {
        let request = match serde_json::to_string(&RenderRequest::new(round)) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Could not encode round: {}", e);
                return RoundEntities::default();
            }
        };
        let reply = match host_render(&request) {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Host render failed: {:?}", e);
                return RoundEntities::default();
            }
        };
        serde_json::from_str(&reply).unwrap_or_else(|e| {
            log::error!("Unreadable render reply {}: {}", reply, e);
            RoundEntities::default()
        })
    }

    fn play_cue(&mut self, cue: Cue) {
        if self.volume <= 0.0 {
            return;
        }
        report("playCue", host_play_cue(cue.as_str(), self.volume));
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn animate(&mut self, target: EntityHandle, motion: &Motion) {
        match serde_json::to_string(motion) {
            Ok(json) => report("animate", host_animate(target.0, &json)),
            Err(e) => log::warn!("Could not encode motion: {}", e),
        }
    }

    fn spawn_decorative(&mut self, kind: AnimalKind, spec: &SpawnSpec) -> EntityHandle {
        let result = serde_json::to_string(spec)
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|json| host_spawn(kind.texture_key(), &json));
        match result {
            Ok(handle) => EntityHandle(handle),
            Err(e) => {
                log::warn!("Host spawnDecorative failed: {:?}", e);
                // Never issued by the host, so destroying it is a no-op there
                EntityHandle(u32::MAX)
            }
        }
    }

    fn destroy(&mut self, handle: EntityHandle) {
        report("destroy", host_destroy(handle.0));
    }

    fn set_stars(&mut self, count: u32) {
        report("setStars", host_set_stars(count));
    }

    fn show_completion(&mut self, final_correct_count: u32) {
        report("showCompletion", host_show_completion(final_correct_count));
    }

    fn show_home_prompt(&mut self, visible: bool) {
        report("showHomePrompt", host_show_home_prompt(visible));
    }

    fn navigate(&mut self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(url) {
            log::warn!("Navigation to {} failed: {:?}", url, e);
        }
    }
}
