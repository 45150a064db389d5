//! Host capability surface
//!
//! The scene engine that draws, tweens and plays sounds. The core only
//! calls into it; it never holds rendering objects itself, just the opaque
//! handles the host hands back.

use serde::{Deserialize, Serialize};

use crate::feedback::{Cue, Motion, SpawnSpec};
use crate::sim::{AnimalKind, Round};

/// Opaque on-screen entity id issued by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityHandle(pub u32);

/// Handles of everything drawn for one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEntities {
    pub shadow: Option<EntityHandle>,
    /// One draggable image per participant
    pub animals: Vec<(AnimalKind, EntityHandle)>,
    /// Entities spawned by feedback effects
    #[serde(default)]
    pub spawned: Vec<EntityHandle>,
}

impl RoundEntities {
    pub fn handle_of(&self, kind: AnimalKind) -> Option<EntityHandle> {
        self.animals
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, h)| *h)
    }

    pub fn kind_of(&self, handle: EntityHandle) -> Option<AnimalKind> {
        self.animals
            .iter()
            .find(|(_, h)| *h == handle)
            .map(|(k, _)| *k)
    }

    /// Forget an animal handle after it has been destroyed
    pub fn forget(&mut self, handle: EntityHandle) {
        self.animals.retain(|(_, h)| *h != handle);
        self.spawned.retain(|h| *h != handle);
        if self.shadow == Some(handle) {
            self.shadow = None;
        }
    }

    /// Whether the host drew the shadow and every participant of `round`
    pub fn covers(&self, round: &Round) -> bool {
        self.shadow.is_some()
            && round
                .participants
                .iter()
                .all(|kind| self.handle_of(*kind).is_some())
    }

    /// Every live handle, shadow first
    pub fn all(&self) -> Vec<EntityHandle> {
        self.shadow
            .into_iter()
            .chain(self.animals.iter().map(|(_, h)| *h))
            .chain(self.spawned.iter().copied())
            .collect()
    }
}

/// What the core needs from the scene engine
pub trait Host {
    /// Draw the shadow of the target and one draggable image per participant
    fn render(&mut self, round: &Round) -> RoundEntities;

    fn play_cue(&mut self, cue: Cue);

    /// Volume for cues played from now on (0.0 silences them)
    fn set_volume(&mut self, volume: f32);

    /// Start a tween on an existing entity
    fn animate(&mut self, target: EntityHandle, motion: &Motion);

    /// Spawn a non-interactive copy of an animal
    fn spawn_decorative(&mut self, kind: AnimalKind, spec: &SpawnSpec) -> EntityHandle;

    fn destroy(&mut self, handle: EntityHandle);

    /// Update the star counter on the HUD
    fn set_stars(&mut self, count: u32);

    fn show_completion(&mut self, final_correct_count: u32);

    /// Show or hide the "go back home?" prompt
    fn show_home_prompt(&mut self, visible: bool);

    /// Leave the game
    fn navigate(&mut self, url: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> RoundEntities {
        RoundEntities {
            shadow: Some(EntityHandle(1)),
            animals: vec![
                (AnimalKind::Lion, EntityHandle(2)),
                (AnimalKind::Hippo, EntityHandle(3)),
            ],
            spawned: vec![EntityHandle(9)],
        }
    }

    #[test]
    fn test_lookup() {
        let e = entities();
        assert_eq!(e.handle_of(AnimalKind::Hippo), Some(EntityHandle(3)));
        assert_eq!(e.kind_of(EntityHandle(2)), Some(AnimalKind::Lion));
        assert_eq!(e.kind_of(EntityHandle(1)), None);
    }

    #[test]
    fn test_forget() {
        let mut e = entities();
        e.forget(EntityHandle(2));
        e.forget(EntityHandle(9));
        assert_eq!(e.all(), vec![EntityHandle(1), EntityHandle(3)]);
        e.forget(EntityHandle(1));
        assert_eq!(e.shadow, None);
    }

    #[test]
    fn test_covers_round() {
        let round = Round {
            participants: vec![AnimalKind::Lion, AnimalKind::Hippo],
            target: AnimalKind::Hippo,
        };
        let mut e = entities();
        assert!(e.covers(&round));

        e.forget(EntityHandle(3));
        assert!(!e.covers(&round));
        assert!(!RoundEntities::default().covers(&round));
    }

    #[test]
    fn test_handles_deserialize_from_host_json() {
        let json = r#"{"shadow":7,"animals":[["cat",8],["dog",9]]}"#;
        let e: RoundEntities = serde_json::from_str(json).unwrap();
        assert_eq!(e.shadow, Some(EntityHandle(7)));
        assert_eq!(e.handle_of(AnimalKind::Dog), Some(EntityHandle(9)));
        assert!(e.spawned.is_empty());
    }
}
