//! Animal catalog
//!
//! The fixed set of animals a session can draw from. Each kind maps to a
//! texture key for the animal and a `shadow-` key for its silhouette.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RoundError;

/// Animal identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalKind {
    Bear,
    Cat,
    Cow,
    Dog,
    Elephant,
    Giraffe,
    Hippo,
    Horse,
    Lion,
    Monkey,
    Panda,
    Penguin,
    Pig,
    Rabbit,
    Sheep,
}

impl AnimalKind {
    /// Every kind, in catalog order
    pub const ALL: [AnimalKind; 15] = [
        AnimalKind::Bear,
        AnimalKind::Cat,
        AnimalKind::Cow,
        AnimalKind::Dog,
        AnimalKind::Elephant,
        AnimalKind::Giraffe,
        AnimalKind::Hippo,
        AnimalKind::Horse,
        AnimalKind::Lion,
        AnimalKind::Monkey,
        AnimalKind::Panda,
        AnimalKind::Penguin,
        AnimalKind::Pig,
        AnimalKind::Rabbit,
        AnimalKind::Sheep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalKind::Bear => "bear",
            AnimalKind::Cat => "cat",
            AnimalKind::Cow => "cow",
            AnimalKind::Dog => "dog",
            AnimalKind::Elephant => "elephant",
            AnimalKind::Giraffe => "giraffe",
            AnimalKind::Hippo => "hippo",
            AnimalKind::Horse => "horse",
            AnimalKind::Lion => "lion",
            AnimalKind::Monkey => "monkey",
            AnimalKind::Panda => "panda",
            AnimalKind::Penguin => "penguin",
            AnimalKind::Pig => "pig",
            AnimalKind::Rabbit => "rabbit",
            AnimalKind::Sheep => "sheep",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Texture key of the animal image
    pub fn texture_key(&self) -> &'static str {
        self.as_str()
    }

    /// Texture key of the silhouette
    pub fn shadow_key(&self) -> String {
        format!("shadow-{}", self.as_str())
    }
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of distinct animals rounds are drawn from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    kinds: Vec<AnimalKind>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::full()
    }
}

impl Catalog {
    /// Build a catalog, keeping the first occurrence of duplicates
    pub fn new(kinds: impl IntoIterator<Item = AnimalKind>) -> Self {
        let mut unique: Vec<AnimalKind> = Vec::new();
        for kind in kinds {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        Self { kinds: unique }
    }

    /// All 15 animals
    pub fn full() -> Self {
        Self::new(AnimalKind::ALL)
    }

    pub fn kinds(&self) -> &[AnimalKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Check the catalog can fill a round of `per_round` distinct animals
    pub fn ensure_fits(&self, per_round: usize) -> Result<(), RoundError> {
        if self.kinds.len() < per_round {
            return Err(RoundError::CatalogExhausted {
                required: per_round,
                available: self.kinds.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in AnimalKind::ALL {
            assert_eq!(AnimalKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(AnimalKind::from_str(" Lion "), Some(AnimalKind::Lion));
        assert_eq!(AnimalKind::from_str("dragon"), None);
    }

    #[test]
    fn test_shadow_key() {
        assert_eq!(AnimalKind::Elephant.shadow_key(), "shadow-elephant");
        assert_eq!(AnimalKind::Hippo.texture_key(), "hippo");
    }

    #[test]
    fn test_catalog_dedups() {
        let catalog = Catalog::new([AnimalKind::Cat, AnimalKind::Bear, AnimalKind::Cat]);
        assert_eq!(catalog.kinds(), &[AnimalKind::Cat, AnimalKind::Bear]);
        assert_eq!(Catalog::full().len(), 15);
    }

    #[test]
    fn test_catalog_exhausted() {
        let catalog = Catalog::new([AnimalKind::Bear, AnimalKind::Cat]);
        assert_eq!(
            catalog.ensure_fits(3),
            Err(RoundError::CatalogExhausted {
                required: 3,
                available: 2
            })
        );
        assert!(catalog.ensure_fits(2).is_ok());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AnimalKind::Penguin).unwrap();
        assert_eq!(json, "\"penguin\"");
    }
}
