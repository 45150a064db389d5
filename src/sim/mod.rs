//! Deterministic round logic
//!
//! All matching rules live here. This module must stay pure:
//! - Seeded RNG only
//! - No rendering, timing or platform dependencies
//! - Holds animal kinds and counts, never scene objects

pub mod catalog;
pub mod controller;
pub mod state;

pub use catalog::{AnimalKind, Catalog};
pub use controller::{RoundConfig, RoundController};
pub use state::{DropOutcome, GameProgress, OutcomeKind, Round, RoundPhase, Settlement};
