//! Encounter building and initiative tracking for D&D 5e.
//!
//! The store in [`store`] owns all state and changes only through
//! [`store::Action`]s; the other modules are the pure rules it delegates to.

pub mod builder;
pub mod combat;
pub mod creature;
pub mod difficulty;
pub mod dto;
pub mod encounter;
pub mod import;
pub mod persist;
pub mod reminders;
pub mod store;
pub mod validation;

pub use combat::combatant::{Combatant, CombatantKind, HpStatus, MonsterStats};
pub use combat::condition::{Condition, ConditionTarget, StandardCondition};
pub use creature::{CrXpTable, Creature};
pub use difficulty::{calculate_difficulty, Difficulty, DifficultySummary, Thresholds, Tier};
pub use encounter::{Encounter, SavedEncounter};
pub use store::{Action, EncounterStore};
