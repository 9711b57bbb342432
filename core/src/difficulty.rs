//! Encounter difficulty against per-level party XP thresholds.
//!
//! Classification compares the raw sum of monster XP with the party
//! thresholds. The monster-count multiplier is only reported alongside as
//! `adjusted_xp` for budgeting and never moves the classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encounter::Encounter;

/// easy, medium, hard, deadly for party levels 1..=10
const LEVEL_THRESHOLDS: [[u32; 4]; 10] = [
    [25, 50, 75, 100],
    [50, 100, 150, 200],
    [75, 150, 225, 400],
    [125, 250, 375, 500],
    [250, 500, 750, 1100],
    [300, 600, 900, 1400],
    [350, 750, 1100, 1700],
    [450, 900, 1400, 2100],
    [550, 1100, 1600, 2400],
    [600, 1200, 1900, 2800],
];

pub const MIN_PARTY_LEVEL: u8 = 1;
pub const MAX_PARTY_LEVEL: u8 = 10;

/// A target difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tier {
    Easy,
    #[default]
    Medium,
    Hard,
    Deadly,
}

/// The outcome of classifying an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Trivial,
    Easy,
    Medium,
    Hard,
    Deadly,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Thresholds {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
    pub deadly: u32,
}

impl Thresholds {
    /// Per-character thresholds; levels outside 1..=10 are clamped.
    pub fn for_level(level: u8) -> Self {
        let level = level.clamp(MIN_PARTY_LEVEL, MAX_PARTY_LEVEL);
        let [easy, medium, hard, deadly] = LEVEL_THRESHOLDS[usize::from(level - 1)];
        Self {
            easy,
            medium,
            hard,
            deadly,
        }
    }

    pub fn for_party(party_size: u32, party_level: u8) -> Self {
        let per_level = Self::for_level(party_level);
        Self {
            easy: per_level.easy.saturating_mul(party_size),
            medium: per_level.medium.saturating_mul(party_size),
            hard: per_level.hard.saturating_mul(party_size),
            deadly: per_level.deadly.saturating_mul(party_size),
        }
    }

    pub fn for_tier(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Easy => self.easy,
            Tier::Medium => self.medium,
            Tier::Hard => self.hard,
            Tier::Deadly => self.deadly,
        }
    }

    /// Highest threshold reached wins; below easy is trivial.
    pub fn classify(&self, xp: u32) -> Difficulty {
        if xp >= self.deadly {
            Difficulty::Deadly
        } else if xp >= self.hard {
            Difficulty::Hard
        } else if xp >= self.medium {
            Difficulty::Medium
        } else if xp >= self.easy {
            Difficulty::Easy
        } else {
            Difficulty::Trivial
        }
    }
}

/// Group-size multiplier applied to summed monster XP when budgeting.
pub fn encounter_multiplier(monster_count: usize) -> f64 {
    match monster_count {
        0 | 1 => 1.0,
        2 => 1.5,
        3..=4 => 2.0,
        5..=6 => 2.5,
        7..=8 => 3.0,
        9..=10 => 3.5,
        11..=12 => 4.0,
        13..=14 => 4.5,
        _ => 5.0,
    }
}

pub fn adjusted_xp(monster_xp: &[u32]) -> u32 {
    let total: u64 = monster_xp.iter().map(|xp| u64::from(*xp)).sum();
    let adjusted = (total as f64 * encounter_multiplier(monster_xp.len())).round();
    adjusted.min(f64::from(u32::MAX)) as u32
}

/// Total monster XP a party can face at the given tier.
pub fn xp_budget(party_size: u32, party_level: u8, tier: Tier) -> u32 {
    Thresholds::for_party(party_size, party_level).for_tier(tier)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultySummary {
    pub difficulty: Difficulty,
    pub xp: u32,
    pub adjusted_xp: u32,
    pub party_threshold: Thresholds,
}

pub fn calculate_difficulty(encounter: &Encounter) -> DifficultySummary {
    let monster_xp: Vec<u32> = encounter
        .combatants
        .iter()
        .filter(|c| !c.is_pc())
        .map(|c| c.xp())
        .collect();
    let xp = monster_xp.iter().fold(0u32, |acc, xp| acc.saturating_add(*xp));
    let party_threshold = Thresholds::for_party(encounter.party_size, encounter.party_level);
    DifficultySummary {
        difficulty: party_threshold.classify(xp),
        xp,
        adjusted_xp: adjusted_xp(&monster_xp),
        party_threshold,
    }
}
