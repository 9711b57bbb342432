use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::combat::combatant::{Combatant, HpStatus};
use crate::difficulty::DifficultySummary;
use crate::encounter::Encounter;

/// Read-only view of a combatant for the UI.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CombatantView {
    pub id: Uuid,
    pub name: String,
    pub is_pc: bool,
    pub initiative: i32,
    pub hp: u32,
    pub max_hp: u32,
    pub temp_hp: u32,
    pub ac: i32,
    pub status: HpStatus,
    pub conditions: String,
    pub is_current: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncounterView {
    pub id: Uuid,
    pub name: String,
    pub round: u32,
    pub current_turn: usize,
    pub party_size: u32,
    pub party_level: u8,
    pub xp_budget: u32,
    pub used_xp: u32,
    pub difficulty: DifficultySummary,
    pub combatants: Vec<CombatantView>,
}

impl CombatantView {
    fn new(c: &Combatant, is_current: bool) -> Self {
        Self {
            id: c.id,
            name: c.display_name(),
            is_pc: c.is_pc(),
            initiative: c.initiative,
            hp: c.hp,
            max_hp: c.max_hp,
            temp_hp: c.temp_hp,
            ac: c.ac,
            status: c.hp_status(),
            conditions: c.conditions.iter().join(", "),
            is_current,
        }
    }

    /// Initiative, name, hp, ac, status and conditions as table cells.
    pub fn row(&self) -> Vec<String> {
        let hp = if self.temp_hp > 0 {
            format!("{}/{} (+{})", self.hp, self.max_hp, self.temp_hp)
        } else {
            format!("{}/{}", self.hp, self.max_hp)
        };
        vec![
            self.initiative.to_string(),
            self.name.clone(),
            hp,
            self.ac.to_string(),
            self.status.to_string(),
            self.conditions.clone(),
        ]
    }
}

impl From<&Encounter> for EncounterView {
    fn from(e: &Encounter) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            round: e.round(),
            current_turn: e.current_turn(),
            party_size: e.party_size,
            party_level: e.party_level,
            xp_budget: e.xp_budget,
            used_xp: e.used_xp,
            difficulty: e.difficulty_summary(),
            combatants: e
                .combatants
                .iter()
                .enumerate()
                .map(|(i, c)| CombatantView::new(c, i == e.current_turn()))
                .collect(),
        }
    }
}
