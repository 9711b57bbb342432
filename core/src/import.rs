//! YAML inputs: combat files (players plus monster groups) and bestiaries.

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    combat::{
        combatant::{Combatant, CombatantKind, MonsterStats},
        condition::Condition,
    },
    creature::{cr_value, CrXpTable, Creature},
    encounter::Encounter,
};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yml::Error),
}

#[derive(Debug, Deserialize, Serialize)]
struct CombatInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    party_level: Option<u8>,
    #[serde(default)]
    players: Vec<PlayerEntry>,
    #[serde(default)]
    monsters: Vec<MonsterEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
struct PlayerEntry {
    name: String,
    #[serde(default = "default_level")]
    level: u8,
    #[serde(default)]
    initiative_modifier: Option<i32>,
    ac: i32,
    max_hp: u32,
    #[serde(default)]
    current_hp: Option<u32>,
    #[serde(default)]
    conditions: Vec<Condition>,
}

#[derive(Debug, Deserialize, Serialize)]
struct MonsterEntry {
    count: Option<usize>,
    stats: MonsterStatBlock,
}

#[derive(Debug, Deserialize, Serialize)]
struct MonsterStatBlock {
    name: String,
    #[serde(default)]
    initiative_modifier: Option<i32>,
    ac: i32,
    max_hp: u32,
    #[serde(default)]
    current_hp: Option<u32>,
    #[serde(default = "default_cr")]
    cr: String,
    #[serde(rename = "type", default)]
    creature_type: String,
    #[serde(default)]
    environment: Vec<String>,
    #[serde(default)]
    xp: Option<u32>,
    #[serde(default)]
    conditions: Vec<Condition>,
}

fn default_level() -> u8 {
    1
}

fn default_cr() -> String {
    "0".to_string()
}

impl PlayerEntry {
    fn into_combatant(self) -> Combatant {
        let mut player = Combatant::new(
            &self.name,
            CombatantKind::Player { level: self.level },
            self.max_hp,
            self.ac,
        );
        player.initiative_modifier = self.initiative_modifier;
        player.set_hp(self.current_hp.unwrap_or(self.max_hp));
        player.conditions = self.conditions;
        player
    }
}

impl MonsterStatBlock {
    fn to_combatant(&self, table: &CrXpTable) -> Combatant {
        let stats = MonsterStats {
            cr: self.cr.clone(),
            cr_value: cr_value(&self.cr).unwrap_or(0.0),
            creature_type: self.creature_type.clone(),
            environment: self.environment.clone(),
            xp: self.xp.or_else(|| table.xp_for(&self.cr)).unwrap_or(0),
        };
        let mut monster = Combatant::monster(&self.name, stats, self.max_hp, self.ac);
        monster.initiative_modifier = self.initiative_modifier;
        // a missing or zero current_hp means an unhurt monster
        monster.set_hp(self.current_hp.filter(|hp| *hp > 0).unwrap_or(self.max_hp));
        monster.conditions = self.conditions.clone();
        monster
    }
}

/// Builds an encounter from a combat file. The party size is the number of
/// listed players; the party level is taken from the file or from the
/// average player level.
pub fn encounter_from_yaml(yaml: &str, table: &CrXpTable) -> Result<Encounter, ImportError> {
    let combat_data: CombatInfo = serde_yml::from_str(yaml)?;

    let party_size = combat_data.players.len() as u32;
    let party_level = combat_data.party_level.unwrap_or_else(|| {
        let total: u32 = combat_data.players.iter().map(|p| u32::from(p.level)).sum();
        total
            .checked_div(party_size)
            .map_or(1, |avg| avg.clamp(1, u32::from(u8::MAX)) as u8)
    });
    let name = combat_data
        .name
        .clone()
        .unwrap_or_else(|| "Imported encounter".to_string());

    let mut encounter = Encounter::new(&name, party_size, party_level);
    for player in combat_data.players {
        encounter.add_combatant(player.into_combatant());
    }
    for monster_entry in combat_data.monsters {
        let count = monster_entry.count.unwrap_or(1);
        for _ in 0..count {
            encounter.add_combatant(monster_entry.stats.to_combatant(table));
        }
    }
    info!(
        "Imported {} combatants into {}",
        encounter.combatants.len(),
        encounter.name
    );
    Ok(encounter)
}

pub fn bestiary_from_yaml(yaml: &str) -> Result<Vec<Creature>, ImportError> {
    Ok(serde_yml::from_str(yaml)?)
}
