use log::debug;
use rand::Rng;
use std::collections::HashMap;

use super::{
    combatant::{Combatant, CombatantKind, MonsterStats},
    dice::roll_d20,
};

pub const PLAYER_INITIATIVE_BONUS: i32 = 2;
pub const MIN_DERIVED_MODIFIER: i32 = -1;
pub const MAX_DERIVED_MODIFIER: i32 = 6;
const MAX_CR_BONUS: i32 = 4;

fn type_bonus(creature_type: &str) -> i32 {
    match creature_type.trim().to_ascii_lowercase().as_str() {
        "beast" | "fey" => 2,
        "humanoid" | "monstrosity" | "fiend" | "celestial" | "dragon" | "elemental" | "giant" => 1,
        "undead" | "construct" | "ooze" | "plant" => -1,
        _ => 0,
    }
}

fn monster_modifier(stats: &MonsterStats) -> i32 {
    let cr_bonus = ((stats.cr_value.max(0.0) / 4.0).floor() as i32).min(MAX_CR_BONUS);
    type_bonus(&stats.creature_type) + cr_bonus
}

/// The modifier added to the d20. Ability scores are usually missing, so
/// unless one was given explicitly it is derived from the combatant class.
pub fn initiative_modifier(combatant: &Combatant) -> i32 {
    if let Some(modifier) = combatant.initiative_modifier {
        return modifier;
    }
    match &combatant.kind {
        CombatantKind::Player { .. } => PLAYER_INITIATIVE_BONUS,
        CombatantKind::Monster(stats) => monster_modifier(stats),
    }
}

pub fn roll_initiative<R: Rng + ?Sized>(rng: &mut R, combatant: &Combatant) -> i32 {
    roll_d20(rng, initiative_modifier(combatant))
}

/// Returns a copy of `combatants` with freshly rolled initiative, order kept.
pub fn roll_all_initiative<R: Rng + ?Sized>(rng: &mut R, combatants: &[Combatant]) -> Vec<Combatant> {
    combatants
        .iter()
        .map(|combatant| Combatant {
            initiative: roll_initiative(rng, combatant),
            ..combatant.clone()
        })
        .collect()
}

/// Like [`roll_all_initiative`] but combatants sharing a name share a roll.
pub fn roll_all_initiative_grouped<R: Rng + ?Sized>(
    rng: &mut R,
    combatants: &[Combatant],
) -> Vec<Combatant> {
    let mut initiative_map = HashMap::new();
    combatants
        .iter()
        .map(|combatant| {
            let initiative = *initiative_map
                .entry(combatant.name.clone())
                .or_insert_with(|| roll_initiative(rng, combatant));
            Combatant {
                initiative,
                ..combatant.clone()
            }
        })
        .collect()
}

/// Stable sort, highest initiative first. Callers reset the turn pointer.
pub fn sort_by_initiative(combatants: &[Combatant]) -> Vec<Combatant> {
    debug!("Sorting {} combatants by initiative", combatants.len());
    let mut sorted = combatants.to_vec();
    sorted.sort_by(|a, b| b.initiative.cmp(&a.initiative));
    sorted
}
