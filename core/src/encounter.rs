use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::{
    combat::{
        combatant::Combatant,
        condition::{Condition, ConditionTarget},
        initiative::{roll_all_initiative, roll_all_initiative_grouped, sort_by_initiative},
        turn::TurnState,
    },
    difficulty::{calculate_difficulty, xp_budget, DifficultySummary, Tier},
};

/// One combat session: an initiative-ordered list of combatants plus the
/// builder configuration used to price it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub combatants: Vec<Combatant>,
    #[serde(flatten)]
    pub turn: TurnState,
    pub party_size: u32,
    pub party_level: u8,
    /// Target tier for the builder.
    #[serde(default)]
    pub difficulty: Tier,
    #[serde(default)]
    pub xp_budget: u32,
    #[serde(default)]
    pub used_xp: u32,
}

impl Encounter {
    pub fn new(name: &str, party_size: u32, party_level: u8) -> Self {
        let mut encounter = Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            notes: String::new(),
            combatants: Vec::new(),
            turn: TurnState::default(),
            party_size,
            party_level,
            difficulty: Tier::default(),
            xp_budget: 0,
            used_xp: 0,
        };
        encounter.recompute_derived();
        encounter
    }

    pub fn round(&self) -> u32 {
        self.turn.round
    }

    pub fn current_turn(&self) -> usize {
        self.turn.current_turn
    }

    pub fn current_combatant(&self) -> Option<&Combatant> {
        self.combatants.get(self.turn.current_turn)
    }

    pub fn combatant(&self, id: Uuid) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: Uuid) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }

    /// Refreshes `used_xp` and `xp_budget` from the combatants and party
    /// configuration.
    pub fn recompute_derived(&mut self) {
        self.used_xp = self
            .combatants
            .iter()
            .filter(|c| !c.is_pc())
            .fold(0u32, |acc, c| acc.saturating_add(c.xp()));
        self.xp_budget = xp_budget(self.party_size, self.party_level, self.difficulty);
    }

    /// Appends a combatant. Same-named combatants get display ordinals, and
    /// the first one of a name is renumbered once a second arrives. New
    /// ordinals continue after the highest one still in the encounter.
    pub fn add_combatant(&mut self, mut new_combatant: Combatant) {
        let highest_ordinal = self
            .combatants
            .iter()
            .filter(|c| c.name == new_combatant.name)
            .map(|c| c.ordinal.max(1))
            .max();

        if let Some(highest) = highest_ordinal {
            for combatant in &mut self.combatants {
                if combatant.name == new_combatant.name && combatant.ordinal == 0 {
                    combatant.ordinal = 1;
                }
            }
            new_combatant.ordinal = highest + 1;
        }
        new_combatant.normalize();
        debug!("Adding {} to {}", new_combatant.display_name(), self.name);
        self.combatants.push(new_combatant);
        self.recompute_derived();
    }

    /// Unknown ids are ignored.
    pub fn remove_combatant(&mut self, id: Uuid) -> Option<Combatant> {
        let index = self.position(id)?;
        let removed = self.combatants.remove(index);
        self.turn.on_removed(index, self.combatants.len());
        self.recompute_derived();
        Some(removed)
    }

    pub fn set_party(&mut self, party_size: u32, party_level: u8) {
        self.party_size = party_size;
        self.party_level = party_level;
        self.recompute_derived();
    }

    pub fn set_target_difficulty(&mut self, tier: Tier) {
        self.difficulty = tier;
        self.recompute_derived();
    }

    pub fn next_turn(&mut self) {
        self.turn.next_turn(self.combatants.len());
    }

    pub fn previous_turn(&mut self) {
        self.turn.previous_turn(self.combatants.len());
    }

    pub fn next_round(&mut self) {
        self.turn.next_round();
    }

    /// Full reset: turn pointer, initiative, conditions and hit points.
    pub fn reset(&mut self) {
        info!("Resetting encounter {}", self.name);
        self.turn.reset();
        for combatant in self.combatants.iter_mut() {
            combatant.reset();
        }
    }

    /// Rolls for everyone, then sorts and hands the turn to the top.
    pub fn roll_initiative<R: Rng + ?Sized>(&mut self, rng: &mut R, group_by_name: bool) {
        info!("Rolling initiative for {}", self.name);
        self.combatants = if group_by_name {
            roll_all_initiative_grouped(rng, &self.combatants)
        } else {
            roll_all_initiative(rng, &self.combatants)
        };
        self.sort_by_initiative();
    }

    pub fn sort_by_initiative(&mut self) {
        self.combatants = sort_by_initiative(&self.combatants);
        self.turn.current_turn = 0;
    }

    pub fn set_initiative(&mut self, id: Uuid, initiative: i32) {
        if let Some(combatant) = self.combatant_mut(id) {
            combatant.initiative = initiative;
        }
    }

    pub fn damage(&mut self, id: Uuid, amount: u32) {
        if let Some(combatant) = self.combatant_mut(id) {
            combatant.damage(amount);
        }
    }

    pub fn heal(&mut self, id: Uuid, amount: u32) {
        if let Some(combatant) = self.combatant_mut(id) {
            combatant.heal(amount);
        }
    }

    pub fn add_condition(&mut self, id: Uuid, condition: Condition) {
        if let Some(combatant) = self.combatant_mut(id) {
            combatant.add_condition(condition);
        }
    }

    pub fn remove_condition(&mut self, id: Uuid, target: &ConditionTarget) -> Option<Condition> {
        self.combatant_mut(id)?.remove_condition(target)
    }

    /// Counts every timed condition down by one round.
    pub fn tick_conditions(&mut self) {
        for combatant in self.combatants.iter_mut() {
            combatant.tick_conditions();
        }
    }

    pub fn difficulty_summary(&self) -> DifficultySummary {
        calculate_difficulty(self)
    }

    /// A copy with new encounter and combatant ids.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        for combatant in copy.combatants.iter_mut() {
            combatant.id = Uuid::new_v4();
        }
        copy
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Snapshot of an encounter as written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEncounter {
    pub encounter: Encounter,
    /// Unix seconds.
    pub saved_at: u64,
}

impl SavedEncounter {
    pub fn new(encounter: &Encounter) -> Self {
        Self {
            encounter: encounter.clone(),
            saved_at: unix_now(),
        }
    }

    /// Rebuilds a live encounter from the snapshot. Ids are never reused.
    pub fn restore(&self) -> Encounter {
        self.encounter.duplicate()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::combat::combatant::MonsterStats;

    fn monster(name: &str, xp: u32) -> Combatant {
        let stats = MonsterStats {
            cr: "1".to_string(),
            cr_value: 1.0,
            creature_type: "humanoid".to_string(),
            environment: vec![],
            xp,
        };
        Combatant::monster(name, stats, 20, 12)
    }

    fn three_way() -> (Encounter, Vec<Uuid>) {
        let mut encounter = Encounter::new("Crypt", 4, 3);
        let combatants = vec![
            Combatant::player("Arthas", 3, 30, 18),
            monster("Ghoul", 200),
            monster("Zombie", 50),
        ];
        let ids = combatants.iter().map(|c| c.id).collect();
        for c in combatants {
            encounter.add_combatant(c);
        }
        (encounter, ids)
    }

    #[test]
    fn test_new_encounter_defaults() {
        let encounter = Encounter::new("Crypt", 4, 3);
        assert_eq!(encounter.round(), 1);
        assert_eq!(encounter.current_turn(), 0);
        assert_eq!(encounter.xp_budget, 600);
        assert!(encounter.current_combatant().is_none());
    }

    #[test]
    fn test_used_xp_tracks_add_and_remove() {
        let (mut encounter, ids) = three_way();
        assert_eq!(encounter.used_xp, 250);
        encounter.remove_combatant(ids[1]);
        assert_eq!(encounter.used_xp, 50);
        encounter.remove_combatant(ids[0]);
        assert_eq!(encounter.used_xp, 50);
    }

    #[test]
    fn test_add_combatant_assigns_ordinals() {
        let mut encounter = Encounter::new("Camp", 4, 1);
        encounter.add_combatant(monster("Goblin", 50));
        assert_eq!(encounter.combatants[0].ordinal, 0);
        encounter.add_combatant(monster("Goblin", 50));
        assert_eq!(encounter.combatants[0].ordinal, 1);
        assert_eq!(encounter.combatants[1].ordinal, 2);
        encounter.add_combatant(monster("Goblin", 50));
        assert_eq!(encounter.combatants[2].display_name(), "Goblin (3)");
    }

    #[test]
    fn test_ordinals_stay_unique_after_removal() {
        let mut encounter = Encounter::new("Camp", 4, 1);
        encounter.add_combatant(monster("Goblin", 50));
        encounter.add_combatant(monster("Goblin", 50));
        let first = encounter.combatants[0].id;
        encounter.remove_combatant(first);
        encounter.add_combatant(monster("Goblin", 50));

        let names: Vec<String> = encounter.combatants.iter().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["Goblin (2)", "Goblin (3)"]);
    }

    #[test]
    fn test_removing_active_last_combatant_clamps() {
        let (mut encounter, ids) = three_way();
        encounter.turn.current_turn = 2;
        encounter.remove_combatant(ids[2]);
        assert!(encounter.current_turn() < encounter.combatants.len());
        assert_eq!(encounter.current_combatant().map(|c| c.id), Some(ids[0]));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (mut encounter, _) = three_way();
        let before = encounter.clone();
        assert!(encounter.remove_combatant(Uuid::new_v4()).is_none());
        assert_eq!(encounter, before);
    }

    #[test]
    fn test_roll_initiative_sorts_and_resets_pointer() {
        let (mut encounter, _) = three_way();
        encounter.turn.current_turn = 2;
        let mut rng = StdRng::seed_from_u64(42);
        encounter.roll_initiative(&mut rng, false);
        assert_eq!(encounter.current_turn(), 0);
        assert!(encounter
            .combatants
            .windows(2)
            .all(|w| w[0].initiative >= w[1].initiative));
    }

    #[test]
    fn test_reset_restores_everything() {
        let (mut encounter, ids) = three_way();
        let mut rng = StdRng::seed_from_u64(3);
        encounter.roll_initiative(&mut rng, false);
        encounter.next_turn();
        encounter.next_round();
        encounter.damage(ids[1], 15);
        encounter.add_condition(ids[1], Condition::new("Prone"));
        encounter.reset();
        assert_eq!(encounter.round(), 1);
        assert_eq!(encounter.current_turn(), 0);
        assert!(encounter
            .combatants
            .iter()
            .all(|c| c.initiative == 0 && c.conditions.is_empty() && c.hp == c.max_hp));
    }

    #[test]
    fn test_empty_encounter_turns_are_noops() {
        let mut encounter = Encounter::new("Empty", 4, 1);
        encounter.next_turn();
        encounter.previous_turn();
        assert_eq!(encounter.round(), 1);
        assert_eq!(encounter.current_turn(), 0);
    }

    #[test]
    fn test_saved_encounter_restore_uses_fresh_ids() {
        let (encounter, ids) = three_way();
        let saved = SavedEncounter::new(&encounter);
        let restored = saved.restore();
        assert_ne!(restored.id, encounter.id);
        assert!(restored.combatants.iter().all(|c| !ids.contains(&c.id)));
        assert_eq!(restored.combatants.len(), 3);
        assert_eq!(restored.used_xp, encounter.used_xp);
    }

    #[test]
    fn test_json_round_trip_keeps_turn_fields_flat() {
        let (mut encounter, _) = three_way();
        encounter.next_turn();
        let json = serde_json::to_value(&encounter).unwrap();
        assert_eq!(json["round"], 1);
        assert_eq!(json["current_turn"], 1);
        let back: Encounter = serde_json::from_value(json).unwrap();
        assert_eq!(back, encounter);
    }
}
