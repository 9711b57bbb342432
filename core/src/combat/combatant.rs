use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::condition::{Condition, ConditionTarget};
use crate::creature::{CrXpTable, Creature};

/// Classification data for a monster or NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterStats {
    pub cr: String,
    pub cr_value: f32,
    #[serde(rename = "type", default)]
    pub creature_type: String,
    #[serde(default)]
    pub environment: Vec<String>,
    pub xp: u32,
}

/// Player characters carry a level, everything else carries monster stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatantKind {
    Player { level: u8 },
    Monster(MonsterStats),
}

/// Coarse health bucket shown next to a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HpStatus {
    Healthy,
    Wounded,
    Bloodied,
    Critical,
    Unconscious,
}

impl HpStatus {
    /// `>= 75%` healthy, `>= 50%` wounded, `>= 25%` bloodied, above zero
    /// critical.
    pub fn from_hp(hp: u32, max_hp: u32) -> Self {
        let (hp, max_hp) = (u64::from(hp), u64::from(max_hp));
        if hp == 0 {
            HpStatus::Unconscious
        } else if hp * 4 >= max_hp * 3 {
            HpStatus::Healthy
        } else if hp * 2 >= max_hp {
            HpStatus::Wounded
        } else if hp * 4 >= max_hp {
            HpStatus::Bloodied
        } else {
            HpStatus::Critical
        }
    }
}

impl fmt::Display for HpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Distinguishes several combatants sharing a name; 0 when unique.
    #[serde(default)]
    pub ordinal: u32,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    #[serde(default)]
    pub temp_hp: u32,
    pub ac: i32,
    #[serde(default)]
    pub initiative: i32,
    /// Overrides the derived initiative modifier when set.
    #[serde(default)]
    pub initiative_modifier: Option<i32>,
    /// Carried for a future dexterity tiebreak; sorting ignores it.
    #[serde(default)]
    pub tiebreaker: Option<i32>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub kind: CombatantKind,
}

impl Combatant {
    pub fn new(name: &str, kind: CombatantKind, max_hp: u32, ac: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            ordinal: 0,
            name: name.to_string(),
            hp: max_hp,
            max_hp,
            temp_hp: 0,
            ac,
            initiative: 0,
            initiative_modifier: None,
            tiebreaker: None,
            conditions: Vec::new(),
            kind,
        }
    }

    pub fn player(name: &str, level: u8, max_hp: u32, ac: i32) -> Self {
        Self::new(name, CombatantKind::Player { level }, max_hp, ac)
    }

    pub fn monster(name: &str, stats: MonsterStats, max_hp: u32, ac: i32) -> Self {
        Self::new(name, CombatantKind::Monster(stats), max_hp, ac)
    }

    /// Converts a builder creature into a fresh combatant: new id, zero
    /// initiative, no conditions, full hit points.
    pub fn from_creature(creature: &Creature, table: &CrXpTable) -> Self {
        let stats = MonsterStats {
            cr: creature.cr.clone(),
            cr_value: creature.cr_value(),
            creature_type: creature.creature_type.clone(),
            environment: creature.environment.clone(),
            xp: creature.resolved_xp(table),
        };
        Self::monster(&creature.name, stats, creature.hp, creature.ac)
    }

    pub fn is_pc(&self) -> bool {
        matches!(self.kind, CombatantKind::Player { .. })
    }

    pub fn level(&self) -> Option<u8> {
        match self.kind {
            CombatantKind::Player { level } => Some(level),
            CombatantKind::Monster(_) => None,
        }
    }

    pub fn monster_stats(&self) -> Option<&MonsterStats> {
        match &self.kind {
            CombatantKind::Monster(stats) => Some(stats),
            CombatantKind::Player { .. } => None,
        }
    }

    /// Experience value; player characters are worth nothing.
    pub fn xp(&self) -> u32 {
        self.monster_stats().map_or(0, |stats| stats.xp)
    }

    pub fn display_name(&self) -> String {
        if self.ordinal != 0 {
            format!("{} ({})", self.name, self.ordinal)
        } else {
            self.name.clone()
        }
    }

    /// Temporary hit points soak damage first.
    pub fn damage(&mut self, amount: u32) {
        let absorbed = self.temp_hp.min(amount);
        self.temp_hp -= absorbed;
        self.hp = self.hp.saturating_sub(amount - absorbed);
        debug!(
            "{} took {} damage ({} absorbed), now {}/{}",
            self.display_name(),
            amount,
            absorbed,
            self.hp,
            self.max_hp
        );
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    pub fn set_max_hp(&mut self, max_hp: u32) {
        self.max_hp = max_hp;
        self.hp = self.hp.min(max_hp);
    }

    pub fn set_temp_hp(&mut self, temp_hp: u32) {
        self.temp_hp = temp_hp;
    }

    /// Re-establishes `hp <= max_hp` on records that came from outside.
    pub fn normalize(&mut self) {
        self.hp = self.hp.min(self.max_hp);
    }

    pub fn add_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Removes the condition at the given index or the first one with the
    /// given name.
    pub fn remove_condition(&mut self, target: &ConditionTarget) -> Option<Condition> {
        let index = match target {
            ConditionTarget::Index(index) => Some(*index).filter(|i| *i < self.conditions.len()),
            ConditionTarget::Name(name) => self.conditions.iter().position(|c| &c.name == name),
        }?;
        Some(self.conditions.remove(index))
    }

    pub fn tick_conditions(&mut self) {
        self.conditions.retain_mut(Condition::tick);
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_status(&self) -> HpStatus {
        HpStatus::from_hp(self.hp, self.max_hp)
    }

    /// Back to full health with no conditions and no initiative.
    pub fn reset(&mut self) {
        self.hp = self.max_hp;
        self.initiative = 0;
        self.conditions.clear();
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn goblin() -> Combatant {
        let stats = MonsterStats {
            cr: "1/4".to_string(),
            cr_value: 0.25,
            creature_type: "humanoid".to_string(),
            environment: vec!["forest".to_string()],
            xp: 50,
        };
        Combatant::monster("Goblin", stats, 10, 15)
    }

    #[test]
    fn test_damage_consumes_temp_hp_first() {
        let mut c = goblin();
        c.temp_hp = 5;
        c.damage(8);
        assert_eq!(c.temp_hp, 0);
        assert_eq!(c.hp, 7);
    }

    #[test]
    fn test_damage_fully_absorbed() {
        let mut c = goblin();
        c.temp_hp = 5;
        c.damage(3);
        assert_eq!(c.temp_hp, 2);
        assert_eq!(c.hp, 10);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut c = goblin();
        c.damage(100);
        assert_eq!(c.hp, 0);
        assert!(!c.is_alive());
    }

    #[test]
    fn test_heal_is_capped() {
        let mut c = goblin();
        c.hp = 5;
        c.temp_hp = 3;
        c.heal(100);
        assert_eq!(c.hp, 10);
        assert_eq!(c.temp_hp, 3);
    }

    #[test]
    fn test_set_max_hp_reclamps_hp() {
        let mut c = goblin();
        c.set_max_hp(4);
        assert_eq!(c.hp, 4);
        c.set_hp(9);
        assert_eq!(c.hp, 4);
        c.set_max_hp(20);
        assert_eq!(c.hp, 4);
    }

    #[test]
    fn test_condition_round_trip_by_index() {
        let mut c = goblin();
        c.add_condition(Condition::new("Prone"));
        let before = c.conditions.clone();
        c.add_condition(Condition::with_duration("Poisoned", 2));
        let removed = c.remove_condition(&ConditionTarget::Index(1));
        assert_eq!(removed.map(|c| c.name), Some("Poisoned".to_string()));
        assert_eq!(c.conditions, before);
    }

    #[test]
    fn test_duplicate_conditions_are_kept() {
        let mut c = goblin();
        c.add_condition(Condition::new("Prone"));
        c.add_condition(Condition::new("Prone"));
        assert_eq!(c.conditions.len(), 2);
        c.remove_condition(&ConditionTarget::Name("Prone".to_string()));
        assert_eq!(c.conditions.len(), 1);
    }

    #[test]
    fn test_remove_missing_condition_is_noop() {
        let mut c = goblin();
        c.add_condition(Condition::new("Prone"));
        assert!(c.remove_condition(&ConditionTarget::Index(3)).is_none());
        assert!(c
            .remove_condition(&ConditionTarget::Name("Stunned".to_string()))
            .is_none());
        assert_eq!(c.conditions.len(), 1);
    }

    #[test]
    fn test_tick_conditions_drops_expired() {
        let mut c = goblin();
        c.add_condition(Condition::with_duration("Frightened", 1));
        c.add_condition(Condition::new("Prone"));
        c.add_condition(Condition::with_duration("Poisoned", 2));
        c.tick_conditions();
        let names: Vec<_> = c.conditions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Prone", "Poisoned"]);
    }

    #[rstest]
    #[case(100, HpStatus::Healthy)]
    #[case(75, HpStatus::Healthy)]
    #[case(74, HpStatus::Wounded)]
    #[case(50, HpStatus::Wounded)]
    #[case(49, HpStatus::Bloodied)]
    #[case(25, HpStatus::Bloodied)]
    #[case(24, HpStatus::Critical)]
    #[case(1, HpStatus::Critical)]
    #[case(0, HpStatus::Unconscious)]
    fn test_hp_status_boundaries(#[case] hp: u32, #[case] expected: HpStatus) {
        assert_eq!(HpStatus::from_hp(hp, 100), expected);
    }

    #[test]
    fn test_xp_only_for_monsters() {
        assert_eq!(goblin().xp(), 50);
        assert_eq!(Combatant::player("Arthas", 3, 30, 18).xp(), 0);
        assert_eq!(Combatant::player("Arthas", 3, 30, 18).level(), Some(3));
    }

    #[test]
    fn test_from_creature() {
        let creature = Creature {
            name: "Ogre".to_string(),
            hp: 59,
            ac: 11,
            speed: Some("40 ft.".to_string()),
            creature_type: "giant".to_string(),
            cr: "2".to_string(),
            xp: None,
            environment: vec!["hill".to_string()],
            abilities: vec![],
        };
        let c = Combatant::from_creature(&creature, &CrXpTable::standard());
        assert_eq!(c.hp, 59);
        assert_eq!(c.max_hp, 59);
        assert_eq!(c.initiative, 0);
        assert!(c.conditions.is_empty());
        assert!(!c.is_pc());
        assert_eq!(c.xp(), 450);
        assert_eq!(c.monster_stats().map(|s| s.cr_value), Some(2.0));
    }

    proptest! {
        #[test]
        fn prop_hp_stays_in_bounds(
            max_hp in 0u32..500,
            temp in 0u32..100,
            ops in proptest::collection::vec((0u8..4, 0u32..600), 0..40),
        ) {
            let mut c = goblin();
            c.set_max_hp(max_hp);
            c.set_temp_hp(temp);
            for (op, amount) in ops {
                match op {
                    0 => c.damage(amount),
                    1 => c.heal(amount),
                    2 => c.set_hp(amount),
                    _ => c.set_max_hp(amount),
                }
                prop_assert!(c.hp <= c.max_hp);
            }
        }
    }
}
