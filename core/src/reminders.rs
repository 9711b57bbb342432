//! Advisory reminders for creatures with special abilities.
//!
//! Nothing here is enforced: the table only says what a DM should keep in
//! mind for the acting creature. Lookups are by exact creature name.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

use crate::{encounter::Encounter, import::ImportError};

const BUILTIN_ABILITIES: &str = include_str!("../data/creature_abilities.yaml");
pub const MAX_REMINDERS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityType {
    StartOfTurn,
    LegendaryActions,
    LairActions,
    CombatAbility,
    Resistance,
    Concentration,
}

impl AbilityType {
    fn on_own_turn(self) -> bool {
        matches!(
            self,
            AbilityType::StartOfTurn
                | AbilityType::CombatAbility
                | AbilityType::Resistance
                | AbilityType::Concentration
        )
    }
}

/// Sorts critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureAbility {
    pub name: String,
    #[serde(rename = "type")]
    pub ability_type: AbilityType,
    pub priority: Priority,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub name: String,
    pub abilities: Vec<CreatureAbility>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub creature: String,
    pub ability: CreatureAbility,
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - {}",
            self.creature, self.ability.name, self.ability.description
        )
    }
}

fn select(
    template: &CreatureTemplate,
    keep: impl Fn(AbilityType) -> bool,
) -> Vec<&CreatureAbility> {
    template
        .abilities
        .iter()
        .filter(|ability| keep(ability.ability_type))
        .collect()
}

/// Creature name to template.
#[derive(Debug, Clone, Default)]
pub struct AbilityTable {
    templates: HashMap<String, CreatureTemplate>,
}

impl AbilityTable {
    pub fn builtin() -> Result<Self, ImportError> {
        Self::from_yaml_str(BUILTIN_ABILITIES)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ImportError> {
        let templates: Vec<CreatureTemplate> = serde_yml::from_str(yaml)?;
        let mut table = Self::default();
        for template in templates {
            table.insert(template);
        }
        Ok(table)
    }

    pub fn insert(&mut self, template: CreatureTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    pub fn get(&self, name: &str) -> Option<&CreatureTemplate> {
        self.templates.get(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Reminders for the combatant at `index`.
    ///
    /// "Top of round" means the acting combatant holds the highest
    /// initiative in the encounter, which stands in for initiative count 20.
    /// At the top of the round a creature with lair actions only shows
    /// those. Otherwise the acting creature sees its own-turn abilities and
    /// everyone else sees their legendary actions.
    pub fn reminders_for(&self, encounter: &Encounter, index: usize) -> Vec<Reminder> {
        let Some(combatant) = encounter.combatants.get(index) else {
            return Vec::new();
        };
        let Some(template) = self.get(&combatant.name) else {
            return Vec::new();
        };

        let max_initiative = encounter.combatants.iter().map(|c| c.initiative).max();
        let top_of_round = encounter
            .current_combatant()
            .is_some_and(|current| Some(current.initiative) == max_initiative);
        let is_own_turn = index == encounter.current_turn();

        let lair = select(template, |t| t == AbilityType::LairActions);
        let mut chosen = if top_of_round && !lair.is_empty() {
            lair
        } else if is_own_turn {
            select(template, AbilityType::on_own_turn)
        } else if !top_of_round {
            select(template, |t| t == AbilityType::LegendaryActions)
        } else {
            Vec::new()
        };

        chosen.sort_by_key(|ability| ability.priority);
        chosen
            .into_iter()
            .take(MAX_REMINDERS)
            .map(|ability| Reminder {
                creature: combatant.display_name(),
                ability: ability.clone(),
            })
            .collect()
    }

    /// Reminders for every combatant, in initiative order.
    pub fn all_reminders(&self, encounter: &Encounter) -> Vec<Reminder> {
        (0..encounter.combatants.len())
            .flat_map(|index| self.reminders_for(encounter, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::{Combatant, MonsterStats};

    fn creature(name: &str, initiative: i32) -> Combatant {
        let stats = MonsterStats {
            cr: "10".to_string(),
            cr_value: 10.0,
            creature_type: "dragon".to_string(),
            environment: vec![],
            xp: 5900,
        };
        let mut c = Combatant::monster(name, stats, 100, 18);
        c.initiative = initiative;
        c
    }

    fn encounter(combatants: Vec<Combatant>, current_turn: usize) -> Encounter {
        let mut encounter = Encounter::new("Lair", 4, 10);
        for c in combatants {
            encounter.add_combatant(c);
        }
        encounter.turn.current_turn = current_turn;
        encounter
    }

    fn types(reminders: &[Reminder]) -> Vec<AbilityType> {
        reminders.iter().map(|r| r.ability.ability_type).collect()
    }

    #[test]
    fn test_builtin_table_loads() {
        let table = AbilityTable::builtin().unwrap();
        assert!(table.get("Troll").is_some());
        assert!(table.get("troll").is_none());
    }

    #[test]
    fn test_unknown_creature_has_no_reminders() {
        let table = AbilityTable::builtin().unwrap();
        let e = encounter(vec![creature("Goblin", 12)], 0);
        assert!(table.reminders_for(&e, 0).is_empty());
        assert!(table.reminders_for(&e, 5).is_empty());
    }

    #[test]
    fn test_top_of_round_shows_only_lair_actions() {
        let table = AbilityTable::builtin().unwrap();
        let e = encounter(
            vec![creature("Adult Red Dragon", 18), creature("Goblin", 9)],
            0,
        );
        let reminders = table.reminders_for(&e, 0);
        assert_eq!(types(&reminders), vec![AbilityType::LairActions]);
    }

    #[test]
    fn test_lair_trigger_uses_max_initiative_not_twenty() {
        let table = AbilityTable::builtin().unwrap();
        let mut player = Combatant::player("Arthas", 5, 40, 18);
        player.initiative = 20;
        let e = encounter(vec![creature("Goblin", 25), player, creature("Lich", 3)], 1);
        let reminders = table.reminders_for(&e, 2);
        assert_eq!(types(&reminders), vec![AbilityType::LegendaryActions]);
    }

    #[test]
    fn test_own_turn_abilities_sorted_by_priority() {
        let table = AbilityTable::builtin().unwrap();
        let e = encounter(
            vec![creature("Goblin", 20), creature("Adult Red Dragon", 15)],
            1,
        );
        let reminders = table.reminders_for(&e, 1);
        assert_eq!(
            types(&reminders),
            vec![
                AbilityType::StartOfTurn,
                AbilityType::Resistance,
                AbilityType::CombatAbility
            ]
        );
        assert!(reminders
            .windows(2)
            .all(|w| w[0].ability.priority <= w[1].ability.priority));
    }

    #[test]
    fn test_legendary_actions_off_turn() {
        let table = AbilityTable::builtin().unwrap();
        let e = encounter(
            vec![
                creature("Goblin", 20),
                creature("Vampire", 10),
                creature("Kobold", 5),
            ],
            2,
        );
        let reminders = table.reminders_for(&e, 1);
        assert_eq!(types(&reminders), vec![AbilityType::LegendaryActions]);
    }

    #[test]
    fn test_no_legendary_actions_at_top_of_round() {
        let table = AbilityTable::builtin().unwrap();
        let e = encounter(vec![creature("Goblin", 20), creature("Vampire", 10)], 0);
        assert!(table.reminders_for(&e, 1).is_empty());
    }

    #[test]
    fn test_troll_regenerates_on_its_turn() {
        let table = AbilityTable::builtin().unwrap();
        let e = encounter(vec![creature("Troll", 10)], 0);
        let reminders = table.reminders_for(&e, 0);
        assert_eq!(reminders[0].ability.name, "Regeneration");
        assert_eq!(reminders[0].to_string().split(':').next(), Some("Troll"));
    }

    #[test]
    fn test_truncated_to_eight() {
        let abilities = (0..12)
            .map(|i| CreatureAbility {
                name: format!("Trick {i}"),
                ability_type: AbilityType::CombatAbility,
                priority: if i % 2 == 0 {
                    Priority::Low
                } else {
                    Priority::Critical
                },
                description: String::new(),
            })
            .collect();
        let mut table = AbilityTable::default();
        table.insert(CreatureTemplate {
            name: "Trickster".to_string(),
            abilities,
        });
        let e = encounter(vec![creature("Trickster", 10)], 0);
        let reminders = table.reminders_for(&e, 0);
        assert_eq!(reminders.len(), MAX_REMINDERS);
        assert!(reminders[..6]
            .iter()
            .all(|r| r.ability.priority == Priority::Critical));
    }

    #[test]
    fn test_custom_table_from_yaml() {
        let yaml = "
- name: Hydra
  abilities:
    - name: Multiple Heads
      type: start_of_turn
      priority: critical
      description: Regrow two heads for each head lost since its last turn.
";
        let table = AbilityTable::from_yaml_str(yaml).unwrap();
        assert_eq!(table.len(), 1);
        let e = encounter(vec![creature("Hydra", 10)], 0);
        assert_eq!(table.all_reminders(&e).len(), 1);
    }
}
