use encounter_core::{
    dto::EncounterView,
    import::encounter_from_yaml,
    persist::{load_store, save_store, MemoryStorage},
    reminders::{AbilityTable, AbilityType},
    Action, Combatant, Condition, ConditionTarget, CrXpTable, Difficulty, EncounterStore,
};

const LAIR_FIGHT: &str = "
name: Red Dragon Lair
party_level: 10
players:
  - name: Arthas
    level: 10
    initiative_modifier: 3
    ac: 20
    max_hp: 95
  - name: Jaina
    level: 10
    ac: 13
    max_hp: 62
  - name: Thrall
    level: 10
    ac: 18
    max_hp: 104
  - name: Sylvanas
    level: 10
    ac: 16
    max_hp: 78
monsters:
  - stats:
      name: Adult Red Dragon
      cr: '17'
      type: dragon
      ac: 19
      max_hp: 256
";

fn imported_store() -> (EncounterStore, uuid::Uuid) {
    let encounter = encounter_from_yaml(LAIR_FIGHT, &CrXpTable::standard()).unwrap();
    let store = EncounterStore::new()
        .with_seed(7)
        .reduce(Action::ImportEncounter(encounter));
    let id = store.active_id().unwrap();
    (store, id)
}

#[test]
fn imported_dragon_is_deadly() {
    let (store, id) = imported_store();
    let summary = store.difficulty(id).unwrap();
    assert_eq!(summary.xp, 18000);
    assert_eq!(summary.party_threshold.deadly, 11200);
    assert_eq!(summary.difficulty, Difficulty::Deadly);
}

#[test]
fn full_round_with_damage_and_removal() {
    let (store, id) = imported_store();
    let store = store.reduce(Action::RollInitiative {
        encounter: id,
        group_by_name: false,
    });
    let encounter = store.encounter(id).unwrap();
    assert!(encounter
        .combatants
        .windows(2)
        .all(|w| w[0].initiative >= w[1].initiative));

    let dragon = encounter
        .combatants
        .iter()
        .find(|c| !c.is_pc())
        .map(|c| c.id)
        .unwrap();

    let mut store = store
        .reduce(Action::Damage {
            encounter: id,
            combatant: dragon,
            amount: 300,
        })
        .reduce(Action::AddCondition {
            encounter: id,
            combatant: dragon,
            condition: Condition::new("Prone"),
        });
    for _ in 0..5 {
        store = store.reduce(Action::NextTurn(id));
    }
    let encounter = store.encounter(id).unwrap();
    assert_eq!(encounter.round(), 2);
    assert_eq!(encounter.current_turn(), 0);
    assert_eq!(encounter.combatant(dragon).unwrap().hp, 0);

    let store = store
        .reduce(Action::RemoveCondition {
            encounter: id,
            combatant: dragon,
            target: ConditionTarget::Index(0),
        })
        .reduce(Action::RemoveCombatant {
            encounter: id,
            combatant: dragon,
        });
    let encounter = store.encounter(id).unwrap();
    assert_eq!(encounter.combatants.len(), 4);
    assert_eq!(encounter.used_xp, 0);
    assert_eq!(store.difficulty(id).unwrap().difficulty, Difficulty::Trivial);
}

#[test]
fn reminders_follow_the_turn() {
    let (store, id) = imported_store();
    let dragon_id = store
        .encounter(id)
        .unwrap()
        .combatants
        .iter()
        .find(|c| c.name == "Adult Red Dragon")
        .map(|c| c.id)
        .unwrap();

    // make the dragon act first, then a player
    let combatants = store.encounter(id).unwrap().combatants.clone();
    let mut store = store;
    for (i, c) in combatants.iter().enumerate() {
        store = store.reduce(Action::SetInitiative {
            encounter: id,
            combatant: c.id,
            initiative: if c.id == dragon_id { 25 } else { 10 - i as i32 },
        });
    }
    let store = store.reduce(Action::SortByInitiative(id));
    let table = AbilityTable::builtin().unwrap();

    let encounter = store.encounter(id).unwrap();
    let reminders = table.reminders_for(encounter, 0);
    assert!(reminders
        .iter()
        .all(|r| r.ability.ability_type == AbilityType::LairActions));

    let store = store.reduce(Action::NextTurn(id));
    let encounter = store.encounter(id).unwrap();
    let reminders = table.reminders_for(encounter, 0);
    assert!(!reminders.is_empty());
    assert!(reminders
        .iter()
        .all(|r| r.ability.ability_type == AbilityType::LegendaryActions));
}

#[test]
fn reset_and_persist_round_trip() {
    let (store, id) = imported_store();
    let player = Combatant::player("Guest", 10, 50, 14);
    let store = store
        .reduce(Action::AddCombatant {
            encounter: id,
            combatant: player,
        })
        .reduce(Action::RollInitiative {
            encounter: id,
            group_by_name: true,
        })
        .reduce(Action::NextRound(id))
        .reduce(Action::ResetEncounter(id));

    let view = EncounterView::from(store.encounter(id).unwrap());
    assert_eq!(view.round, 1);
    assert!(view.combatants.iter().all(|c| c.initiative == 0));

    let mut storage = MemoryStorage::default();
    save_store(&mut storage, &store).unwrap();
    let loaded = load_store(&storage).unwrap().unwrap();
    assert_eq!(loaded.encounters(), store.encounters());
}
