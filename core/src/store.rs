//! The encounter store: every encounter, saved snapshot and the builder
//! state, changed only by reducing [`Action`]s.

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    builder::{BuilderFilters, BuilderState},
    combat::{
        combatant::Combatant,
        condition::{Condition, ConditionTarget},
    },
    creature::{CrXpTable, Creature},
    difficulty::{DifficultySummary, Tier},
    encounter::{Encounter, SavedEncounter},
};

/// Everything the UI can ask the store to do. Actions naming an encounter
/// or combatant that does not exist leave the state untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    CreateEncounter {
        name: String,
        party_size: u32,
        party_level: u8,
    },
    ImportEncounter(Encounter),
    DeleteEncounter(Uuid),
    SelectEncounter(Uuid),
    RenameEncounter {
        encounter: Uuid,
        name: String,
    },
    SetNotes {
        encounter: Uuid,
        notes: String,
    },
    SetParty {
        encounter: Uuid,
        party_size: u32,
        party_level: u8,
    },
    SetTargetDifficulty {
        encounter: Uuid,
        tier: Tier,
    },
    AddCombatant {
        encounter: Uuid,
        combatant: Combatant,
    },
    AddCreature {
        encounter: Uuid,
        creature: Creature,
        count: usize,
    },
    RemoveCombatant {
        encounter: Uuid,
        combatant: Uuid,
    },
    RollInitiative {
        encounter: Uuid,
        group_by_name: bool,
    },
    SortByInitiative(Uuid),
    SetInitiative {
        encounter: Uuid,
        combatant: Uuid,
        initiative: i32,
    },
    NextTurn(Uuid),
    PreviousTurn(Uuid),
    NextRound(Uuid),
    ResetEncounter(Uuid),
    Damage {
        encounter: Uuid,
        combatant: Uuid,
        amount: u32,
    },
    Heal {
        encounter: Uuid,
        combatant: Uuid,
        amount: u32,
    },
    SetHp {
        encounter: Uuid,
        combatant: Uuid,
        hp: u32,
    },
    SetMaxHp {
        encounter: Uuid,
        combatant: Uuid,
        max_hp: u32,
    },
    SetTempHp {
        encounter: Uuid,
        combatant: Uuid,
        temp_hp: u32,
    },
    SetAc {
        encounter: Uuid,
        combatant: Uuid,
        ac: i32,
    },
    AddCondition {
        encounter: Uuid,
        combatant: Uuid,
        condition: Condition,
    },
    RemoveCondition {
        encounter: Uuid,
        combatant: Uuid,
        target: ConditionTarget,
    },
    TickConditions(Uuid),
    SaveSnapshot(Uuid),
    LoadSnapshot(usize),
    DeleteSnapshot(usize),
    SetFilters {
        filters: BuilderFilters,
        catalog: Vec<Creature>,
    },
}

#[derive(Debug, Clone)]
pub struct EncounterStore {
    encounters: Vec<Encounter>,
    active: Option<Uuid>,
    saved: Vec<SavedEncounter>,
    builder: BuilderState,
    cr_table: CrXpTable,
    rng: StdRng,
}

impl Default for EncounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EncounterStore {
    pub fn new() -> Self {
        Self {
            encounters: Vec::new(),
            active: None,
            saved: Vec::new(),
            builder: BuilderState::default(),
            cr_table: CrXpTable::standard(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic dice, for tests and replays.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_cr_table(mut self, cr_table: CrXpTable) -> Self {
        self.cr_table = cr_table;
        self
    }

    pub fn from_parts(
        encounters: Vec<Encounter>,
        active: Option<Uuid>,
        saved: Vec<SavedEncounter>,
        builder: BuilderState,
    ) -> Self {
        let active = active
            .filter(|id| encounters.iter().any(|e| e.id == *id))
            .or_else(|| encounters.first().map(|e| e.id));
        Self {
            encounters,
            active,
            saved,
            builder,
            ..Self::new()
        }
    }

    pub fn encounters(&self) -> &[Encounter] {
        &self.encounters
    }

    pub fn encounter(&self, id: Uuid) -> Option<&Encounter> {
        self.encounters.iter().find(|e| e.id == id)
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active
    }

    pub fn active_encounter(&self) -> Option<&Encounter> {
        self.active.and_then(|id| self.encounter(id))
    }

    pub fn current_combatant(&self, encounter: Uuid) -> Option<&Combatant> {
        self.encounter(encounter)?.current_combatant()
    }

    pub fn difficulty(&self, encounter: Uuid) -> Option<DifficultySummary> {
        self.encounter(encounter).map(Encounter::difficulty_summary)
    }

    pub fn saved(&self) -> &[SavedEncounter] {
        &self.saved
    }

    pub fn builder(&self) -> &BuilderState {
        &self.builder
    }

    pub fn cr_table(&self) -> &CrXpTable {
        &self.cr_table
    }

    fn encounter_mut(&mut self, id: Uuid) -> Option<&mut Encounter> {
        self.encounters.iter_mut().find(|e| e.id == id)
    }

    fn with_combatant(&mut self, encounter: Uuid, combatant: Uuid, f: impl FnOnce(&mut Combatant)) {
        if let Some(c) = self
            .encounter_mut(encounter)
            .and_then(|e| e.combatant_mut(combatant))
        {
            f(c);
        }
    }

    fn insert_encounter(&mut self, encounter: Encounter) {
        info!("Adding encounter {} ({})", encounter.name, encounter.id);
        self.active = Some(encounter.id);
        self.encounters.push(encounter);
    }

    /// Applies `action` and returns the resulting store.
    pub fn reduce(mut self, action: Action) -> Self {
        self.apply(action);
        self
    }

    /// Applies `action` in place.
    pub fn apply(&mut self, action: Action) {
        debug!("Reducing {:?}", action);
        match action {
            Action::CreateEncounter {
                name,
                party_size,
                party_level,
            } => {
                self.insert_encounter(Encounter::new(&name, party_size, party_level));
            }
            Action::ImportEncounter(encounter) => {
                let encounter = if self.encounter(encounter.id).is_some() {
                    encounter.duplicate()
                } else {
                    encounter
                };
                self.insert_encounter(encounter);
            }
            Action::DeleteEncounter(id) => {
                if self.encounter(id).is_some() {
                    info!("Deleting encounter {}", id);
                    self.encounters.retain(|e| e.id != id);
                    if self.active == Some(id) {
                        self.active = self.encounters.first().map(|e| e.id);
                    }
                }
            }
            Action::SelectEncounter(id) => {
                if self.encounter(id).is_some() {
                    self.active = Some(id);
                }
            }
            Action::RenameEncounter { encounter, name } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.name = name;
                }
            }
            Action::SetNotes { encounter, notes } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.notes = notes;
                }
            }
            Action::SetParty {
                encounter,
                party_size,
                party_level,
            } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.set_party(party_size, party_level);
                }
            }
            Action::SetTargetDifficulty { encounter, tier } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.set_target_difficulty(tier);
                }
            }
            Action::AddCombatant {
                encounter,
                combatant,
            } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.add_combatant(combatant);
                }
            }
            Action::AddCreature {
                encounter,
                creature,
                count,
            } => {
                let table = self.cr_table.clone();
                if let Some(e) = self.encounter_mut(encounter) {
                    for _ in 0..count {
                        e.add_combatant(Combatant::from_creature(&creature, &table));
                    }
                }
            }
            Action::RemoveCombatant {
                encounter,
                combatant,
            } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.remove_combatant(combatant);
                }
            }
            Action::RollInitiative {
                encounter,
                group_by_name,
            } => {
                if let Some(e) = self.encounters.iter_mut().find(|e| e.id == encounter) {
                    e.roll_initiative(&mut self.rng, group_by_name);
                }
            }
            Action::SortByInitiative(encounter) => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.sort_by_initiative();
                }
            }
            Action::SetInitiative {
                encounter,
                combatant,
                initiative,
            } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.set_initiative(combatant, initiative);
                }
            }
            Action::NextTurn(encounter) => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.next_turn();
                }
            }
            Action::PreviousTurn(encounter) => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.previous_turn();
                }
            }
            Action::NextRound(encounter) => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.next_round();
                }
            }
            Action::ResetEncounter(encounter) => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.reset();
                }
            }
            Action::Damage {
                encounter,
                combatant,
                amount,
            } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.damage(combatant, amount);
                }
            }
            Action::Heal {
                encounter,
                combatant,
                amount,
            } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.heal(combatant, amount);
                }
            }
            Action::SetHp {
                encounter,
                combatant,
                hp,
            } => self.with_combatant(encounter, combatant, |c| c.set_hp(hp)),
            Action::SetMaxHp {
                encounter,
                combatant,
                max_hp,
            } => self.with_combatant(encounter, combatant, |c| c.set_max_hp(max_hp)),
            Action::SetTempHp {
                encounter,
                combatant,
                temp_hp,
            } => self.with_combatant(encounter, combatant, |c| c.set_temp_hp(temp_hp)),
            Action::SetAc {
                encounter,
                combatant,
                ac,
            } => self.with_combatant(encounter, combatant, |c| c.ac = ac),
            Action::AddCondition {
                encounter,
                combatant,
                condition,
            } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.add_condition(combatant, condition);
                }
            }
            Action::RemoveCondition {
                encounter,
                combatant,
                target,
            } => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.remove_condition(combatant, &target);
                }
            }
            Action::TickConditions(encounter) => {
                if let Some(e) = self.encounter_mut(encounter) {
                    e.tick_conditions();
                }
            }
            Action::SaveSnapshot(encounter) => {
                if let Some(e) = self.encounter(encounter) {
                    info!("Saving snapshot of {}", e.name);
                    let snapshot = SavedEncounter::new(e);
                    self.saved.push(snapshot);
                }
            }
            Action::LoadSnapshot(index) => {
                if let Some(restored) = self.saved.get(index).map(SavedEncounter::restore) {
                    self.insert_encounter(restored);
                }
            }
            Action::DeleteSnapshot(index) => {
                if index < self.saved.len() {
                    self.saved.remove(index);
                }
            }
            Action::SetFilters { filters, catalog } => {
                self.builder.set_filters(filters, &catalog);
            }
        }
    }
}
