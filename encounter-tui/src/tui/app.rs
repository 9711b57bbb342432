use color_eyre::{eyre::Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use encounter_core::{
    builder::BuilderFilters,
    persist::{save_store, FileStorage},
    reminders::AbilityTable,
    validation::{parse_amount, parse_score, ValidationError},
    Action, Creature, EncounterStore, StandardCondition, Tier,
};
use itertools::Itertools;
use log::{info, warn};
use ratatui::widgets::TableState;
use tui_textarea::{Input, Key, TextArea};
use uuid::Uuid;

use super::{
    input::{parse_condition, parse_condition_target, parse_creature_request, parse_party, parse_player},
    terminal,
    ui::{self, TableColors},
};

#[derive(Default)]
pub struct Popup<'t> {
    pub active: bool,
    pub prompt: String,
    pub input: TextArea<'t>,
    pub show_input: bool,
    pub confirm_action: Option<Box<dyn FnMut(&mut App<'t>, String) + Send>>,
    pub size: (u16, u16),
}

impl<'t> Popup<'t> {
    pub fn new() -> Self {
        let mut input = TextArea::default();
        input.set_alignment(ratatui::layout::Alignment::Center);
        Self {
            active: false,
            prompt: "".to_string(),
            input,
            show_input: false,
            confirm_action: None,
            size: (30, 20),
        }
    }

    pub fn show<F: FnMut(&mut App<'t>, String) + Send + 'static>(
        &mut self,
        prompt: &str,
        show_input: bool,
        size: (u16, u16),
        action: F,
    ) {
        // clear the input
        self.input.select_all();
        self.input.cut();

        self.active = true;
        self.prompt = prompt.to_string();
        self.show_input = show_input;
        self.confirm_action = Some(Box::new(action));
        self.size = size;
    }

    pub fn hide(&mut self) {
        self.active = false;
    }
}

type CombatantAmountAction = fn(Uuid, Uuid, u32) -> Action;

pub struct App<'t> {
    pub exit: bool,
    pub store: EncounterStore,
    pub storage: FileStorage,
    pub catalog: Vec<Creature>,
    pub abilities: AbilityTable,
    pub state: TableState,
    pub popup: Popup<'t>,
    pub colors: TableColors,
    /// Last validation or lookup message, cleared on the next key press.
    pub status: Option<String>,
    pub party_defaults: (u32, u8),
}

impl App<'_> {
    pub fn new(
        store: EncounterStore,
        storage: FileStorage,
        catalog: Vec<Creature>,
        abilities: AbilityTable,
        party_defaults: (u32, u8),
    ) -> Self {
        Self {
            exit: false,
            store,
            storage,
            catalog,
            abilities,
            state: TableState::default().with_selected(0),
            popup: Popup::new(),
            colors: TableColors::new(),
            status: None,
            party_defaults,
        }
    }

    /// runs the application's main loop until the user quits
    pub fn run(&mut self, terminal: &mut terminal::Tui) -> Result<EncounterStore> {
        while !self.exit {
            let mut drawn = Ok(());
            terminal.draw(|frame| drawn = ui::draw(frame, self))?;
            drawn.wrap_err("drawing ui failed")?;
            self.handle_events().wrap_err("handle events failed")?;
        }
        Ok(self.store.clone())
    }

    pub fn dispatch(&mut self, action: Action) {
        self.store.apply(action);
    }

    pub fn save(&mut self) -> Result<()> {
        save_store(&mut self.storage, &self.store).wrap_err_with(|| {
            format!("Failed to save state to '{}'.", self.storage.path().display())
        })
    }

    fn reject(&mut self, err: ValidationError) {
        warn!("Rejected input: {}", err);
        self.status = Some(err.to_string());
    }

    pub fn active(&self) -> Option<Uuid> {
        self.store.active_id()
    }

    pub fn selected_combatant(&self) -> Option<Uuid> {
        let encounter = self.store.active_encounter()?;
        let selected = self.state.selected()?;
        encounter.combatants.get(selected).map(|c| c.id)
    }

    fn on_active(&mut self, make: impl FnOnce(Uuid) -> Action) {
        if let Some(id) = self.active() {
            self.dispatch(make(id));
        }
    }

    /// updates the application's state based on user input
    fn handle_events(&mut self) -> Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                if self.popup.active {
                    self.handle_popup_key_event(key_event)
                        .wrap_err_with(|| format!("handling key event failed:\n{key_event:#?}"))
                } else {
                    self.handle_key_event(key_event)
                        .wrap_err_with(|| format!("handling key event failed:\n{key_event:#?}"))
                }
            }
            _ => Ok(()),
        }
    }

    fn handle_popup_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.into() {
            Input { key: Key::Esc, .. } => self.popup.hide(),
            Input {
                key: Key::Enter, ..
            } => {
                self.popup.hide();
                let input = self.popup.input.lines().join("");
                if let Some(mut action) = self.popup.confirm_action.take() {
                    action(self, input);
                }
            }
            input => {
                self.popup.input.input(input);
            }
        };
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        self.status = None;
        match key_event.into() {
            Input { key: Key::Esc, .. }
            | Input {
                key: Key::Char('q'),
                ctrl: true,
                ..
            } => self.confirm_close(),
            Input {
                key: Key::Char('r'),
                ctrl: true,
                ..
            } => self.on_active(|encounter| Action::RollInitiative {
                encounter,
                group_by_name: true,
            }),
            Input {
                key: Key::Char('c'),
                ctrl: true,
                ..
            } => self.confirm_reset(),
            Input {
                key: Key::Char('s'),
                ctrl: true,
                ..
            } => {
                self.save()?;
                self.status = Some(format!("Saved to {}", self.storage.path().display()));
            }
            Input {
                key: Key::Right, ..
            } => self.on_active(Action::NextTurn),
            Input { key: Key::Left, .. } => self.on_active(Action::PreviousTurn),
            Input { key: Key::Down, .. } => self.state.select_next(),
            Input { key: Key::Up, .. } => self.state.select_previous(),
            Input { key: Key::Tab, .. } => self.next_encounter(),
            Input {
                key: Key::Delete, ..
            } => self.confirm_remove(),
            Input {
                key: Key::Char(c),
                ctrl: false,
                ..
            } => self.handle_char(c),
            _ => {}
        }
        Ok(())
    }

    fn handle_char(&mut self, c: char) {
        match c {
            'd' => self.prompt_amount("Enter damage amount:", "damage", |encounter, combatant, amount| {
                Action::Damage {
                    encounter,
                    combatant,
                    amount,
                }
            }),
            'h' => self.prompt_amount("Enter heal amount:", "heal", |encounter, combatant, amount| {
                Action::Heal {
                    encounter,
                    combatant,
                    amount,
                }
            }),
            't' => self.prompt_amount(
                "Enter temporary hit points:",
                "temp hp",
                |encounter, combatant, temp_hp| Action::SetTempHp {
                    encounter,
                    combatant,
                    temp_hp,
                },
            ),
            'm' => self.prompt_amount(
                "Enter maximum hit points:",
                "max hp",
                |encounter, combatant, max_hp| Action::SetMaxHp {
                    encounter,
                    combatant,
                    max_hp,
                },
            ),
            'i' => self.set_initiative(),
            'c' => self.add_condition(),
            'x' => self.remove_condition(),
            'T' => self.on_active(Action::TickConditions),
            's' => self.on_active(Action::SortByInitiative),
            'n' => self.on_active(Action::NextRound),
            'a' => self.add_creature(),
            'p' => self.add_player(),
            'P' => self.set_party(),
            'g' => self.cycle_target_difficulty(),
            'e' => self.new_encounter(),
            'w' => self.on_active(Action::SaveSnapshot),
            'l' => self.load_latest_snapshot(),
            _ => {}
        }
    }

    fn prompt_amount(&mut self, prompt: &str, field: &'static str, make: CombatantAmountAction) {
        let (Some(encounter), Some(combatant)) = (self.active(), self.selected_combatant()) else {
            return;
        };
        self.popup
            .show(prompt, true, (30, 20), move |app, input| match parse_amount(field, &input) {
                Ok(amount) => app.dispatch(make(encounter, combatant, amount)),
                Err(err) => app.reject(err),
            });
    }

    fn set_initiative(&mut self) {
        let (Some(encounter), Some(combatant)) = (self.active(), self.selected_combatant()) else {
            return;
        };
        self.popup
            .show("Enter initiative:", true, (30, 20), move |app, input| {
                match parse_score("initiative", &input) {
                    Ok(initiative) => app.dispatch(Action::SetInitiative {
                        encounter,
                        combatant,
                        initiative,
                    }),
                    Err(err) => app.reject(err),
                }
            });
    }

    fn add_condition(&mut self) {
        let (Some(encounter), Some(combatant)) = (self.active(), self.selected_combatant()) else {
            return;
        };
        let prompt_text = StandardCondition::ALL
            .iter()
            .enumerate()
            .map(|(i, condition)| format!("{} - {}", i + 1, condition))
            .join("\n");
        self.popup.show(
            &format!(
                "Condition number or name, optionally followed by rounds:\n\n{}",
                prompt_text
            ),
            true,
            (40, 60),
            move |app, input| match parse_condition(&input) {
                Ok(condition) => app.dispatch(Action::AddCondition {
                    encounter,
                    combatant,
                    condition,
                }),
                Err(err) => app.reject(err),
            },
        );
    }

    fn remove_condition(&mut self) {
        let (Some(encounter), Some(combatant)) = (self.active(), self.selected_combatant()) else {
            return;
        };
        let listed = self
            .store
            .encounter(encounter)
            .and_then(|e| e.combatant(combatant))
            .map(|c| {
                c.conditions
                    .iter()
                    .enumerate()
                    .map(|(i, condition)| format!("{} - {}", i + 1, condition))
                    .join("\n")
            })
            .unwrap_or_default();
        if listed.is_empty() {
            self.status = Some("No conditions to remove".to_string());
            return;
        }
        self.popup.show(
            &format!("Condition to remove:\n\n{}", listed),
            true,
            (40, 40),
            move |app, input| match parse_condition_target(&input) {
                Ok(target) => app.dispatch(Action::RemoveCondition {
                    encounter,
                    combatant,
                    target,
                }),
                Err(err) => app.reject(err),
            },
        );
    }

    fn add_creature(&mut self) {
        let Some(encounter) = self.active() else {
            return;
        };
        if self.catalog.is_empty() {
            self.status = Some("No bestiary loaded (use --bestiary)".to_string());
            return;
        }
        let search = self.store.builder().filters.search.clone();
        self.popup.show(
            &format!("Creature name and optional count (last search: '{}'):", search),
            true,
            (40, 20),
            move |app, input| {
                let (name, count) = match parse_creature_request(&input) {
                    Ok(request) => request,
                    Err(err) => return app.reject(err),
                };
                let filters = BuilderFilters {
                    search: name.clone(),
                    ..app.store.builder().filters.clone()
                };
                let catalog = app.catalog.clone();
                app.dispatch(Action::SetFilters { filters, catalog });

                let filtered = &app.store.builder().filtered;
                let creature = filtered
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(&name))
                    .or_else(|| filtered.iter().exactly_one().ok())
                    .cloned();
                match creature {
                    Some(creature) => {
                        info!("Adding {} x{}", creature.name, count);
                        app.dispatch(Action::AddCreature {
                            encounter,
                            creature,
                            count,
                        });
                    }
                    None => {
                        app.status = Some(format!(
                            "{} creatures match '{}'",
                            app.store.builder().filtered.len(),
                            name
                        ))
                    }
                }
            },
        );
    }

    fn add_player(&mut self) {
        let Some(encounter) = self.active() else {
            return;
        };
        self.popup.show(
            "Player as 'name level max_hp ac':",
            true,
            (40, 20),
            move |app, input| match parse_player(&input) {
                Ok(combatant) => app.dispatch(Action::AddCombatant {
                    encounter,
                    combatant,
                }),
                Err(err) => app.reject(err),
            },
        );
    }

    fn set_party(&mut self) {
        let Some(encounter) = self.active() else {
            return;
        };
        self.popup.show(
            "Party as 'size level':",
            true,
            (30, 20),
            move |app, input| match parse_party(&input) {
                Ok((party_size, party_level)) => app.dispatch(Action::SetParty {
                    encounter,
                    party_size,
                    party_level,
                }),
                Err(err) => app.reject(err),
            },
        );
    }

    fn cycle_target_difficulty(&mut self) {
        let Some(encounter) = self.store.active_encounter() else {
            return;
        };
        let tier = match encounter.difficulty {
            Tier::Easy => Tier::Medium,
            Tier::Medium => Tier::Hard,
            Tier::Hard => Tier::Deadly,
            Tier::Deadly => Tier::Easy,
        };
        let id = encounter.id;
        self.dispatch(Action::SetTargetDifficulty {
            encounter: id,
            tier,
        });
    }

    fn new_encounter(&mut self) {
        let (party_size, party_level) = self.party_defaults;
        self.popup
            .show("Name of the new encounter:", true, (30, 20), move |app, input| {
                let name = input.trim();
                let name = if name.is_empty() { "New encounter" } else { name };
                app.dispatch(Action::CreateEncounter {
                    name: name.to_string(),
                    party_size,
                    party_level,
                });
                app.state.select(Some(0));
            });
    }

    fn next_encounter(&mut self) {
        let encounters = self.store.encounters();
        if encounters.is_empty() {
            return;
        }
        let current = self
            .active()
            .and_then(|id| encounters.iter().position(|e| e.id == id))
            .unwrap_or(0);
        let next = encounters[(current + 1) % encounters.len()].id;
        self.dispatch(Action::SelectEncounter(next));
        self.state.select(Some(0));
    }

    fn load_latest_snapshot(&mut self) {
        match self.store.saved().len() {
            0 => self.status = Some("No saved snapshots".to_string()),
            n => {
                self.dispatch(Action::LoadSnapshot(n - 1));
                self.state.select(Some(0));
            }
        }
    }

    fn confirm_remove(&mut self) {
        let (Some(encounter), Some(combatant)) = (self.active(), self.selected_combatant()) else {
            return;
        };
        self.popup.show(
            "Remove the selected combatant?",
            false,
            (30, 20),
            move |app, _| {
                app.dispatch(Action::RemoveCombatant {
                    encounter,
                    combatant,
                })
            },
        );
    }

    fn confirm_reset(&mut self) {
        self.popup.show(
            "Reset the encounter? Initiative, conditions and hit points are restored.",
            false,
            (30, 20),
            |app, _| app.on_active(Action::ResetEncounter),
        );
    }

    fn exit(&mut self) {
        self.exit = true;
    }

    fn confirm_close(&mut self) {
        self.popup.show(
            "Do you want to close the application?",
            false,
            (30, 20),
            |app, _| app.exit(),
        );
    }
}
