//! Key/value persistence for the store, modelled on browser local storage.
//!
//! Writes are synchronous and not transactional. The filtered builder
//! results never reach storage.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    builder::{BuilderFilters, BuilderState},
    encounter::{Encounter, SavedEncounter},
    store::EncounterStore,
};

pub const STORAGE_KEY: &str = "dnd-encounter-tracker-state";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove_item(&mut self, key: &str) -> Result<(), PersistError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistError> {
        self.items.remove(key);
        Ok(())
    }
}

/// All keys live in one JSON object on disk; every write rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), PersistError> {
        fs::write(&self.path, serde_json::to_string_pretty(items)?)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistError> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

/// The blob stored under [`STORAGE_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub encounters: Vec<Encounter>,
    #[serde(default)]
    pub active_encounter: Option<Uuid>,
    #[serde(default)]
    pub saved_encounters: Vec<SavedEncounter>,
    #[serde(default)]
    pub builder_filters: BuilderFilters,
}

impl From<&EncounterStore> for PersistedState {
    fn from(store: &EncounterStore) -> Self {
        Self {
            encounters: store.encounters().to_vec(),
            active_encounter: store.active_id(),
            saved_encounters: store.saved().to_vec(),
            builder_filters: store.builder().filters.clone(),
        }
    }
}

impl From<PersistedState> for EncounterStore {
    fn from(state: PersistedState) -> Self {
        let builder = BuilderState {
            filters: state.builder_filters,
            filtered: Vec::new(),
        };
        EncounterStore::from_parts(
            state.encounters,
            state.active_encounter,
            state.saved_encounters,
            builder,
        )
    }
}

pub fn save_store<S: Storage + ?Sized>(storage: &mut S, store: &EncounterStore) -> Result<(), PersistError> {
    let blob = serde_json::to_string(&PersistedState::from(store))?;
    storage.set_item(STORAGE_KEY, &blob)?;
    info!("Persisted {} encounters", store.encounters().len());
    Ok(())
}

/// `Ok(None)` when nothing was stored yet.
pub fn load_store<S: Storage + ?Sized>(storage: &S) -> Result<Option<EncounterStore>, PersistError> {
    let Some(blob) = storage.get_item(STORAGE_KEY)? else {
        debug!("No persisted state under {}", STORAGE_KEY);
        return Ok(None);
    };
    let state: PersistedState = serde_json::from_str(&blob)?;
    info!("Loaded {} encounters", state.encounters.len());
    Ok(Some(EncounterStore::from(state)))
}
