use color_eyre::eyre::{eyre, Context, Result};
use encounter_core::{
    import::{bestiary_from_yaml, encounter_from_yaml},
    persist::{load_store, FileStorage},
    reminders::AbilityTable,
    CrXpTable, Creature, Encounter, EncounterStore,
};
use log::{info, warn};
use std::{fs, path::Path};

use super::cli::Args;

/// checks that the given file has a yaml extension
pub fn validate_yaml_extension(file: &Path) -> Result<()> {
    match file.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Ok(()),
        _ => Err(eyre!(
            "The file '{}' must have a .yaml or .yml extension.",
            file.display()
        )),
    }
}

pub fn read_file_with_context(path: &Path) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("Failed to read file '{}'.", path.display()))
}

fn read_yaml(path: &Path) -> Result<String> {
    validate_yaml_extension(path)?;
    read_file_with_context(path)
}

/// Loads the previous session, falling back to an empty store when the
/// state file is unreadable.
pub fn load_previous_store(storage: &FileStorage) -> EncounterStore {
    match load_store(storage) {
        Ok(Some(store)) => {
            info!("Restored state from {}", storage.path().display());
            store
        }
        Ok(None) => EncounterStore::new(),
        Err(err) => {
            warn!(
                "Ignoring unreadable state in {}: {}",
                storage.path().display(),
                err
            );
            EncounterStore::new()
        }
    }
}

pub fn load_catalog(args: &Args) -> Result<Vec<Creature>> {
    let Some(path) = &args.bestiary else {
        return Ok(Vec::new());
    };
    info!("Reading bestiary from {}", path.display());
    let creatures = bestiary_from_yaml(&read_yaml(path)?)
        .wrap_err_with(|| format!("Invalid bestiary '{}'.", path.display()))?;
    Ok(creatures)
}

pub fn load_ability_table(args: &Args) -> Result<AbilityTable> {
    let table = match &args.abilities {
        Some(path) => {
            info!("Reading creature abilities from {}", path.display());
            AbilityTable::from_yaml_str(&read_yaml(path)?)
                .wrap_err_with(|| format!("Invalid ability table '{}'.", path.display()))?
        }
        None => AbilityTable::builtin()?,
    };
    Ok(table)
}

pub fn load_combat_file(args: &Args, table: &CrXpTable) -> Result<Option<Encounter>> {
    let Some(path) = &args.combat_file else {
        return Ok(None);
    };
    info!("Importing combat file {}", path.display());
    let encounter = encounter_from_yaml(&read_yaml(path)?, table)
        .wrap_err_with(|| format!("Invalid combat file '{}'.", path.display()))?;
    Ok(Some(encounter))
}
