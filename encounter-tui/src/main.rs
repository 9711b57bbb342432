use log::info;
use std::fs::File;
use std::io::Write;

use clap::Parser;
use color_eyre::{eyre::Context, Result};
use encounter_core::{
    persist::{save_store, FileStorage, PersistedState},
    Action,
};
use env_logger::{Builder, Target};

mod tui;

use crate::tui::{app, cli, terminal, utils};

fn main() -> Result<()> {
    color_eyre::install()?;
    let log_file = File::create("encounter_tui.log").wrap_err("Failed to create log file")?;
    Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:L{} [{}] - {}",
                record.file().unwrap_or("Unknown File"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(log_file)))
        .init();

    info!("Application started");

    let args = cli::Args::parse();
    let mut storage = FileStorage::new(&args.state_file);
    let mut store = utils::load_previous_store(&storage);
    let catalog = utils::load_catalog(&args)?;
    let abilities = utils::load_ability_table(&args)?;
    info!(
        "{} creatures in the bestiary, {} ability templates",
        catalog.len(),
        abilities.len()
    );

    let filters = store.builder().filters.clone();
    store = store.reduce(Action::SetFilters {
        filters,
        catalog: catalog.clone(),
    });
    if let Some(encounter) = utils::load_combat_file(&args, store.cr_table())? {
        store = store.reduce(Action::ImportEncounter(encounter));
    }
    if store.encounters().is_empty() {
        store = store.reduce(Action::CreateEncounter {
            name: "New encounter".to_string(),
            party_size: args.party_size,
            party_level: args.party_level,
        });
    }

    // create tui
    let mut terminal = terminal::init()?;
    let mut app = app::App::new(
        store,
        storage.clone(),
        catalog,
        abilities,
        (args.party_size, args.party_level),
    );
    let result = app.run(&mut terminal);
    if let Err(err) = terminal::restore() {
        eprintln!(
            "failed to restore terminal. Run `reset` or restart your terminal to recover: {}",
            err
        );
    }
    let store = result?;

    save_store(&mut storage, &store).wrap_err_with(|| {
        format!("Failed to save state to '{}'.", storage.path().display())
    })?;
    info!("Saved state to {}", storage.path().display());

    // print to stdout if --stdout flag is given
    if args.stdout {
        println!("{}", serde_json::to_string_pretty(&PersistedState::from(&store))?);
    }
    Ok(())
}
