use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// A YAML combat file (players and monster groups) to import as a new encounter
    #[arg(short, long)]
    pub combat_file: Option<PathBuf>,

    /// A YAML list of creatures the builder can add from
    #[arg(short, long)]
    pub bestiary: Option<PathBuf>,

    /// A YAML creature ability table replacing the built-in reminders
    #[arg(long)]
    pub abilities: Option<PathBuf>,

    /// Where encounters and builder filters are kept between sessions
    #[arg(short, long, default_value = ".encounter-tracker.json")]
    pub state_file: PathBuf,

    /// Party size for newly created encounters
    #[arg(long, default_value_t = 4)]
    pub party_size: u32,

    /// Party level for newly created encounters
    #[arg(long, default_value_t = 1)]
    pub party_level: u8,

    /// Print the final state as JSON to stdout
    #[arg(long)]
    pub stdout: bool,
}
