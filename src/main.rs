use clap::Parser;
use crossterm::tty::IsTty;
use hexdec::{
    config::{BoundInput, DefaultsStore, FileDefaultsStore, Mode},
    runtime::{ConsoleEventSource, SystemClock},
    session::{Presets, Session},
};
use std::{error::Error, io, path::PathBuf};
use tracing_subscriber::EnvFilter;

const BANNER: &str = r#"
    HexDec - Become a Hexa(decimal) Pro!

    Set the game properties using:
    - the maximal number that will show up;
    - the game mode (d2x for decimal to hexa, x2d for the opposite direction, or both)
"#;

/// drill converting numbers between decimal and hexadecimal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal drill that shows random numbers in decimal or hexadecimal and asks for the other base. One wrong answer ends the game."
)]
pub struct Cli {
    /// maximal number that will show up (exclusive, at most 256; 0 means default)
    #[clap(short = 'm', long)]
    max_number: Option<u64>,

    /// game mode: d2x for decimal to hexa, x2d for the opposite direction, or both
    #[clap(short = 'g', long, value_enum)]
    game_mode: Option<Mode>,

    /// JSON file with the defaults offered at the prompts
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// skip the welcome banner
    #[clap(long)]
    no_banner: bool,
}

impl Cli {
    fn presets(&self) -> Presets {
        Presets {
            bound: self.max_number.map(BoundInput::from_value),
            mode: self.game_mode,
        }
    }

    fn defaults_store(&self) -> FileDefaultsStore {
        match &self.config {
            Some(path) => FileDefaultsStore::with_path(path),
            None => FileDefaultsStore::new(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();

    let store = cli.defaults_store();
    tracing::debug!(path = %store.path().display(), "loading prompt defaults");
    let defaults = store.load();

    let stdout = io::stdout();
    let styled = stdout.is_tty();
    if !cli.no_banner {
        println!("{}", BANNER);
    }

    let events = ConsoleEventSource::new()?;
    let mut session = Session::new(events, SystemClock, rand::thread_rng(), stdout.lock())
        .with_styling(styled);
    session.run(&defaults, cli.presets())?;

    Ok(())
}
