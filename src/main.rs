use clap::{Parser, Subcommand};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

extern crate hardpoint;

use hardpoint::catalog::{WeaponCatalog, CATALOG, DEFAULT_CATALOG_FILE};
use hardpoint::dice::LoadedDice;
use hardpoint::scenario::Scenario;

const TEST_SEED: u64 = 0;

/// Weapon attack resolution for a turn-based tabletop wargame.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Load a weapon catalog and check that every weapon and ammunition combination has an attack handler.
  Validate {
    /// JSON weapon catalog
    #[arg(short, long, default_value = DEFAULT_CATALOG_FILE)]
    catalog: String,
  },
  /// Run a scripted scenario and print the phase reports as JSON.
  Simulate {
    /// JSON weapon catalog
    #[arg(short, long, default_value = DEFAULT_CATALOG_FILE)]
    catalog: String,

    /// JSON scenario file
    #[arg(short = 'f', long)]
    scenario: String,

    /// Seed for the dice.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run in test mode. Specifically, this will use a fixed random number generator.
    #[arg(short, long)]
    test: bool,

    /// Comma separated die faces to roll before falling back to the random generator, e.g. to replay a game.
    #[arg(short, long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(1..=6))]
    dice: Vec<u8>,
  },
}

fn load_catalog(file_name: &str) -> Result<&'static WeaponCatalog, Box<dyn std::error::Error>> {
  let catalog = WeaponCatalog::load_from_file(file_name)?;
  info!("(main) Loaded weapon catalog from {file_name}.");
  CATALOG
    .set(catalog)
    .map_err(|_| "(main) attempting to set CATALOG twice!")?;
  CATALOG.get().ok_or_else(|| "(main) CATALOG not set".into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  pretty_env_logger::init();
  let args = Args::parse();

  match args.command {
    Command::Validate { catalog } => {
      let loaded = load_catalog(&catalog)?;
      println!(
        "Catalog {catalog} is valid: {} weapons, {} ammunition types.",
        loaded.weapons().count(),
        loaded.all_ammo().count()
      );
    }
    Command::Simulate {
      catalog,
      scenario,
      seed,
      test,
      dice,
    } => {
      load_catalog(&catalog)?;
      let mut scenario = Scenario::load_from_file(&scenario)?;

      let seeded = if test {
        info!("(main) Simulating in TEST mode.");
        StdRng::seed_from_u64(TEST_SEED)
      } else if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
      } else {
        StdRng::from_entropy()
      };
      let mut rng: Box<dyn RngCore> = if dice.is_empty() {
        Box::new(seeded)
      } else {
        debug!("(main) Rolling scripted dice {dice:?} first.");
        Box::new(LoadedDice::with_fallback(&dice, seeded))
      };

      let result = scenario.run(rng.as_mut());
      println!("{}", serde_json::to_string_pretty(&result)?);
    }
  }
  Ok(())
}
