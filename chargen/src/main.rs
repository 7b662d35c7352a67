//! Random character generator.
//!
//! Prints one randomly generated character sheet:
//!
//! ```bash
//! cargo run -p chargen -- --level random --alignment 0.5 --seed 7
//! ```

mod args;

use args::{CliConfig, LevelChoice, DATA_DIR_ENV};
use chargen_core::{testing, Catalogs, Generator, UNRATED};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "chargen=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args::parse_config_from_args(&args, std::env::var(DATA_DIR_ENV).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run with --help for usage.");
            std::process::exit(1);
        }
    };

    if config.help {
        print_help();
        return;
    }

    if let Err(e) = run(config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalogs = match &config.data_dir {
        Some(dir) => Catalogs::load_dir(dir).await?,
        None => {
            info!("no catalog directory configured, using built-in samples");
            testing::sample_catalogs()
        }
    };

    let generator = Generator::builtin()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let sheet = match config.level {
        LevelChoice::Random => {
            generator.generate_random_level(&catalogs, config.alignment, &mut rng)?
        }
        LevelChoice::Fixed(level) => {
            generator.generate(&catalogs, level, UNRATED, config.alignment, &mut rng)?
        }
    };

    if config.json {
        println!("{}", serde_json::to_string_pretty(&sheet)?);
    } else {
        print!("{sheet}");
    }
    Ok(())
}

fn print_help() {
    println!("chargen - random D&D 5e character generator");
    println!();
    println!("USAGE:");
    println!("  chargen [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help             Show this help message");
    println!("  --data <DIR>           Catalog directory (default: ${DATA_DIR_ENV}, else built-in samples)");
    println!("  --level <1-20|random>  Character level (default: 1)");
    println!("  --alignment <A>        Alignment in [-1, 1] (default: 0)");
    println!("  --seed <N>             Seed for reproducible output");
    println!("  --json                 Print the sheet as JSON");
    println!();
    println!("CATALOG FILES:");
    println!("  races.json, classes.json, spells.json, feats.json,");
    println!("  first-names.json, middle-names.json, equipment.json");
}
