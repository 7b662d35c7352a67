//! Command-line argument parsing.

use std::path::PathBuf;

/// Environment variable naming the default catalog directory.
pub const DATA_DIR_ENV: &str = "CHARGEN_DATA_DIR";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelChoice {
    Fixed(u8),
    /// Draw the level from the rarity table.
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub level: LevelChoice,
    pub alignment: f64,
    pub seed: Option<u64>,
    pub json: bool,
    pub help: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            level: LevelChoice::Fixed(1),
            alignment: 0.0,
            seed: None,
            json: false,
            help: false,
        }
    }
}

/// Parse arguments (without the program name). Flags override `env_data_dir`.
pub fn parse_config_from_args(
    args: &[String],
    env_data_dir: Option<String>,
) -> Result<CliConfig, String> {
    let mut config = CliConfig {
        data_dir: env_data_dir.filter(|d| !d.is_empty()).map(PathBuf::from),
        ..CliConfig::default()
    };

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i)
                .map(String::as_str)
                .ok_or_else(|| format!("{flag} needs a value"))
        };

        match flag {
            "-h" | "--help" => config.help = true,
            "--json" => config.json = true,
            "--data" => config.data_dir = Some(PathBuf::from(value()?)),
            "--level" => config.level = parse_level(value()?)?,
            "--alignment" => config.alignment = parse_alignment(value()?)?,
            "--seed" => {
                let seed = value()?;
                config.seed = Some(
                    seed.parse()
                        .map_err(|_| format!("invalid seed {seed:?}"))?,
                );
            }
            other => return Err(format!("unknown argument {other:?}")),
        }
        i += 1;
    }

    Ok(config)
}

fn parse_level(s: &str) -> Result<LevelChoice, String> {
    if s.eq_ignore_ascii_case("random") {
        return Ok(LevelChoice::Random);
    }
    match s.parse::<u8>() {
        Ok(level) if (1..=20).contains(&level) => Ok(LevelChoice::Fixed(level)),
        _ => Err(format!("level must be 1-20 or \"random\", got {s:?}")),
    }
}

fn parse_alignment(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(alignment) if alignment.is_finite() => Ok(alignment),
        _ => Err(format!("invalid alignment {s:?}")),
    }
}
