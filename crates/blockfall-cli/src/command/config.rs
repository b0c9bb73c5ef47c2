use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameConfig, PieceSeed, Randomizer};

use crate::util;

/// Game configuration options shared by subcommands.
///
/// Values are resolved in order: the JSON file (or the classic preset, or the
/// defaults), then individual flags on top.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Read the configuration from a JSON file
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Start from the classic preset: 21 rows, no hold, no preview, uniform pieces
    #[clap(long, conflicts_with = "config")]
    classic: bool,
    /// Number of grid rows
    #[clap(long, value_name = "N")]
    height: Option<usize>,
    /// Number of upcoming pieces shown
    #[clap(long, value_name = "N")]
    queue_length: Option<usize>,
    /// Disable the hold slot
    #[clap(long)]
    no_hold: bool,
    /// Piece generation policy
    #[clap(long, value_enum)]
    randomizer: Option<RandomizerArg>,
    /// Seed for a reproducible piece sequence (32 hex characters)
    #[clap(long, value_name = "HEX")]
    seed: Option<PieceSeed>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum RandomizerArg {
    SevenBag,
    Uniform,
}

impl From<RandomizerArg> for Randomizer {
    fn from(arg: RandomizerArg) -> Self {
        match arg {
            RandomizerArg::SevenBag => Randomizer::SevenBag,
            RandomizerArg::Uniform => Randomizer::Uniform,
        }
    }
}

impl ConfigArg {
    pub(crate) fn resolve(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None if self.classic => GameConfig::classic(),
            None => GameConfig::default(),
        };

        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(queue_length) = self.queue_length {
            config.queue_length = queue_length;
        }
        if self.no_hold {
            config.hold_enabled = false;
        }
        if let Some(randomizer) = self.randomizer {
            config.randomizer = randomizer.into();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        config: ConfigArg,
    }

    fn resolve(args: &[&str]) -> anyhow::Result<GameConfig> {
        let cli = Cli::try_parse_from(std::iter::once("blockfall").chain(args.iter().copied()))?;
        cli.config.resolve()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(resolve(&[]).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_classic_preset() {
        assert_eq!(resolve(&["--classic"]).unwrap(), GameConfig::classic());
    }

    #[test]
    fn test_flags_override_preset() {
        let config = resolve(&[
            "--classic",
            "--height",
            "16",
            "--queue-length",
            "3",
            "--randomizer",
            "seven-bag",
            "--seed",
            "000000000000000000000000000000ff",
        ])
        .unwrap();
        assert_eq!(config.grid_height, 16);
        assert_eq!(config.queue_length, 3);
        assert!(!config.hold_enabled);
        assert_eq!(config.randomizer, Randomizer::SevenBag);
        assert_eq!(config.seed, Some(PieceSeed::from_u128(0xff)));
    }

    #[test]
    fn test_no_hold() {
        assert!(!resolve(&["--no-hold"]).unwrap().hold_enabled);
    }

    #[test]
    fn test_invalid_values() {
        let err = resolve(&["--height", "2"]).unwrap_err();
        assert!(format!("{err:#}").contains("grid height 2 out of range"), "{err:#}");
        assert!(resolve(&["--seed", "xyz"]).is_err());
        assert!(resolve(&["--config", "a.json", "--classic"]).is_err());
    }

    #[test]
    fn test_config_file() {
        let path = std::env::temp_dir().join(format!("blockfall-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "grid_height": 12, "randomizer": "uniform" }"#).unwrap();
        let config = resolve(&["--config", path.to_str().unwrap(), "--queue-length", "0"]);
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.randomizer, Randomizer::Uniform);
        assert_eq!(config.queue_length, 0);
        assert!(config.hold_enabled);
    }
}
