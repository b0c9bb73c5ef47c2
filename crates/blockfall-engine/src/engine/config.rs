use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::piece_factory::{PieceSeed, Randomizer};

/// Game variant settings, resolved once when a game is created.
///
/// The default is the reference variant: 20 rows, hold enabled, six upcoming pieces
/// and the 7-bag randomizer. Missing fields in a serialized config take their
/// default values.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "grid_height": 21 }"#).unwrap();
/// assert_eq!(config.grid_height, 21);
/// assert_eq!(config.queue_length, 6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of grid rows.
    pub grid_height: usize,
    /// Number of upcoming pieces kept in the look-ahead queue (0 disables it).
    pub queue_length: usize,
    /// Whether the hold slot can be used.
    pub hold_enabled: bool,
    /// Piece generation policy.
    pub randomizer: Randomizer,
    /// Fixed seed for the piece sequence; a fresh one is drawn when unset.
    pub seed: Option<PieceSeed>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_height: 20,
            queue_length: 6,
            hold_enabled: true,
            randomizer: Randomizer::SevenBag,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Allowed grid heights. The I-piece box must fit vertically.
    pub const GRID_HEIGHT_RANGE: RangeInclusive<usize> = 4..=40;
    /// Allowed look-ahead queue lengths.
    pub const QUEUE_LENGTH_RANGE: RangeInclusive<usize> = 0..=14;

    /// The earliest variant: 21 rows, no hold, no preview, uniform random pieces.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            grid_height: 21,
            queue_length: 0,
            hold_enabled: false,
            randomizer: Randomizer::Uniform,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_seed(self, seed: PieceSeed) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Self::GRID_HEIGHT_RANGE.contains(&self.grid_height) {
            return Err(ConfigError::GridHeight(self.grid_height));
        }
        if !Self::QUEUE_LENGTH_RANGE.contains(&self.queue_length) {
            return Err(ConfigError::QueueLength(self.queue_length));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display(
        "grid height {_0} out of range ({}..={})",
        GameConfig::GRID_HEIGHT_RANGE.start(),
        GameConfig::GRID_HEIGHT_RANGE.end()
    )]
    GridHeight(#[error(not(source))] usize),
    #[display(
        "queue length {_0} out of range ({}..={})",
        GameConfig::QUEUE_LENGTH_RANGE.start(),
        GameConfig::QUEUE_LENGTH_RANGE.end()
    )]
    QueueLength(#[error(not(source))] usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_reference_variant() {
        let config = GameConfig::default();
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.queue_length, 6);
        assert!(config.hold_enabled);
        assert_eq!(config.randomizer, Randomizer::SevenBag);
        assert!(config.validate().is_ok());
        assert!(GameConfig::classic().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = GameConfig {
            grid_height: 3,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GridHeight(3)));
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "grid height 3 out of range (4..=40)"
        );

        let config = GameConfig {
            queue_length: 15,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::QueueLength(15)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "hold_enabled": false, "randomizer": "uniform" }"#).unwrap();
        assert!(!config.hold_enabled);
        assert_eq!(config.randomizer, Randomizer::Uniform);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(serde_json::from_str::<GameConfig>(r#"{ "width": 12 }"#).is_err());
    }

    #[test]
    fn test_roundtrip_with_seed() {
        let config = GameConfig::classic().with_seed(PieceSeed::from_u128(42));
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
