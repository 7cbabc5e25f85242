use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::rating::RatingRules;
use super::types::{Difficulty, FirstMover, Mark, Variant};

pub const MAX_BOT_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub variant: Variant,
    pub difficulty: Difficulty,
    pub first_mover: FirstMover,
    pub human_mark: Mark,
    /// Pause before the bot moves. Pacing only, zero is fine.
    pub bot_delay_ms: u64,
    pub rating: RatingRules,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            difficulty: Difficulty::Medium,
            first_mover: FirstMover::X,
            human_mark: Mark::X,
            bot_delay_ms: 1000,
            rating: RatingRules::default(),
        }
    }
}

impl Validate for RatingRules {
    fn validate(&self) -> Result<(), String> {
        if self.win_bonus < 0 {
            return Err(format!("Win bonus must not be negative, got {}", self.win_bonus));
        }
        if self.loss_penalty < 0 {
            return Err(format!(
                "Loss penalty must not be negative, got {}",
                self.loss_penalty
            ));
        }
        Ok(())
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if self.human_mark == Mark::Empty {
            return Err("Human side must be X or O".to_string());
        }
        if self.bot_delay_ms > MAX_BOT_DELAY_MS {
            return Err(format!(
                "Bot delay must be at most {} ms, got {}",
                MAX_BOT_DELAY_MS, self.bot_delay_ms
            ));
        }
        self.rating.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSerializer, YamlConfigSerializer};

    #[test]
    fn test_default_settings_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn test_default_settings_can_be_serialized_and_deserialized() {
        let settings = GameSettings::default();
        let serializer = YamlConfigSerializer;
        let text = serializer.serialize(&settings).unwrap();
        let parsed: GameSettings = serializer.deserialize(&text).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed: GameSettings = YamlConfigSerializer
            .deserialize("variant: Tokens\ndifficulty: Hard\n")
            .unwrap();
        assert_eq!(parsed.variant, Variant::Tokens);
        assert_eq!(parsed.difficulty, Difficulty::Hard);
        assert_eq!(parsed.human_mark, Mark::X);
        assert_eq!(parsed.first_mover, FirstMover::X);
        assert_eq!(parsed.rating, RatingRules::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let settings = GameSettings {
            human_mark: Mark::Empty,
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = GameSettings {
            bot_delay_ms: 5000,
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = GameSettings {
            rating: RatingRules {
                loss_penalty: -1,
                ..RatingRules::default()
            },
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
