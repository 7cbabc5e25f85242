pub(crate) use tactoken_common::config::{ConfigManager, FileContentConfigProvider, Validate};
use serde::{Deserialize, Serialize};
use tactoken_common::games::tictactoe::GameSettings;

pub const CONFIG_FILE: &str = "tactoken_config.yaml";
const RATING_FILE: &str = "tactoken_rating.yaml";

pub fn get_config_manager(file_path: &str) -> ConfigManager<FileContentConfigProvider, Config> {
    ConfigManager::from_yaml_file(file_path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub game: GameSettings,
    pub rating_file: String,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        if self.rating_file.is_empty() {
            return Err("rating_file must not be empty".to_string());
        }
        self.game.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            rating_file: RATING_FILE.to_string(),
        }
    }
}
