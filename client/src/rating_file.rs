use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tactoken_common::config::{
    ConfigContentProvider, ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer,
};
use tactoken_common::games::tictactoe::RatingStore;
use tactoken_common::log;

/// On-disk shape of the rating file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingRecord {
    pub rating: i64,
    pub updated_at: Option<String>,
}

impl Validate for RatingRecord {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Rating kept in a YAML file. Reads once on open, writes through on every change.
pub struct FileRatingStore<P: ConfigContentProvider = FileContentConfigProvider> {
    manager: ConfigManager<P, RatingRecord>,
    rating: i64,
}

impl FileRatingStore {
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self, String> {
        Self::new(FileContentConfigProvider::new(file_path))
    }
}

impl<P: ConfigContentProvider> FileRatingStore<P> {
    pub fn new(provider: P) -> Result<Self, String> {
        let manager: ConfigManager<P, RatingRecord> =
            ConfigManager::new(provider, YamlConfigSerializer);
        let rating = manager.get_config()?.rating;
        Ok(Self { manager, rating })
    }
}

impl<P: ConfigContentProvider + Send> RatingStore for FileRatingStore<P> {
    fn get_rating(&self) -> i64 {
        self.rating
    }

    fn set_rating(&mut self, rating: i64) {
        self.rating = rating;
        let record = RatingRecord {
            rating,
            updated_at: Some(Local::now().to_rfc3339()),
        };
        if let Err(e) = self.manager.set_config(&record) {
            log!("Failed to save rating: {}", e);
        }
    }
}
