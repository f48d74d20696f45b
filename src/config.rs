//! TOML configuration for a catalog session

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::normalize::FallbackPolicy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub catalog: CatalogSettings,
    pub storage: StorageSettings,
    pub quiz: QuizSettings,
    pub flashcard: FlashcardSettings,
}

impl CatalogConfig {
    pub fn from_toml(text: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a config file; relative paths inside it are resolved against its directory
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(dir) = self.catalog.module_dir.as_mut() {
            rebase(dir);
        }
        if let Some(games) = self.catalog.remote_games.as_mut() {
            rebase(games);
        }
        rebase(&mut self.storage.db_path);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Local module names, loaded in this order
    pub local_modules: Vec<String>,
    pub module_dir: Option<PathBuf>,
    /// JSON file of game descriptors served as the assigned-games listing
    pub remote_games: Option<PathBuf>,
    pub remote_prefix: String,
    pub lenient_fallbacks: bool,
}

impl CatalogSettings {
    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.lenient_fallbacks {
            FallbackPolicy::Lenient
        } else {
            FallbackPolicy::Strict
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            local_modules: vec!["brain-quiz".to_string()],
            module_dir: None,
            remote_games: None,
            remote_prefix: "remote-".to_string(),
            lenient_fallbacks: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub db_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("gradprep.db"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    pub max_health: u32,
    pub wrong_answer_penalty: u32,
    pub base_xp: u32,
    pub streak_bonus: u32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            max_health: 100,
            wrong_answer_penalty: 20,
            base_xp: 10,
            streak_bonus: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlashcardSettings {
    /// Similarity at or above which typed recall passes
    pub recall_threshold: f64,
    /// Similarity at or above which a failed answer counts as a near miss
    pub near_miss_threshold: f64,
    /// Share of edit distance in the similarity; Jaro-Winkler takes the rest
    pub levenshtein_weight: f64,
}

impl Default for FlashcardSettings {
    fn default() -> Self {
        Self {
            recall_threshold: 0.8,
            near_miss_threshold: 0.5,
            levenshtein_weight: 0.4,
        }
    }
}
