//! Session registry of playable modules
//!
//! Built from two sources: local modules by configured name and remote
//! descriptors from the game API. Loading never fails as a whole; broken
//! entries are logged, reported and left out.

use log::{debug, info, warn};

use crate::config::CatalogSettings;
use crate::error::LoadError;
use crate::local::LocalModuleSource;
use crate::model::QuizDataModule;
use crate::normalize::{normalize_descriptor, validate_module};
use crate::remote::GameSource;

/// Registry id of a remote game
pub fn remote_module_id(prefix: &str, game_id: &str) -> String {
    format!("{}{}", prefix, game_id)
}

/// An entry that could not be registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub id: String,
    pub reason: String,
}

/// What `initialize_quizzes` managed to load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub registered: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
}

impl InitReport {
    fn skip(&mut self, id: &str, err: &LoadError) {
        warn!("Skipping '{}': {}", id, err);
        self.skipped.push(SkippedEntry {
            id: id.to_string(),
            reason: err.to_string(),
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuizRegistry {
    modules: Vec<QuizDataModule>,
}

impl QuizRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a module unless its id is already taken; first registration wins
    pub fn register(&mut self, module: QuizDataModule) -> bool {
        if self.contains(&module.id) {
            debug!("Module '{}' already registered, ignoring duplicate", module.id);
            return false;
        }
        debug!("Registered module '{}' ({})", module.id, module.game_type);
        self.modules.push(module);
        true
    }

    pub fn get(&self, id: &str) -> Option<&QuizDataModule> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Modules in registration order
    pub fn list(&self) -> &[QuizDataModule] {
        &self.modules
    }

    pub fn ids(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Clear the registry and rebuild it from both sources
    pub fn initialize_quizzes(
        &mut self,
        settings: &CatalogSettings,
        local: &dyn LocalModuleSource,
        remote: &dyn GameSource,
    ) -> InitReport {
        self.modules.clear();
        let mut report = InitReport::default();

        for name in &settings.local_modules {
            let loaded = local.load(name).and_then(|m| {
                if m.id.starts_with(&settings.remote_prefix) {
                    return Err(LoadError::ReservedId {
                        id: m.id,
                        prefix: settings.remote_prefix.clone(),
                    });
                }
                validate_module(&m)?;
                Ok(m)
            });
            match loaded {
                Ok(module) => self.register_reported(module, &mut report),
                Err(e) => report.skip(name, &e),
            }
        }

        match remote.fetch_assigned_games() {
            Ok(games) => {
                for game in &games {
                    let id = remote_module_id(&settings.remote_prefix, &game.id);
                    match normalize_descriptor(game, &id, settings.fallback_policy()) {
                        Ok(module) => self.register_reported(module, &mut report),
                        Err(e) => report.skip(&id, &LoadError::from(e)),
                    }
                }
            }
            Err(e) => warn!("Failed to fetch assigned games, continuing without them: {}", e),
        }

        info!(
            "Registry initialized: {} modules, {} skipped",
            self.modules.len(),
            report.skipped.len()
        );
        report
    }

    fn register_reported(&mut self, module: QuizDataModule, report: &mut InitReport) {
        let id = module.id.clone();
        if self.register(module) {
            report.registered.push(id);
        }
    }
}
