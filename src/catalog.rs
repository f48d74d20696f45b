//! A catalog session: config, sources and the registry built from them

use log::info;
use std::path::Path;

use crate::config::CatalogConfig;
use crate::dispatch::{GameLoader, LoadOutcome, Route};
use crate::error::{LoadError, StoreError};
use crate::local::LocalModules;
use crate::progress::ProgressStore;
use crate::registry::{InitReport, QuizRegistry};
use crate::remote::StaticGameSource;
use crate::store::SqliteStore;

pub struct GameCatalog {
    config: CatalogConfig,
    local: LocalModules,
    source: StaticGameSource,
    registry: QuizRegistry,
}

impl GameCatalog {
    /// Build sources from `config`; the registry stays empty until `initialize`
    pub fn new(config: CatalogConfig) -> Result<Self, LoadError> {
        let local = match &config.catalog.module_dir {
            Some(dir) => LocalModules::with_dir(dir),
            None => LocalModules::bundled(),
        };
        let source = match &config.catalog.remote_games {
            Some(path) => StaticGameSource::from_json_file(path)?,
            None => StaticGameSource::empty(),
        };
        Ok(Self::with_sources(config, local, source))
    }

    pub fn with_sources(
        config: CatalogConfig,
        local: LocalModules,
        source: StaticGameSource,
    ) -> Self {
        Self {
            config,
            local,
            source,
            registry: QuizRegistry::new(),
        }
    }

    /// Load the config file and initialize the registry
    pub fn open(config_path: &Path) -> Result<Self, LoadError> {
        let mut catalog = Self::new(CatalogConfig::load(config_path)?)?;
        catalog.initialize();
        Ok(catalog)
    }

    pub fn initialize(&mut self) -> InitReport {
        let report = self
            .registry
            .initialize_quizzes(&self.config.catalog, &self.local, &self.source);
        info!("Catalog ready with {} games", self.registry.len());
        report
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn registry(&self) -> &QuizRegistry {
        &self.registry
    }

    pub fn available_quiz_ids(&self) -> Vec<String> {
        self.registry.ids()
    }

    pub fn loader(&self) -> GameLoader<'_> {
        GameLoader::new(&self.registry, &self.source, &self.config.catalog)
    }

    /// Progress records in the configured SQLite database
    pub fn open_progress(&self) -> Result<ProgressStore<SqliteStore>, StoreError> {
        SqliteStore::open(&self.config.storage.db_path).map(ProgressStore::new)
    }

    pub fn load_route(&self, path: &str) -> Result<Option<LoadOutcome>, LoadError> {
        let route = path.parse::<Route>()?;
        self.loader().load_route(&route)
    }
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
fn runtime_err(e: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyRuntimeError::new_err(e.to_string())
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "initialize_catalog")]
pub fn py_initialize_catalog(config_path: &str) -> PyResult<Vec<String>> {
    GameCatalog::open(Path::new(config_path))
        .map(|c| c.available_quiz_ids())
        .map_err(runtime_err)
}

/// Load the game at `route` as JSON; `None` for the selection page
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "load_game")]
pub fn py_load_game(config_path: &str, route: &str) -> PyResult<Option<String>> {
    let catalog = GameCatalog::open(Path::new(config_path)).map_err(runtime_err)?;
    match catalog.load_route(route).map_err(runtime_err)? {
        Some(outcome) => serde_json::to_string(&outcome).map(Some).map_err(runtime_err),
        None => Ok(None),
    }
}
