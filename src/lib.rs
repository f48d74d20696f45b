//! GradPrep Core - game catalog for the graduate-application prep games
//!
//! Loads quiz, matching and flashcard games from bundled modules, local files
//! and the assigned-games API, normalizes them into one module shape, routes
//! each game to its player, runs the player sessions and persists progress.

pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod flashcard_game;
pub mod fuzzy;
pub mod local;
pub mod matching_game;
pub mod model;
pub mod normalize;
pub mod progress;
pub mod questions;
pub mod quiz_game;
pub mod registry;
pub mod remote;
pub mod store;

pub use catalog::GameCatalog;
pub use config::{CatalogConfig, CatalogSettings, FlashcardSettings, QuizSettings, StorageSettings};
pub use descriptor::{DescriptorMetadata, GameDescriptor};
pub use dispatch::{
    FlashcardGameData, GameLoader, LoadOutcome, MatchingGameData, QuizGameData,
    RedirectInstruction, Route,
};
pub use error::{LoadError, SessionError, StoreError, UnknownRoute, ValidationError};
pub use flashcard_game::FlashcardSession;
pub use fuzzy::{grade_recall, RecallGrade, RecallResult};
pub use local::{LocalModuleSource, LocalModules};
pub use matching_game::{matching_score, MatchOutcome, MatchingSession};
pub use model::{Concept, Flashcard, GameType, MatchingPair, QuizDataModule, QuizQuestion};
pub use normalize::{normalize_descriptor, validate_module, FallbackPolicy};
pub use progress::{CompletedQuiz, ProgressStore, QuizStats, SessionSummary, UserQuizAnswer};
pub use questions::generate_questions;
pub use quiz_game::{AnswerFeedback, QuizPhase, QuizSession};
pub use registry::{InitReport, QuizRegistry, SkippedEntry};
pub use remote::{GameSource, StaticGameSource};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// GradPrep Core Python Module
#[cfg(feature = "python")]
#[pymodule]
fn gradprep_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Catalog
    m.add_function(wrap_pyfunction!(catalog::py_initialize_catalog, m)?)?;
    m.add_function(wrap_pyfunction!(catalog::py_load_game, m)?)?;

    // Progress tracking
    m.add_function(wrap_pyfunction!(progress::py_get_quiz_stats, m)?)?;
    m.add_function(wrap_pyfunction!(progress::py_get_completed_quizzes, m)?)?;
    m.add_function(wrap_pyfunction!(progress::py_record_session, m)?)?;
    m.add_function(wrap_pyfunction!(progress::py_reset_progress, m)?)?;

    Ok(())
}
