//! Error types for loading, normalizing and persisting game content

use thiserror::Error;

/// Content that cannot be turned into a playable module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported game type '{0}'")]
    UnsupportedType(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("'{0}' must not be empty")]
    Empty(&'static str),
    #[error("question {question} references unknown concept '{concept}'")]
    UnknownConcept { question: u32, concept: String },
    #[error("question {0} does not list its correct concept among its options")]
    CorrectNotInOptions(u32),
    #[error("duplicate id '{id}' in '{field}'")]
    DuplicateId { field: &'static str, id: String },
    #[error("need at least {needed} concepts to build questions, found {found}")]
    NotEnoughConcepts { needed: usize, found: usize },
}

/// A path that matches none of the game pages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route '{0}'")]
pub struct UnknownRoute(pub String);

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("game '{0}' not found")]
    NotFound(String),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse '{name}': {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read sheet '{name}': {message}")]
    Sheet { name: String, message: String },
    #[error(transparent)]
    Route(#[from] UnknownRoute),
    #[error("unsupported module format '.{0}'")]
    UnsupportedFormat(String),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("local module id '{id}' uses the reserved prefix '{prefix}'")]
    ReservedId { id: String, prefix: String },
    #[error("game source unavailable: {0}")]
    Source(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to encode record under '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A player action that does not fit the session's current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no question is waiting for an answer")]
    NotAwaitingAnswer,
    #[error("no answer feedback to move past")]
    NoFeedback,
    #[error("'{0}' is not one of the current options")]
    UnknownOption(String),
    #[error("unknown item '{0}'")]
    UnknownItem(String),
    #[error("'{0}' is already matched")]
    AlreadyMatched(String),
    #[error("the session is already completed")]
    Completed,
}
