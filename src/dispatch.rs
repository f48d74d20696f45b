//! Game routing: decide which player renders a game id
//!
//! The current player is passed in explicitly. A game whose type belongs to
//! another player yields a redirect instruction instead of data; performing
//! the navigation is the caller's job.

use log::debug;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::config::CatalogSettings;
use crate::error::{LoadError, UnknownRoute};
use crate::model::{Concept, Flashcard, GameType, MatchingPair, QuizDataModule, QuizQuestion};
use crate::normalize::{flashcards, matching_pairs, transform_quiz, validate_module};
use crate::registry::QuizRegistry;
use crate::remote::GameSource;

/// Client-side routes of the game pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Selection,
    Game { game_type: GameType, id: String },
}

impl Route {
    pub fn game(game_type: GameType, id: impl Into<String>) -> Self {
        Route::Game {
            game_type,
            id: id.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Selection => f.write_str("/quiz-selection"),
            Route::Game { game_type, id } => write!(f, "/{}/{}", game_type.route_segment(), id),
        }
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownRoute(path.to_string());
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["quiz-selection"] => Ok(Route::Selection),
            [segment, id] if !id.is_empty() => {
                let game_type = [GameType::Quiz, GameType::Matching, GameType::Flashcard]
                    .into_iter()
                    .find(|t| t.route_segment() == *segment)
                    .ok_or_else(unknown)?;
                Ok(Route::game(game_type, *id))
            }
            _ => Err(unknown()),
        }
    }
}

/// Tells the current page to navigate to another player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectInstruction {
    pub redirect: bool,
    pub game_type: GameType,
    pub game_id: String,
}

impl RedirectInstruction {
    pub fn route(&self) -> Route {
        Route::game(self.game_type, self.game_id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGameData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuizQuestion>,
    pub concepts: Vec<Concept>,
}

impl From<&QuizDataModule> for QuizGameData {
    fn from(module: &QuizDataModule) -> Self {
        Self {
            id: module.id.clone(),
            title: module.title.clone(),
            description: module.description.clone(),
            questions: module.questions.clone(),
            concepts: module.concepts.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchingGameData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pairs: Vec<MatchingPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashcardGameData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cards: Vec<Flashcard>,
}

/// Result of loading a game for a given player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LoadOutcome {
    Redirect(RedirectInstruction),
    Quiz(QuizGameData),
    Matching(MatchingGameData),
    Flashcard(FlashcardGameData),
}

/// Resolves game ids against the registry and the game API
pub struct GameLoader<'a> {
    registry: &'a QuizRegistry,
    source: &'a dyn GameSource,
    settings: &'a CatalogSettings,
}

impl<'a> GameLoader<'a> {
    pub fn new(
        registry: &'a QuizRegistry,
        source: &'a dyn GameSource,
        settings: &'a CatalogSettings,
    ) -> Self {
        Self {
            registry,
            source,
            settings,
        }
    }

    /// Load a game for the page `current`, or say where it should go instead
    ///
    /// Local ids are always quizzes and are served in place.
    pub fn load_quiz_data(
        &self,
        quiz_id: &str,
        current: GameType,
    ) -> Result<LoadOutcome, LoadError> {
        let Some(game_id) = quiz_id.strip_prefix(&self.settings.remote_prefix) else {
            let module = self
                .registry
                .get(quiz_id)
                .ok_or_else(|| LoadError::NotFound(quiz_id.to_string()))?;
            return Ok(LoadOutcome::Quiz(QuizGameData::from(module)));
        };

        let descriptor = self
            .source
            .fetch_game_by_id(game_id)?
            .ok_or_else(|| LoadError::NotFound(quiz_id.to_string()))?;
        let game_type = descriptor.resolve_type()?;

        if game_type != current {
            debug!(
                "Game '{}' is a {} game, redirecting from {}",
                quiz_id,
                game_type,
                current.route_segment()
            );
            return Ok(LoadOutcome::Redirect(RedirectInstruction {
                redirect: true,
                game_type,
                game_id: quiz_id.to_string(),
            }));
        }

        let policy = self.settings.fallback_policy();
        let outcome = match game_type {
            GameType::Quiz => {
                let module = transform_quiz(&descriptor, quiz_id)?;
                validate_module(&module)?;
                LoadOutcome::Quiz(QuizGameData::from(&module))
            }
            GameType::Matching => LoadOutcome::Matching(MatchingGameData {
                id: quiz_id.to_string(),
                title: descriptor.title.clone(),
                description: descriptor.description.clone(),
                pairs: matching_pairs(&descriptor, policy)?,
            }),
            GameType::Flashcard => LoadOutcome::Flashcard(FlashcardGameData {
                id: quiz_id.to_string(),
                title: descriptor.title.clone(),
                description: descriptor.description.clone(),
                cards: flashcards(&descriptor, policy)?,
            }),
        };
        Ok(outcome)
    }

    /// Load whatever a parsed route points at; the selection page has no game
    pub fn load_route(&self, route: &Route) -> Result<Option<LoadOutcome>, LoadError> {
        match route {
            Route::Selection => Ok(None),
            Route::Game { game_type, id } => self.load_quiz_data(id, *game_type).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::GameDescriptor;
    use crate::local::LocalModules;
    use crate::remote::StaticGameSource;

    fn matching_descriptor(id: &str, game_type: &str) -> GameDescriptor {
        GameDescriptor {
            id: id.to_string(),
            title: "Application terms".to_string(),
            game_type: Some(game_type.to_string()),
            pairs: Some(vec![MatchingPair {
                id: "p1".to_string(),
                term: "PHS".to_string(),
                definition: "Personal history statement".to_string(),
            }]),
            ..Default::default()
        }
    }

    fn setup(games: Vec<GameDescriptor>) -> (QuizRegistry, StaticGameSource, CatalogSettings) {
        let settings = CatalogSettings::default();
        let source = StaticGameSource::new(games);
        let mut registry = QuizRegistry::new();
        registry.initialize_quizzes(&settings, &LocalModules::bundled(), &source);
        (registry, source, settings)
    }

    #[test]
    fn routes_parse_and_print() {
        let route: Route = "/matching-game/remote-3".parse().unwrap();
        assert_eq!(route, Route::game(GameType::Matching, "remote-3"));
        assert_eq!(route.to_string(), "/matching-game/remote-3");
        assert_eq!("/quiz-selection".parse::<Route>().unwrap(), Route::Selection);
        assert!("/university-search/1".parse::<Route>().is_err());
        assert!("/quiz-game/".parse::<Route>().is_err());
    }

    #[test]
    fn mismatched_type_returns_redirect() {
        let (registry, source, settings) = setup(vec![matching_descriptor("5", "Matching")]);
        let loader = GameLoader::new(&registry, &source, &settings);
        let outcome = loader.load_quiz_data("remote-5", GameType::Quiz).unwrap();
        let LoadOutcome::Redirect(redirect) = outcome else {
            panic!("expected redirect, got {:?}", outcome);
        };
        assert!(redirect.redirect);
        assert_eq!(redirect.game_type, GameType::Matching);
        assert_eq!(redirect.game_id, "remote-5");
        assert_eq!(redirect.route().to_string(), "/matching-game/remote-5");
    }

    #[test]
    fn redirect_serializes_as_instruction() {
        let (registry, source, settings) = setup(vec![matching_descriptor("5", "MATCHING")]);
        let loader = GameLoader::new(&registry, &source, &settings);
        let outcome = loader.load_quiz_data("remote-5", GameType::Flashcard).unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({"redirect": true, "gameType": "matching", "gameId": "remote-5"})
        );
    }

    #[test]
    fn matching_type_on_matching_page_returns_pairs() {
        let (registry, source, settings) = setup(vec![matching_descriptor("5", "matching")]);
        let loader = GameLoader::new(&registry, &source, &settings);
        match loader.load_quiz_data("remote-5", GameType::Matching).unwrap() {
            LoadOutcome::Matching(data) => {
                assert_eq!(data.id, "remote-5");
                assert_eq!(data.pairs.len(), 1);
            }
            other => panic!("expected matching data, got {:?}", other),
        }
    }

    #[test]
    fn local_ids_are_served_as_quizzes_in_place() {
        let (registry, source, settings) = setup(Vec::new());
        let loader = GameLoader::new(&registry, &source, &settings);
        let outcome = loader.load_quiz_data("brain-quiz", GameType::Flashcard).unwrap();
        assert!(matches!(outcome, LoadOutcome::Quiz(ref q) if q.id == "brain-quiz"));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let (registry, source, settings) = setup(Vec::new());
        let loader = GameLoader::new(&registry, &source, &settings);
        assert!(matches!(
            loader.load_quiz_data("remote-99", GameType::Quiz),
            Err(LoadError::NotFound(id)) if id == "remote-99"
        ));
        assert!(matches!(
            loader.load_quiz_data("nope", GameType::Quiz),
            Err(LoadError::NotFound(_))
        ));
    }

    #[test]
    fn selection_route_loads_nothing() {
        let (registry, source, settings) = setup(Vec::new());
        let loader = GameLoader::new(&registry, &source, &settings);
        assert_eq!(loader.load_route(&Route::Selection).unwrap(), None);
        let route: Route = "/quiz-game/brain-quiz".parse().unwrap();
        assert!(matches!(loader.load_route(&route).unwrap(), Some(LoadOutcome::Quiz(_))));
    }
}
