//! Canonical game content model shared by every player

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// An answerable fact: the unit every question option points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Multiple-choice question; `options` and `correct_concept` are concept ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    #[serde(default)]
    pub explanation: String,
    pub correct_concept: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub id: String,
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// The three players a game can be rendered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Quiz,
    Matching,
    Flashcard,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Quiz => "quiz",
            GameType::Matching => "matching",
            GameType::Flashcard => "flashcard",
        }
    }

    /// Route segment of the player page for this type
    pub fn route_segment(&self) -> &'static str {
        match self {
            GameType::Quiz => "quiz-game",
            GameType::Matching => "matching-game",
            GameType::Flashcard => "flashcard-game",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ValidationError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quiz" => Ok(GameType::Quiz),
            "matching" => Ok(GameType::Matching),
            "flashcard" => Ok(GameType::Flashcard),
            other => Err(ValidationError::UnsupportedType(other.to_string())),
        }
    }
}

/// One playable game as held by the registry
///
/// Matching and flashcard games keep their items in `pairs` / `cards`; their
/// `questions` hold a single placeholder so every module has the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDataModule {
    pub id: String,
    pub title: String,
    pub description: String,
    pub game_type: GameType,
    pub questions: Vec<QuizQuestion>,
    pub concepts: Vec<Concept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pairs: Vec<MatchingPair>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<Flashcard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl QuizDataModule {
    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_type_parses_case_insensitively() {
        assert_eq!("Matching".parse::<GameType>().unwrap(), GameType::Matching);
        assert_eq!(" FLASHCARD ".parse::<GameType>().unwrap(), GameType::Flashcard);
        assert_eq!("quiz".parse::<GameType>().unwrap(), GameType::Quiz);
    }

    #[test]
    fn unknown_game_type_is_rejected() {
        let err = "trivia".parse::<GameType>().unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedType("trivia".to_string()));
    }

    #[test]
    fn question_uses_camel_case_on_the_wire() {
        let q: QuizQuestion = serde_json::from_str(
            r#"{"id":1,"question":"Q?","correctConcept":"a","options":["a","b"]}"#,
        )
        .unwrap();
        assert_eq!(q.correct_concept, "a");
        assert!(q.explanation.is_empty());
    }
}
