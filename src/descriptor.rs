//! Remote game descriptors as returned by the game-listing API

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{Concept, Flashcard, GameType, MatchingPair, QuizQuestion};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorMetadata {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A game before normalization
///
/// Which item list is present depends on the declared type; none of them is
/// guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDescriptor {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DescriptorMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<Concept>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairs: Option<Vec<MatchingPair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Flashcard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl GameDescriptor {
    /// The declared type string: `gameType`, then `type`, then `metadata.type`
    pub fn declared_type(&self) -> Option<&str> {
        self.game_type
            .as_deref()
            .or(self.kind.as_deref())
            .or_else(|| self.metadata.as_ref().and_then(|m| m.kind.as_deref()))
            .filter(|s| !s.trim().is_empty())
    }

    /// Resolve the game type, defaulting to quiz when nothing is declared
    pub fn resolve_type(&self) -> Result<GameType, ValidationError> {
        match self.declared_type() {
            Some(declared) => declared.parse(),
            None => Ok(GameType::Quiz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(json: &str) -> GameDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn game_type_field_wins_over_metadata() {
        let d = descriptor(r#"{"id":"1","gameType":"Flashcard","metadata":{"type":"matching"}}"#);
        assert_eq!(d.resolve_type().unwrap(), GameType::Flashcard);
    }

    #[test]
    fn metadata_type_is_used_when_no_game_type() {
        let d = descriptor(r#"{"id":"1","metadata":{"type":"MATCHING"}}"#);
        assert_eq!(d.resolve_type().unwrap(), GameType::Matching);
    }

    #[test]
    fn plain_type_field_is_honoured() {
        let d = descriptor(r#"{"id":"1","type":"flashcard"}"#);
        assert_eq!(d.resolve_type().unwrap(), GameType::Flashcard);
    }

    #[test]
    fn missing_type_defaults_to_quiz() {
        let d = descriptor(r#"{"id":"1","title":"t"}"#);
        assert_eq!(d.resolve_type().unwrap(), GameType::Quiz);
    }

    #[test]
    fn blank_type_defaults_to_quiz() {
        let d = descriptor(r#"{"id":"1","gameType":"  "}"#);
        assert_eq!(d.resolve_type().unwrap(), GameType::Quiz);
    }

    #[test]
    fn unknown_type_is_an_error() {
        let d = descriptor(r#"{"id":"1","gameType":"trivia"}"#);
        assert!(matches!(
            d.resolve_type(),
            Err(ValidationError::UnsupportedType(t)) if t == "trivia"
        ));
    }
}
