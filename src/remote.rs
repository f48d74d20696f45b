//! Game listing source (the assigned-games API)

use log::debug;
use std::path::Path;

use crate::descriptor::GameDescriptor;
use crate::error::LoadError;

/// The external game API as seen by the catalog
pub trait GameSource {
    fn fetch_assigned_games(&self) -> Result<Vec<GameDescriptor>, LoadError>;

    fn fetch_game_by_id(&self, id: &str) -> Result<Option<GameDescriptor>, LoadError>;
}

/// Fixed in-memory descriptor list, standing in for the remote API
#[derive(Debug, Clone, Default)]
pub struct StaticGameSource {
    games: Vec<GameDescriptor>,
}

impl StaticGameSource {
    pub fn new(games: Vec<GameDescriptor>) -> Self {
        Self { games }
    }

    /// A source with no assigned games
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of descriptors
    pub fn from_json(name: &str, text: &str) -> Result<Self, LoadError> {
        let games: Vec<GameDescriptor> =
            serde_json::from_str(text).map_err(|source| LoadError::Json {
                name: name.to_string(),
                source,
            })?;
        debug!("Loaded {} game descriptors from {}", games.len(), name);
        Ok(Self::new(games))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&path.display().to_string(), &text)
    }
}

impl GameSource for StaticGameSource {
    fn fetch_assigned_games(&self) -> Result<Vec<GameDescriptor>, LoadError> {
        Ok(self.games.clone())
    }

    fn fetch_game_by_id(&self, id: &str) -> Result<Option<GameDescriptor>, LoadError> {
        Ok(self.games.iter().find(|g| g.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_are_served_by_id() {
        let source = StaticGameSource::from_json(
            "games",
            r#"[{"id":"1","title":"One","gameType":"quiz"},{"id":"2","title":"Two","type":"matching"}]"#,
        )
        .unwrap();
        assert_eq!(source.fetch_assigned_games().unwrap().len(), 2);
        assert_eq!(source.fetch_game_by_id("2").unwrap().unwrap().title, "Two");
        assert!(source.fetch_game_by_id("3").unwrap().is_none());
    }

    #[test]
    fn malformed_listing_is_a_parse_error() {
        let err = StaticGameSource::from_json("games", "{not json").unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }
}
