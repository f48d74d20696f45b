//! Matching player: pair terms with definitions

use rand::seq::SliceRandom;
use rand::Rng;

use crate::dispatch::MatchingGameData;
use crate::error::{SessionError, ValidationError};
use crate::model::{GameType, MatchingPair};
use crate::normalize::ensure_unique_ids;
use crate::progress::SessionSummary;

pub const MIN_MATCHING_SCORE: u32 = 50;

/// `max(50, round(100 * pairs / attempts))`; fewer attempts score higher
pub fn matching_score(pairs: usize, attempts: u32) -> u32 {
    if attempts == 0 {
        return 100;
    }
    let raw = (100.0 * pairs as f64 / attempts as f64).round() as u32;
    raw.max(MIN_MATCHING_SCORE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched(String),
    Mismatch,
}

#[derive(Debug, Clone)]
pub struct MatchingSession {
    game_id: String,
    pairs: Vec<MatchingPair>,
    definition_order: Vec<String>,
    selected_term: Option<String>,
    selected_definition: Option<String>,
    matched: Vec<String>,
    attempts: u32,
}

impl MatchingSession {
    pub fn new(data: &MatchingGameData) -> Result<Self, ValidationError> {
        Self::with_rng(data, &mut rand::thread_rng())
    }

    /// Definitions are presented in an order drawn from `rng`
    pub fn with_rng<R: Rng>(data: &MatchingGameData, rng: &mut R) -> Result<Self, ValidationError> {
        if data.pairs.is_empty() {
            return Err(ValidationError::Empty("pairs"));
        }
        ensure_unique_ids("pairs", data.pairs.iter().map(|p| p.id.as_str()))?;
        let mut definition_order: Vec<String> = data.pairs.iter().map(|p| p.id.clone()).collect();
        definition_order.shuffle(rng);
        Ok(Self {
            game_id: data.id.clone(),
            pairs: data.pairs.clone(),
            definition_order,
            selected_term: None,
            selected_definition: None,
            matched: Vec::new(),
            attempts: 0,
        })
    }

    pub fn terms(&self) -> impl Iterator<Item = &MatchingPair> {
        self.pairs.iter()
    }

    /// Pairs in the order their definitions are shown
    pub fn definitions(&self) -> impl Iterator<Item = &MatchingPair> {
        self.definition_order
            .iter()
            .filter_map(|id| self.pairs.iter().find(|p| &p.id == id))
    }

    pub fn selected_term(&self) -> Option<&str> {
        self.selected_term.as_deref()
    }

    pub fn selected_definition(&self) -> Option<&str> {
        self.selected_definition.as_deref()
    }

    pub fn matched_pairs(&self) -> &[String] {
        &self.matched
    }

    pub fn is_matched(&self, pair_id: &str) -> bool {
        self.matched.iter().any(|m| m == pair_id)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_completed(&self) -> bool {
        self.matched.len() == self.pairs.len()
    }

    fn check_selectable(&self, pair_id: &str) -> Result<(), SessionError> {
        if self.is_completed() {
            return Err(SessionError::Completed);
        }
        if !self.pairs.iter().any(|p| p.id == pair_id) {
            return Err(SessionError::UnknownItem(pair_id.to_string()));
        }
        if self.is_matched(pair_id) {
            return Err(SessionError::AlreadyMatched(pair_id.to_string()));
        }
        Ok(())
    }

    /// Select a term; evaluates when a definition is already selected
    pub fn select_term(&mut self, pair_id: &str) -> Result<Option<MatchOutcome>, SessionError> {
        self.check_selectable(pair_id)?;
        self.selected_term = Some(pair_id.to_string());
        Ok(self.evaluate())
    }

    /// Select a definition; evaluates when a term is already selected
    pub fn select_definition(
        &mut self,
        pair_id: &str,
    ) -> Result<Option<MatchOutcome>, SessionError> {
        self.check_selectable(pair_id)?;
        self.selected_definition = Some(pair_id.to_string());
        Ok(self.evaluate())
    }

    /// Matches by pair identity; both selections clear either way
    fn evaluate(&mut self) -> Option<MatchOutcome> {
        if self.selected_term.is_none() || self.selected_definition.is_none() {
            return None;
        }
        let term = self.selected_term.take()?;
        let definition = self.selected_definition.take()?;
        self.attempts += 1;

        if term == definition {
            self.matched.push(term.clone());
            Some(MatchOutcome::Matched(term))
        } else {
            Some(MatchOutcome::Mismatch)
        }
    }

    pub fn score(&self) -> u32 {
        matching_score(self.pairs.len(), self.attempts)
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.is_completed().then(|| SessionSummary {
            quiz_id: self.game_id.clone(),
            game_type: GameType::Matching,
            answered: self.pairs.len() as u32,
            correct: self.pairs.len() as u32,
            best_streak: 0,
            xp: self.score(),
            score: self.score(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn data(n: usize) -> MatchingGameData {
        MatchingGameData {
            id: "remote-5".to_string(),
            title: "Terms".to_string(),
            description: String::new(),
            pairs: (1..=n)
                .map(|i| MatchingPair {
                    id: format!("p{}", i),
                    term: format!("term {}", i),
                    definition: format!("definition {}", i),
                })
                .collect(),
        }
    }

    fn session(n: usize) -> MatchingSession {
        MatchingSession::with_rng(&data(n), &mut StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn score_formula() {
        assert_eq!(matching_score(4, 4), 100);
        assert_eq!(matching_score(4, 8), 50);
        assert_eq!(matching_score(4, 5), 80);
        assert_eq!(matching_score(4, 20), 50);
    }

    #[test]
    fn perfect_play_scores_100() {
        let mut s = session(4);
        for i in 1..=4 {
            let id = format!("p{}", i);
            assert_eq!(s.select_term(&id).unwrap(), None);
            assert_eq!(s.select_definition(&id).unwrap(), Some(MatchOutcome::Matched(id)));
        }
        assert!(s.is_completed());
        assert_eq!(s.attempts(), 4);
        assert_eq!(s.summary().unwrap().score, 100);
    }

    #[test]
    fn mismatch_clears_selection_and_counts_attempt() {
        let mut s = session(2);
        s.select_definition("p2").unwrap();
        assert_eq!(s.select_term("p1").unwrap(), Some(MatchOutcome::Mismatch));
        assert_eq!(s.selected_term(), None);
        assert_eq!(s.selected_definition(), None);
        assert_eq!(s.attempts(), 1);
        assert!(s.matched_pairs().is_empty());
    }

    #[test]
    fn reselecting_a_term_replaces_it() {
        let mut s = session(2);
        s.select_term("p1").unwrap();
        s.select_term("p2").unwrap();
        assert_eq!(s.selected_term(), Some("p2"));
        assert_eq!(s.attempts(), 0);
    }

    #[test]
    fn matched_and_unknown_pairs_cannot_be_selected() {
        let mut s = session(2);
        s.select_term("p1").unwrap();
        s.select_definition("p1").unwrap();
        assert_eq!(
            s.select_term("p1").unwrap_err(),
            SessionError::AlreadyMatched("p1".to_string())
        );
        assert_eq!(
            s.select_definition("p9").unwrap_err(),
            SessionError::UnknownItem("p9".to_string())
        );
    }

    #[test]
    fn definitions_cover_every_pair() {
        let s = session(6);
        let mut ids: Vec<&str> = s.definitions().map(|p| p.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5", "p6"]);
    }

    #[test]
    fn repeated_pair_id_is_rejected_up_front() {
        let mut game = data(2);
        game.pairs[1].id = "p1".to_string();
        assert_eq!(
            MatchingSession::with_rng(&game, &mut StdRng::seed_from_u64(7)).unwrap_err(),
            ValidationError::DuplicateId {
                field: "pairs",
                id: "p1".to_string()
            }
        );
    }

    #[test]
    fn completed_session_rejects_selection() {
        let mut s = session(1);
        s.select_term("p1").unwrap();
        s.select_definition("p1").unwrap();
        assert_eq!(s.select_term("p1").unwrap_err(), SessionError::Completed);
    }
}
