//! Flashcard player: a looping deck with flip, known marks and typed recall
//!
//! A card counts as reviewed once it has been flipped, marked or answered.
//! Completion is reported once per session, the first time every card has
//! been reviewed; further passes through the deck do not report it again.

use crate::config::FlashcardSettings;
use crate::dispatch::FlashcardGameData;
use crate::error::ValidationError;
use crate::fuzzy::{grade_recall, RecallResult};
use crate::model::{Flashcard, GameType};
use crate::normalize::ensure_unique_ids;
use crate::progress::SessionSummary;

#[derive(Debug, Clone)]
pub struct FlashcardSession {
    deck_id: String,
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
    reviewed: Vec<String>,
    known: Vec<String>,
    settings: FlashcardSettings,
    completion_reported: bool,
}

impl FlashcardSession {
    pub fn new(
        data: &FlashcardGameData,
        settings: FlashcardSettings,
    ) -> Result<Self, ValidationError> {
        if data.cards.is_empty() {
            return Err(ValidationError::Empty("cards"));
        }
        ensure_unique_ids("cards", data.cards.iter().map(|c| c.id.as_str()))?;
        Ok(Self {
            deck_id: data.id.clone(),
            cards: data.cards.clone(),
            index: 0,
            flipped: false,
            reviewed: Vec::new(),
            known: Vec::new(),
            settings,
            completion_reported: false,
        })
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_card(&self) -> &Flashcard {
        &self.cards[self.index]
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn reviewed_cards(&self) -> &[String] {
        &self.reviewed
    }

    pub fn known_cards(&self) -> &[String] {
        &self.known
    }

    fn mark_reviewed(&mut self) {
        let id = &self.cards[self.index].id;
        if !self.reviewed.contains(id) {
            self.reviewed.push(id.clone());
        }
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
        if self.flipped {
            self.mark_reviewed();
        }
    }

    /// Advance, wrapping to the first card after the last
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.cards.len();
        self.flipped = false;
    }

    pub fn previous(&mut self) {
        self.index = (self.index + self.cards.len() - 1) % self.cards.len();
        self.flipped = false;
    }

    pub fn mark_known(&mut self) {
        self.mark_reviewed();
        let id = &self.cards[self.index].id;
        if !self.known.contains(id) {
            self.known.push(id.clone());
        }
    }

    pub fn mark_unknown(&mut self) {
        self.mark_reviewed();
        let id = self.cards[self.index].id.clone();
        self.known.retain(|k| k != &id);
    }

    /// Check typed recall of the current card's back; a pass marks it known
    pub fn answer_typed(&mut self, input: &str) -> RecallResult {
        let result = grade_recall(input, &self.cards[self.index].back, &self.settings);
        if result.is_correct() {
            self.mark_known();
        } else {
            self.mark_reviewed();
        }
        self.flipped = true;
        result
    }

    pub fn is_fully_reviewed(&self) -> bool {
        self.reviewed.len() == self.cards.len()
    }

    /// `round(100 * known / cards)`
    pub fn score(&self) -> u32 {
        (100.0 * self.known.len() as f64 / self.cards.len() as f64).round() as u32
    }

    /// Summary the first time the whole deck has been reviewed, `None` otherwise
    pub fn take_completion(&mut self) -> Option<SessionSummary> {
        if self.completion_reported || !self.is_fully_reviewed() {
            return None;
        }
        self.completion_reported = true;
        Some(SessionSummary {
            quiz_id: self.deck_id.clone(),
            game_type: GameType::Flashcard,
            answered: self.cards.len() as u32,
            correct: self.known.len() as u32,
            best_streak: 0,
            xp: self.score(),
            score: self.score(),
        })
    }
}
