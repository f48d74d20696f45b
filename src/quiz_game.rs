//! Quiz player: question loop with XP, health and streak
//!
//! Phases go `InProgress -> ShowingFeedback -> InProgress | Completed`.
//! Health only drops; running out of it does not end the game.

use chrono::{DateTime, Utc};

use crate::config::QuizSettings;
use crate::dispatch::QuizGameData;
use crate::error::{SessionError, ValidationError};
use crate::model::{Concept, GameType, QuizQuestion};
use crate::progress::{CompletedQuiz, SessionSummary, UserQuizAnswer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    InProgress,
    ShowingFeedback,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub xp_gained: u32,
    pub correct_concept: String,
    pub explanation: String,
}

/// XP for a correct answer given the streak before it
pub fn xp_for_answer(settings: &QuizSettings, streak: u32) -> u32 {
    settings.base_xp + streak * settings.streak_bonus
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz_id: String,
    questions: Vec<QuizQuestion>,
    concepts: Vec<Concept>,
    settings: QuizSettings,
    index: usize,
    phase: QuizPhase,
    xp: u32,
    health: u32,
    streak: u32,
    best_streak: u32,
    correct_answers: u32,
    answers: Vec<UserQuizAnswer>,
}

impl QuizSession {
    pub fn new(data: &QuizGameData, settings: QuizSettings) -> Result<Self, ValidationError> {
        if data.questions.is_empty() {
            return Err(ValidationError::Empty("questions"));
        }
        Ok(Self {
            quiz_id: data.id.clone(),
            questions: data.questions.clone(),
            concepts: data.concepts.clone(),
            settings,
            index: 0,
            phase: QuizPhase::InProgress,
            xp: 0,
            health: settings.max_health,
            streak: 0,
            best_streak: 0,
            correct_answers: 0,
            answers: Vec::new(),
        })
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn question_index(&self) -> usize {
        self.index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::Completed => None,
            _ => self.questions.get(self.index),
        }
    }

    /// Concepts offered for the current question, in option order
    pub fn current_options(&self) -> Vec<&Concept> {
        self.current_question()
            .map(|q| {
                q.options
                    .iter()
                    .filter_map(|id| self.concepts.iter().find(|c| &c.id == id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn answers(&self) -> &[UserQuizAnswer] {
        &self.answers
    }

    /// Answer the current question with a concept id
    pub fn answer(&mut self, concept_id: &str) -> Result<AnswerFeedback, SessionError> {
        if self.phase != QuizPhase::InProgress {
            return Err(SessionError::NotAwaitingAnswer);
        }
        let question = self
            .questions
            .get(self.index)
            .ok_or(SessionError::NotAwaitingAnswer)?;
        if !question.options.iter().any(|o| o == concept_id) {
            return Err(SessionError::UnknownOption(concept_id.to_string()));
        }

        let is_correct = question.correct_concept == concept_id;
        let xp_gained = if is_correct {
            let gained = xp_for_answer(&self.settings, self.streak);
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            self.correct_answers += 1;
            self.xp += gained;
            gained
        } else {
            self.streak = 0;
            self.health = self.health.saturating_sub(self.settings.wrong_answer_penalty);
            0
        };

        self.answers.push(UserQuizAnswer {
            question_id: question.id,
            selected_concept: concept_id.to_string(),
            is_correct,
        });
        let feedback = AnswerFeedback {
            is_correct,
            xp_gained,
            correct_concept: question.correct_concept.clone(),
            explanation: question.explanation.clone(),
        };
        self.phase = QuizPhase::ShowingFeedback;
        Ok(feedback)
    }

    /// Leave the feedback screen: next question, or completion after the last
    pub fn next_question(&mut self) -> Result<QuizPhase, SessionError> {
        if self.phase != QuizPhase::ShowingFeedback {
            return Err(SessionError::NoFeedback);
        }
        if self.index + 1 < self.questions.len() {
            self.index += 1;
            self.phase = QuizPhase::InProgress;
        } else {
            self.phase = QuizPhase::Completed;
        }
        Ok(self.phase)
    }

    pub fn is_completed(&self) -> bool {
        self.phase == QuizPhase::Completed
    }

    /// Stats contribution, available once completed
    pub fn summary(&self) -> Option<SessionSummary> {
        self.is_completed().then(|| SessionSummary {
            quiz_id: self.quiz_id.clone(),
            game_type: GameType::Quiz,
            answered: self.answers.len() as u32,
            correct: self.correct_answers,
            best_streak: self.best_streak,
            xp: self.xp,
            score: self.correct_answers,
        })
    }

    /// Completion record, available once completed
    pub fn completed_quiz(&self, completed_at: DateTime<Utc>) -> Option<CompletedQuiz> {
        self.is_completed().then(|| CompletedQuiz {
            quiz_id: self.quiz_id.clone(),
            completed_at,
            score: self.correct_answers,
            total_questions: self.questions.len() as u32,
            user_answers: self.answers.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(n: u32) -> QuizGameData {
        let concepts: Vec<Concept> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| Concept {
                id: id.to_string(),
                name: id.to_uppercase(),
                description: format!("about {}", id),
            })
            .collect();
        let questions = (1..=n)
            .map(|id| QuizQuestion {
                id,
                question: format!("Question {}", id),
                explanation: "because".to_string(),
                correct_concept: "a".to_string(),
                options: vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()],
            })
            .collect();
        QuizGameData {
            id: "brain-quiz".to_string(),
            title: "Brain".to_string(),
            description: String::new(),
            questions,
            concepts,
        }
    }

    fn session(n: u32) -> QuizSession {
        QuizSession::new(&data(n), QuizSettings::default()).unwrap()
    }

    fn play(s: &mut QuizSession, concept: &str) -> AnswerFeedback {
        let feedback = s.answer(concept).unwrap();
        s.next_question().unwrap();
        feedback
    }

    #[test]
    fn xp_escalates_with_streak() {
        let mut s = session(4);
        assert_eq!(play(&mut s, "a").xp_gained, 10);
        assert_eq!(play(&mut s, "a").xp_gained, 12);
        assert_eq!(play(&mut s, "a").xp_gained, 14);
        assert_eq!(s.xp(), 36);
        assert_eq!(s.streak(), 3);
    }

    #[test]
    fn wrong_answer_resets_streak_and_costs_health() {
        let mut s = session(4);
        play(&mut s, "a");
        play(&mut s, "a");
        let feedback = play(&mut s, "b");
        assert!(!feedback.is_correct);
        assert_eq!(feedback.xp_gained, 0);
        assert_eq!(feedback.correct_concept, "a");
        assert_eq!(s.streak(), 0);
        assert_eq!(s.health(), 80);
        assert_eq!(play(&mut s, "a").xp_gained, 10);
    }

    #[test]
    fn health_floors_at_zero_without_ending_the_game() {
        let mut s = session(7);
        for _ in 0..6 {
            play(&mut s, "d");
        }
        assert_eq!(s.health(), 0);
        assert_eq!(s.phase(), QuizPhase::InProgress);
        play(&mut s, "a");
        assert!(s.is_completed());
    }

    #[test]
    fn phases_must_alternate() {
        let mut s = session(2);
        assert_eq!(s.next_question().unwrap_err(), SessionError::NoFeedback);
        s.answer("a").unwrap();
        assert_eq!(s.answer("a").unwrap_err(), SessionError::NotAwaitingAnswer);
        assert_eq!(s.next_question().unwrap(), QuizPhase::InProgress);
        assert_eq!(
            s.answer("zzz").unwrap_err(),
            SessionError::UnknownOption("zzz".to_string())
        );
    }

    #[test]
    fn completion_produces_summary_and_record() {
        let mut s = session(3);
        assert!(s.summary().is_none());
        play(&mut s, "a");
        play(&mut s, "b");
        play(&mut s, "a");
        assert!(s.current_question().is_none());

        let summary = s.summary().unwrap();
        assert_eq!(summary.answered, 3);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.best_streak, 1);
        assert_eq!(summary.xp, 20);

        let record = s.completed_quiz(Utc::now()).unwrap();
        assert_eq!(record.score, 2);
        assert_eq!(record.total_questions, 3);
        assert_eq!(record.user_answers.len(), 3);
        assert!(!record.user_answers[1].is_correct);
    }

    #[test]
    fn options_resolve_to_concepts() {
        let s = session(1);
        let names: Vec<&str> = s.current_options().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert!(QuizSession::new(&data(0), QuizSettings::default()).is_err());
    }
}
