//! Progress tracking - completed games, aggregate stats and achievements
//!
//! Records live under two keys of a `KeyValueStore`: `completed_quizzes`
//! (JSON array, one record per quiz id) and `quiz_stats` (JSON object).

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::GameType;
use crate::store::KeyValueStore;

pub const COMPLETED_QUIZZES_KEY: &str = "completed_quizzes";
pub const QUIZ_STATS_KEY: &str = "quiz_stats";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuizAnswer {
    pub question_id: u32,
    pub selected_concept: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedQuiz {
    pub quiz_id: String,
    pub completed_at: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub user_answers: Vec<UserQuizAnswer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    pub total_answered: u32,
    pub total_correct: u32,
    pub highest_streak: u32,
    #[serde(rename = "totalXP")]
    pub total_xp: u32,
    pub completed_quizzes: u32,
    pub achievements: Vec<String>,
}

impl QuizStats {
    pub fn accuracy_percent(&self) -> f64 {
        if self.total_answered > 0 {
            (self.total_correct as f64 / self.total_answered as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// What one finished game contributes to the aggregate stats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub quiz_id: String,
    pub game_type: GameType,
    pub answered: u32,
    pub correct: u32,
    pub best_streak: u32,
    pub xp: u32,
    pub score: u32,
}

pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    unlocked: fn(&QuizStats) -> bool,
}

impl Achievement {
    pub fn is_unlocked(&self, stats: &QuizStats) -> bool {
        (self.unlocked)(stats)
    }
}

/// Fixed rule set, evaluated against cumulative stats
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first-game",
        title: "First Steps",
        unlocked: |s| s.completed_quizzes >= 1,
    },
    Achievement {
        id: "five-games",
        title: "Getting Serious",
        unlocked: |s| s.completed_quizzes >= 5,
    },
    Achievement {
        id: "ten-games",
        title: "Application Ready",
        unlocked: |s| s.completed_quizzes >= 10,
    },
    Achievement {
        id: "streak-5",
        title: "On a Roll",
        unlocked: |s| s.highest_streak >= 5,
    },
    Achievement {
        id: "streak-10",
        title: "Unstoppable",
        unlocked: |s| s.highest_streak >= 10,
    },
    Achievement {
        id: "xp-100",
        title: "Century",
        unlocked: |s| s.total_xp >= 100,
    },
    Achievement {
        id: "xp-500",
        title: "Scholar",
        unlocked: |s| s.total_xp >= 500,
    },
    Achievement {
        id: "correct-50",
        title: "Fifty Right",
        unlocked: |s| s.total_correct >= 50,
    },
];

/// Progress records on top of any key-value store
pub struct ProgressStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Decode a JSON record; unreadable records count as absent
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Ignoring unreadable record under '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }

    pub fn get_completed_quizzes(&self) -> Result<Vec<CompletedQuiz>, StoreError> {
        Ok(self.read(COMPLETED_QUIZZES_KEY)?.unwrap_or_default())
    }

    pub fn get_completed_quiz(&self, quiz_id: &str) -> Result<Option<CompletedQuiz>, StoreError> {
        Ok(self
            .get_completed_quizzes()?
            .into_iter()
            .find(|c| c.quiz_id == quiz_id))
    }

    pub fn is_quiz_completed(&self, quiz_id: &str) -> Result<bool, StoreError> {
        Ok(self.get_completed_quiz(quiz_id)?.is_some())
    }

    /// Store a completion, replacing any earlier record for the same quiz
    pub fn save_completed_quiz(&mut self, completed: CompletedQuiz) -> Result<(), StoreError> {
        let mut all = self.get_completed_quizzes()?;
        all.retain(|c| c.quiz_id != completed.quiz_id);
        debug!("Saving completion of '{}' (score {})", completed.quiz_id, completed.score);
        all.push(completed);
        self.write(COMPLETED_QUIZZES_KEY, &all)
    }

    /// Stored stats, or zeroed stats when none are stored
    pub fn get_quiz_stats(&self) -> Result<QuizStats, StoreError> {
        Ok(self.read(QUIZ_STATS_KEY)?.unwrap_or_default())
    }

    pub fn save_quiz_stats(&mut self, stats: &QuizStats) -> Result<(), StoreError> {
        self.write(QUIZ_STATS_KEY, stats)
    }

    /// Add a finished session to the stats; returns achievements unlocked by it
    pub fn record_session(&mut self, summary: &SessionSummary) -> Result<Vec<String>, StoreError> {
        let mut stats = self.get_quiz_stats()?;
        stats.total_answered += summary.answered;
        stats.total_correct += summary.correct;
        stats.highest_streak = stats.highest_streak.max(summary.best_streak);
        stats.total_xp += summary.xp;
        stats.completed_quizzes += 1;

        let unlocked = evaluate_achievements(&mut stats);
        self.save_quiz_stats(&stats)?;

        info!(
            "Recorded {} session '{}': +{} XP, {} new achievements",
            summary.game_type,
            summary.quiz_id,
            summary.xp,
            unlocked.len()
        );
        Ok(unlocked)
    }

    /// Forget all completions and stats
    pub fn reset_progress(&mut self) -> Result<(), StoreError> {
        self.store.remove(COMPLETED_QUIZZES_KEY)?;
        self.store.remove(QUIZ_STATS_KEY)
    }
}

/// Add newly satisfied achievements to `stats`, returning their ids
pub fn evaluate_achievements(stats: &mut QuizStats) -> Vec<String> {
    let unlocked: Vec<String> = ACHIEVEMENTS
        .iter()
        .filter(|a| !stats.achievements.iter().any(|have| have == a.id))
        .filter(|a| a.is_unlocked(stats))
        .map(|a| a.id.to_string())
        .collect();
    stats.achievements.extend(unlocked.iter().cloned());
    unlocked
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
fn open_progress(db_path: &str) -> PyResult<ProgressStore<crate::store::SqliteStore>> {
    crate::store::SqliteStore::open(db_path)
        .map(ProgressStore::new)
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))
}

#[cfg(feature = "python")]
fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value)
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "get_quiz_stats")]
pub fn py_get_quiz_stats(db_path: &str) -> PyResult<String> {
    let stats = open_progress(db_path)?
        .get_quiz_stats()
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))?;
    to_json(&stats)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "get_completed_quizzes")]
pub fn py_get_completed_quizzes(db_path: &str) -> PyResult<String> {
    let completed = open_progress(db_path)?
        .get_completed_quizzes()
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))?;
    to_json(&completed)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "record_session")]
#[allow(clippy::too_many_arguments)]
pub fn py_record_session(
    db_path: &str,
    quiz_id: &str,
    game_type: &str,
    answered: u32,
    correct: u32,
    best_streak: u32,
    xp: u32,
    score: u32,
) -> PyResult<Vec<String>> {
    let game_type: GameType = game_type
        .parse()
        .map_err(|e: crate::error::ValidationError| {
            pyo3::exceptions::PyValueError::new_err(e.to_string())
        })?;
    let summary = SessionSummary {
        quiz_id: quiz_id.to_string(),
        game_type,
        answered,
        correct,
        best_streak,
        xp,
        score,
    };
    open_progress(db_path)?
        .record_session(&summary)
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "reset_progress")]
pub fn py_reset_progress(db_path: &str) -> PyResult<()> {
    open_progress(db_path)?
        .reset_progress()
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn completed(quiz_id: &str, score: u32) -> CompletedQuiz {
        CompletedQuiz {
            quiz_id: quiz_id.to_string(),
            completed_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            score,
            total_questions: 8,
            user_answers: vec![UserQuizAnswer {
                question_id: 1,
                selected_concept: "frontal-lobe".to_string(),
                is_correct: true,
            }],
        }
    }

    fn summary(xp: u32, best_streak: u32) -> SessionSummary {
        SessionSummary {
            quiz_id: "brain-quiz".to_string(),
            game_type: GameType::Quiz,
            answered: 8,
            correct: 6,
            best_streak,
            xp,
            score: 6,
        }
    }

    #[test]
    fn stats_round_trip() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        let stats = QuizStats {
            total_answered: 12,
            total_correct: 9,
            highest_streak: 4,
            total_xp: 130,
            completed_quizzes: 2,
            achievements: vec!["first-game".to_string(), "xp-100".to_string()],
        };
        progress.save_quiz_stats(&stats).unwrap();
        assert_eq!(progress.get_quiz_stats().unwrap(), stats);
    }

    #[test]
    fn stats_use_the_local_storage_field_names() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        progress.save_quiz_stats(&QuizStats::default()).unwrap();
        let raw = progress.into_inner().get(QUIZ_STATS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("totalXP").is_some());
        assert!(value.get("highestStreak").is_some());
    }

    #[test]
    fn later_completion_overwrites_earlier_one() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        progress.save_completed_quiz(completed("brain-quiz", 3)).unwrap();
        progress.save_completed_quiz(completed("other", 1)).unwrap();
        progress.save_completed_quiz(completed("brain-quiz", 7)).unwrap();

        let all = progress.get_completed_quizzes().unwrap();
        assert_eq!(all.iter().filter(|c| c.quiz_id == "brain-quiz").count(), 1);
        assert_eq!(progress.get_completed_quiz("brain-quiz").unwrap().unwrap().score, 7);
        assert!(progress.is_quiz_completed("other").unwrap());
        assert!(!progress.is_quiz_completed("missing").unwrap());
    }

    #[test]
    fn missing_or_corrupt_stats_read_as_defaults() {
        let mut store = MemoryStore::new();
        store.set(QUIZ_STATS_KEY, "not json").unwrap();
        let progress = ProgressStore::new(store);
        assert_eq!(progress.get_quiz_stats().unwrap(), QuizStats::default());
        assert!(progress.get_completed_quizzes().unwrap().is_empty());
    }

    #[test]
    fn sessions_accumulate_and_unlock_achievements_once() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        let first = progress.record_session(&summary(60, 5)).unwrap();
        assert_eq!(first, vec!["first-game".to_string(), "streak-5".to_string()]);

        let second = progress.record_session(&summary(60, 2)).unwrap();
        assert_eq!(second, vec!["xp-100".to_string()]);

        let stats = progress.get_quiz_stats().unwrap();
        assert_eq!(stats.total_answered, 16);
        assert_eq!(stats.total_correct, 12);
        assert_eq!(stats.highest_streak, 5);
        assert_eq!(stats.total_xp, 120);
        assert_eq!(stats.completed_quizzes, 2);
        assert_eq!(stats.achievements.len(), 3);
        assert_eq!(stats.accuracy_percent(), 75.0);
    }

    #[test]
    fn reset_clears_both_records() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        progress.save_completed_quiz(completed("brain-quiz", 3)).unwrap();
        progress.record_session(&summary(10, 1)).unwrap();
        progress.reset_progress().unwrap();
        assert!(progress.get_completed_quizzes().unwrap().is_empty());
        assert_eq!(progress.get_quiz_stats().unwrap(), QuizStats::default());
    }
}
