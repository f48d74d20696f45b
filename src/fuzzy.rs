//! Grading of typed flashcard recall against the card back

use strsim::{jaro_winkler, levenshtein, normalized_levenshtein};

use crate::config::FlashcardSettings;

/// How close a typed answer came to the card back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallGrade {
    Exact,
    /// Passed the recall threshold despite typos
    Close,
    /// Failed, but only `typos` edits away
    NearMiss { typos: usize },
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecallResult {
    pub grade: RecallGrade,
    pub similarity: f64,
}

impl RecallResult {
    pub fn is_correct(&self) -> bool {
        matches!(self.grade, RecallGrade::Exact | RecallGrade::Close)
    }
}

/// Lowercase, punctuation dropped, whitespace collapsed
fn normalize_answer(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Blend of normalized Levenshtein and Jaro-Winkler, weighted by `levenshtein_weight`
pub fn answer_similarity(input: &str, expected: &str, levenshtein_weight: f64) -> f64 {
    let weight = levenshtein_weight.clamp(0.0, 1.0);
    normalized_levenshtein(input, expected) * weight
        + jaro_winkler(input, expected) * (1.0 - weight)
}

pub fn grade_recall(input: &str, expected: &str, settings: &FlashcardSettings) -> RecallResult {
    let input = normalize_answer(input);
    let expected = normalize_answer(expected);

    if input.is_empty() {
        return RecallResult {
            grade: RecallGrade::Miss,
            similarity: 0.0,
        };
    }
    if input == expected {
        return RecallResult {
            grade: RecallGrade::Exact,
            similarity: 1.0,
        };
    }

    let similarity = answer_similarity(&input, &expected, settings.levenshtein_weight);
    let grade = if similarity >= settings.recall_threshold {
        RecallGrade::Close
    } else if similarity >= settings.near_miss_threshold {
        RecallGrade::NearMiss {
            typos: levenshtein(&input, &expected),
        }
    } else {
        RecallGrade::Miss
    };
    RecallResult { grade, similarity }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(input: &str, expected: &str) -> RecallResult {
        grade_recall(input, expected, &FlashcardSettings::default())
    }

    #[test]
    fn case_punctuation_and_spacing_are_ignored() {
        let r = grade("  graduate-record   examination.", "Graduate Record Examination");
        assert_eq!(r.grade, RecallGrade::Exact);
        assert!(r.is_correct());
    }

    #[test]
    fn small_typo_is_close() {
        let r = grade("Statement of purpse", "Statement of purpose");
        assert_eq!(r.grade, RecallGrade::Close, "{:?}", r);
    }

    #[test]
    fn blank_answer_is_a_miss() {
        let r = grade("  ?! ", "Letter of Recommendation");
        assert_eq!(r.grade, RecallGrade::Miss);
        assert_eq!(r.similarity, 0.0);
    }

    #[test]
    fn unrelated_answer_fails() {
        let r = grade("banana", "Letter of recommendation");
        assert!(!r.is_correct());
    }

    #[test]
    fn stricter_threshold_turns_close_into_near_miss() {
        let settings = FlashcardSettings {
            recall_threshold: 0.99,
            ..Default::default()
        };
        let r = grade_recall("Statement of purpse", "Statement of purpose", &settings);
        assert_eq!(r.grade, RecallGrade::NearMiss { typos: 1 });
    }

    #[test]
    fn weight_selects_the_metric() {
        // Jaro-Winkler rewards the shared prefix more than edit distance does
        let lev = answer_similarity("fellowshipx", "fellowship program", 1.0);
        let jw = answer_similarity("fellowshipx", "fellowship program", 0.0);
        assert!(jw > lev);
    }
}
