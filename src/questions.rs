//! Multiple-choice question generation from a concept list

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ValidationError;
use crate::model::{Concept, QuizQuestion};

pub const OPTIONS_PER_QUESTION: usize = 4;

/// Build one question per concept, each with three distractor concepts
pub fn generate_questions(concepts: &[Concept]) -> Result<Vec<QuizQuestion>, ValidationError> {
    let mut rng = rand::thread_rng();
    concepts
        .iter()
        .zip(1u32..)
        .map(|(target, id)| generate_mcq(&mut rng, concepts, target, id))
        .collect()
}

/// Generate a question asking which concept a description belongs to
pub fn generate_mcq<R: Rng>(
    rng: &mut R,
    concepts: &[Concept],
    target: &Concept,
    id: u32,
) -> Result<QuizQuestion, ValidationError> {
    if concepts.len() < OPTIONS_PER_QUESTION {
        return Err(ValidationError::NotEnoughConcepts {
            needed: OPTIONS_PER_QUESTION,
            found: concepts.len(),
        });
    }

    let mut distractors: Vec<String> = concepts
        .iter()
        .filter(|c| c.id != target.id)
        .map(|c| c.id.clone())
        .collect();
    distractors.sort();
    distractors.dedup();
    distractors.shuffle(rng);
    distractors.truncate(OPTIONS_PER_QUESTION - 1);

    if distractors.len() < OPTIONS_PER_QUESTION - 1 {
        return Err(ValidationError::NotEnoughConcepts {
            needed: OPTIONS_PER_QUESTION,
            found: distractors.len() + 1,
        });
    }

    // Correct answer goes in a random slot
    let correct_index = rng.gen_range(0..OPTIONS_PER_QUESTION);
    let mut options = distractors;
    options.insert(correct_index, target.id.clone());

    Ok(QuizQuestion {
        id,
        question: format!(
            "Which concept matches: '{}'?",
            target.description.chars().take(100).collect::<String>()
        ),
        explanation: format!("{}: {}", target.name, target.description),
        correct_concept: target.id.clone(),
        options,
    })
}
