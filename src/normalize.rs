//! Normalization of remote descriptors into canonical modules
//!
//! Every game type ends up as a `QuizDataModule`. Matching and flashcard games
//! get synthetic concepts built from their items plus one placeholder question.

use log::debug;
use std::collections::HashSet;

use crate::descriptor::GameDescriptor;
use crate::error::ValidationError;
use crate::model::{Concept, Flashcard, GameType, MatchingPair, QuizDataModule, QuizQuestion};

const PLACEHOLDER_OPTIONS: usize = 4;

/// What to do when a matching/flashcard descriptor lacks its item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Missing items are a validation error
    Strict,
    /// Build items from `concepts`, or a single placeholder item
    #[default]
    Lenient,
}

/// Convert a descriptor into a registered module under `module_id`
pub fn normalize_descriptor(
    descriptor: &GameDescriptor,
    module_id: &str,
    policy: FallbackPolicy,
) -> Result<QuizDataModule, ValidationError> {
    let module = match descriptor.resolve_type()? {
        GameType::Quiz => transform_quiz(descriptor, module_id)?,
        GameType::Matching => transform_matching(descriptor, module_id, policy)?,
        GameType::Flashcard => transform_flashcard(descriptor, module_id, policy)?,
    };
    validate_module(&module)?;
    debug!(
        "Normalized '{}' as {} ({} concepts)",
        module.id,
        module.game_type,
        module.concepts.len()
    );
    Ok(module)
}

pub fn transform_quiz(
    descriptor: &GameDescriptor,
    module_id: &str,
) -> Result<QuizDataModule, ValidationError> {
    let questions = descriptor
        .questions
        .clone()
        .ok_or(ValidationError::MissingField("questions"))?;
    let concepts = descriptor
        .concepts
        .clone()
        .ok_or(ValidationError::MissingField("concepts"))?;

    Ok(QuizDataModule {
        id: module_id.to_string(),
        title: descriptor.title.clone(),
        description: descriptor.description.clone(),
        game_type: GameType::Quiz,
        questions,
        concepts,
        pairs: Vec::new(),
        cards: Vec::new(),
        icon: descriptor.icon.clone(),
        image: descriptor.image.clone(),
    })
}

pub fn transform_matching(
    descriptor: &GameDescriptor,
    module_id: &str,
    policy: FallbackPolicy,
) -> Result<QuizDataModule, ValidationError> {
    let pairs = matching_pairs(descriptor, policy)?;
    let concepts: Vec<Concept> = pairs
        .iter()
        .map(|p| Concept {
            id: p.id.clone(),
            name: p.term.clone(),
            description: p.definition.clone(),
        })
        .collect();
    let question = placeholder_question(&concepts, "Match each term with its definition");

    Ok(QuizDataModule {
        id: module_id.to_string(),
        title: descriptor.title.clone(),
        description: descriptor.description.clone(),
        game_type: GameType::Matching,
        questions: vec![question],
        concepts,
        pairs,
        cards: Vec::new(),
        icon: descriptor.icon.clone(),
        image: descriptor.image.clone(),
    })
}

pub fn transform_flashcard(
    descriptor: &GameDescriptor,
    module_id: &str,
    policy: FallbackPolicy,
) -> Result<QuizDataModule, ValidationError> {
    let cards = flashcards(descriptor, policy)?;
    let concepts: Vec<Concept> = cards
        .iter()
        .map(|c| Concept {
            id: c.id.clone(),
            name: c.front.clone(),
            description: c.back.clone(),
        })
        .collect();
    let question = placeholder_question(&concepts, "Review each card");

    Ok(QuizDataModule {
        id: module_id.to_string(),
        title: descriptor.title.clone(),
        description: descriptor.description.clone(),
        game_type: GameType::Flashcard,
        questions: vec![question],
        concepts,
        pairs: Vec::new(),
        cards,
        icon: descriptor.icon.clone(),
        image: descriptor.image.clone(),
    })
}

/// Pairs of a matching descriptor, applying the fallback policy
pub fn matching_pairs(
    descriptor: &GameDescriptor,
    policy: FallbackPolicy,
) -> Result<Vec<MatchingPair>, ValidationError> {
    if let Some(pairs) = descriptor.pairs.as_ref().filter(|p| !p.is_empty()) {
        ensure_unique_ids("pairs", pairs.iter().map(|p| p.id.as_str()))?;
        return Ok(pairs.clone());
    }
    if policy == FallbackPolicy::Strict {
        return Err(missing_items(descriptor.pairs.is_some(), "pairs"));
    }
    let pairs = match descriptor.concepts.as_ref().filter(|c| !c.is_empty()) {
        Some(concepts) => concepts
            .iter()
            .map(|c| MatchingPair {
                id: c.id.clone(),
                term: c.name.clone(),
                definition: c.description.clone(),
            })
            .collect(),
        None => vec![MatchingPair {
            id: "placeholder".to_string(),
            term: "No terms available".to_string(),
            definition: "This game has no matching pairs yet".to_string(),
        }],
    };
    ensure_unique_ids("pairs", pairs.iter().map(|p| p.id.as_str()))?;
    debug!("Descriptor '{}' has no pairs, using fallback", descriptor.id);
    Ok(pairs)
}

/// Cards of a flashcard descriptor, applying the fallback policy
pub fn flashcards(
    descriptor: &GameDescriptor,
    policy: FallbackPolicy,
) -> Result<Vec<Flashcard>, ValidationError> {
    if let Some(cards) = descriptor.cards.as_ref().filter(|c| !c.is_empty()) {
        ensure_unique_ids("cards", cards.iter().map(|c| c.id.as_str()))?;
        return Ok(cards.clone());
    }
    if policy == FallbackPolicy::Strict {
        return Err(missing_items(descriptor.cards.is_some(), "cards"));
    }
    let cards = match descriptor.concepts.as_ref().filter(|c| !c.is_empty()) {
        Some(concepts) => concepts
            .iter()
            .map(|c| Flashcard {
                id: c.id.clone(),
                front: c.name.clone(),
                back: c.description.clone(),
                category: None,
            })
            .collect(),
        None => vec![Flashcard {
            id: "placeholder".to_string(),
            front: "No cards available".to_string(),
            back: "This deck has no cards yet".to_string(),
            category: None,
        }],
    };
    ensure_unique_ids("cards", cards.iter().map(|c| c.id.as_str()))?;
    debug!("Descriptor '{}' has no cards, using fallback", descriptor.id);
    Ok(cards)
}

/// Items are completed by id, so a repeated id would never let a game finish
pub fn ensure_unique_ids<'a>(
    field: &'static str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                field,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn missing_items(present: bool, field: &'static str) -> ValidationError {
    if present {
        ValidationError::Empty(field)
    } else {
        ValidationError::MissingField(field)
    }
}

fn placeholder_question(concepts: &[Concept], prompt: &str) -> QuizQuestion {
    let options: Vec<String> = concepts
        .iter()
        .take(PLACEHOLDER_OPTIONS)
        .map(|c| c.id.clone())
        .collect();
    QuizQuestion {
        id: 1,
        question: prompt.to_string(),
        explanation: String::new(),
        correct_concept: options.first().cloned().unwrap_or_default(),
        options,
    }
}

/// Check that a module is playable and every question resolves inside it
pub fn validate_module(module: &QuizDataModule) -> Result<(), ValidationError> {
    if module.concepts.is_empty() {
        return Err(ValidationError::Empty("concepts"));
    }
    if module.questions.is_empty() {
        return Err(ValidationError::Empty("questions"));
    }

    let known: HashSet<&str> = module.concepts.iter().map(|c| c.id.as_str()).collect();
    for q in &module.questions {
        if !known.contains(q.correct_concept.as_str()) {
            return Err(ValidationError::UnknownConcept {
                question: q.id,
                concept: q.correct_concept.clone(),
            });
        }
        if let Some(unknown) = q.options.iter().find(|o| !known.contains(o.as_str())) {
            return Err(ValidationError::UnknownConcept {
                question: q.id,
                concept: unknown.clone(),
            });
        }
        if !q.options.contains(&q.correct_concept) {
            return Err(ValidationError::CorrectNotInOptions(q.id));
        }
    }
    Ok(())
}
