//! Local quiz modules: bundled JSON, module files and concept sheets (Excel and CSV)

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, ValidationError};
use crate::model::{Concept, GameType, QuizDataModule, QuizQuestion};
use crate::questions::generate_questions;

const BRAIN_QUIZ: &str = include_str!("../data/brain-quiz.json");

/// Modules compiled into the crate, by name
const BUNDLED: &[(&str, &str)] = &[("brain-quiz", BRAIN_QUIZ)];

/// Anything that can produce a local module by name
pub trait LocalModuleSource {
    fn load(&self, name: &str) -> Result<QuizDataModule, LoadError>;
}

/// Raw JSON module as authored; either question key is accepted
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModule {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    concepts: Vec<Concept>,
    #[serde(default)]
    questions: Option<Vec<QuizQuestion>>,
    #[serde(default)]
    quiz_questions: Option<Vec<QuizQuestion>>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

/// Parse a JSON module, falling back to `name` when it carries no id
pub fn parse_module_json(name: &str, text: &str) -> Result<QuizDataModule, LoadError> {
    let raw: RawModule = serde_json::from_str(text).map_err(|source| LoadError::Json {
        name: name.to_string(),
        source,
    })?;

    if raw.concepts.is_empty() {
        return Err(ValidationError::Empty("concepts").into());
    }
    let questions = raw
        .questions
        .filter(|q| !q.is_empty())
        .or(raw.quiz_questions.filter(|q| !q.is_empty()))
        .ok_or(ValidationError::Empty("questions"))?;

    Ok(QuizDataModule {
        id: raw.id.filter(|id| !id.is_empty()).unwrap_or_else(|| name.to_string()),
        title: if raw.title.is_empty() { title_from_name(name) } else { raw.title },
        description: raw.description,
        game_type: GameType::Quiz,
        questions,
        concepts: raw.concepts,
        pairs: Vec::new(),
        cards: Vec::new(),
        icon: raw.icon,
        image: raw.image,
    })
}

/// Build a quiz module from a concept list, generating its questions
pub fn module_from_concepts(
    name: &str,
    concepts: Vec<Concept>,
) -> Result<QuizDataModule, LoadError> {
    let questions = generate_questions(&concepts)?;
    Ok(QuizDataModule {
        id: name.to_string(),
        title: title_from_name(name),
        description: format!("{} concepts", concepts.len()),
        game_type: GameType::Quiz,
        questions,
        concepts,
        pairs: Vec::new(),
        cards: Vec::new(),
        icon: None,
        image: None,
    })
}

/// "brain-quiz" -> "Brain Quiz"
fn title_from_name(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Local modules: files in an optional directory first, then the bundled set
#[derive(Debug, Clone, Default)]
pub struct LocalModules {
    dir: Option<PathBuf>,
}

impl LocalModules {
    /// Bundled modules only
    pub fn bundled() -> Self {
        Self { dir: None }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: Some(dir.into()) }
    }

    fn find_file(&self, name: &str) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        ["json", "csv", "xlsx", "xls", "ods"]
            .iter()
            .map(|ext| dir.join(format!("{}.{}", name, ext)))
            .find(|p| p.is_file())
    }
}

impl LocalModuleSource for LocalModules {
    fn load(&self, name: &str) -> Result<QuizDataModule, LoadError> {
        if let Some(path) = self.find_file(name) {
            return load_module_file(&path, name);
        }
        BUNDLED
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .ok_or_else(|| LoadError::NotFound(name.to_string()))
            .and_then(|(_, text)| parse_module_json(name, text))
    }
}

/// Load a module file by extension
pub fn load_module_file(path: &Path, name: &str) -> Result<QuizDataModule, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            })?;
            parse_module_json(name, &text)
        }
        "csv" => module_from_concepts(name, parse_concept_csv(path)?),
        "xlsx" | "xls" | "ods" => module_from_concepts(name, parse_concept_excel(path)?),
        _ => Err(LoadError::UnsupportedFormat(extension)),
    }
}

/// Column index mapping for concept sheets
#[derive(Debug, Default, Clone)]
pub struct ColumnMapping {
    pub id: Option<usize>,
    pub name: usize,
    pub description: usize,
}

/// Detect column indices from header names
fn detect_columns(sheet: &str, headers: &[String]) -> Result<ColumnMapping, LoadError> {
    let mut id = None;
    let mut name = None;
    let mut description = None;

    for (i, header) in headers.iter().enumerate() {
        match header.to_lowercase().trim() {
            "id" => id = Some(i),
            "name" | "term" | "concept" => name = Some(i),
            "description" | "definition" | "meaning" => description = Some(i),
            _ => {}
        }
    }

    let missing = |column: &str| LoadError::Sheet {
        name: sheet.to_string(),
        message: format!("missing required '{}' column in header", column),
    };
    Ok(ColumnMapping {
        id,
        name: name.ok_or_else(|| missing("Name"))?,
        description: description.ok_or_else(|| missing("Description"))?,
    })
}

fn concept_from_row(mapping: &ColumnMapping, row: &[String], index: usize) -> Option<Concept> {
    let cell = |i: usize| row.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
    let name = cell(mapping.name);
    if name.is_empty() {
        return None;
    }
    let id = mapping
        .id
        .map(&cell)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("concept-{}", index + 1));
    Some(Concept {
        id,
        name,
        description: cell(mapping.description),
    })
}

/// Parse concepts from the first sheet of a spreadsheet workbook
pub fn parse_concept_excel(path: &Path) -> Result<Vec<Concept>, LoadError> {
    let sheet_err = |message: String| LoadError::Sheet {
        name: path.display().to_string(),
        message,
    };

    // Format is picked from the extension: xlsx, xlsm, xlsb, xls or ods
    let mut workbook =
        open_workbook_auto(path).map_err(|e| sheet_err(format!("failed to open workbook: {}", e)))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| sheet_err("no sheets found".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| sheet_err(format!("failed to read sheet: {}", e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| sheet_err("empty sheet, no header row".to_string()))?
        .iter()
        .map(get_cell_string)
        .collect();
    let mapping = detect_columns(&path.display().to_string(), &headers)?;

    Ok(rows
        .map(|row| row.iter().map(get_cell_string).collect::<Vec<_>>())
        .enumerate()
        .filter_map(|(i, row)| concept_from_row(&mapping, &row, i))
        .collect())
}

/// Parse concepts from a CSV file with a header row
pub fn parse_concept_csv(path: &Path) -> Result<Vec<Concept>, LoadError> {
    let sheet_err = |e: csv::Error| LoadError::Sheet {
        name: path.display().to_string(),
        message: e.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(sheet_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(sheet_err)?
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mapping = detect_columns(&path.display().to_string(), &headers)?;

    let mut concepts = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(sheet_err)?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        if let Some(concept) = concept_from_row(&mapping, &row, i) {
            concepts.push(concept);
        }
    }
    Ok(concepts)
}

fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}
