/*
[INPUT]:  YAML questionnaire definition (embedded default or user file)
[OUTPUT]: Validated ordered sections of typed questions
[POS]:    Domain layer - questionnaire definition
[UPDATE]: When adding question types or definition fields
*/

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_QUESTIONNAIRE: &str = include_str!("../assets/questionnaire.yaml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Radio,
    Scale,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "question", alias = "prompt")]
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    #[serde(default)]
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Error)]
pub enum QuestionnaireError {
    #[error("failed to read questionnaire {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid questionnaire yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("questionnaire has no questions")]
    Empty,
    #[error("duplicate question id: {0}")]
    DuplicateId(String),
    #[error("radio question {0} has no options")]
    MissingOptions(String),
}

impl Questionnaire {
    /// Questionnaire embedded in the binary
    pub fn builtin() -> Result<Self, QuestionnaireError> {
        Self::from_yaml(DEFAULT_QUESTIONNAIRE)
    }

    pub fn from_yaml(content: &str) -> Result<Self, QuestionnaireError> {
        let questionnaire: Self = serde_yaml::from_str(content)?;
        questionnaire.validate()?;
        Ok(questionnaire)
    }

    pub fn from_file(path: &Path) -> Result<Self, QuestionnaireError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| QuestionnaireError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), QuestionnaireError> {
        let mut seen = HashSet::new();
        for question in self.questions() {
            if !seen.insert(question.id.as_str()) {
                return Err(QuestionnaireError::DuplicateId(question.id.clone()));
            }
            if question.kind == QuestionType::Radio && question.options.is_empty() {
                return Err(QuestionnaireError::MissingOptions(question.id.clone()));
            }
        }
        if seen.is_empty() {
            return Err(QuestionnaireError::Empty);
        }
        Ok(())
    }

    /// All questions in display order
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|question| question.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
