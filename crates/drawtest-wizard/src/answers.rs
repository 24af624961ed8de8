/*
[INPUT]:  Raw field input from the questions screen, questionnaire definition
[OUTPUT]: Typed answers, validation issues, wire payload for submission
[POS]:    Domain layer - questionnaire answers
[UPDATE]: When adding answer types or changing the wire format
*/

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::questionnaire::{Question, QuestionType, Questionnaire};

/// Five-point frequency scale, 1 = very rarely, 5 = always
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScaleLevel(u8);

const SCALE_LABELS: [&str; 5] = ["Very rarely", "Rarely", "Sometimes", "Often", "Always"];
const SCALE_WIRE_LABELS: [&str; 5] = ["Очень редко", "Редко", "Иногда", "Часто", "Всегда"];

impl ScaleLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = ScaleLevel> {
        (Self::MIN..=Self::MAX).map(ScaleLevel)
    }

    pub fn label(self) -> &'static str {
        SCALE_LABELS[usize::from(self.0 - 1)]
    }

    /// Label the service expects in the survey payload
    pub fn wire_label(self) -> &'static str {
        SCALE_WIRE_LABELS[usize::from(self.0 - 1)]
    }

    pub fn from_wire_label(label: &str) -> Option<Self> {
        SCALE_WIRE_LABELS
            .iter()
            .position(|candidate| *candidate == label)
            .map(|index| Self(index as u8 + 1))
    }
}

impl fmt::Display for ScaleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    Text(String),
    Choice(String),
    Scale(ScaleLevel),
    Date(NaiveDate),
}

impl AnswerValue {
    pub fn to_wire(&self) -> Value {
        match self {
            AnswerValue::Text(text) | AnswerValue::Choice(text) => Value::String(text.clone()),
            AnswerValue::Scale(level) => Value::String(level.wire_label().to_string()),
            AnswerValue::Date(date) => {
                Value::String(date.format("%Y-%m-%dT00:00:00.000Z").to_string())
            }
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, AnswerValue::Text(text) | AnswerValue::Choice(text) if text.trim().is_empty())
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(text) | AnswerValue::Choice(text) => f.write_str(text),
            AnswerValue::Scale(level) => write!(f, "{level}"),
            AnswerValue::Date(date) => write!(f, "{}", date.format("%d.%m.%Y")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("{id}: answer is required")]
    Missing { id: String },
    #[error("{id}: \"{value}\" is not one of the options")]
    UnknownOption { id: String, value: String },
    #[error("{id}: scale level must be between 1 and 5")]
    ScaleOutOfRange { id: String },
    #[error("{id}: \"{value}\" is not a date (expected YYYY-MM-DD)")]
    InvalidDate { id: String, value: String },
    #[error("{id}: date is in the future")]
    FutureDate { id: String },
    #[error("{id}: date is before 1900-01-01")]
    DateTooEarly { id: String },
    #[error("{id}: answer does not match the question type")]
    TypeMismatch { id: String },
}

impl ValidationIssue {
    pub fn question_id(&self) -> &str {
        match self {
            ValidationIssue::Missing { id }
            | ValidationIssue::UnknownOption { id, .. }
            | ValidationIssue::ScaleOutOfRange { id }
            | ValidationIssue::InvalidDate { id, .. }
            | ValidationIssue::FutureDate { id }
            | ValidationIssue::DateTooEarly { id }
            | ValidationIssue::TypeMismatch { id } => id,
        }
    }
}

fn earliest_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parse raw input for a question. Blank input means "no answer".
pub fn parse_answer(question: &Question, raw: &str) -> Result<Option<AnswerValue>, ValidationIssue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let id = question.id.clone();

    let value = match question.kind {
        QuestionType::Text | QuestionType::Textarea => AnswerValue::Text(raw.to_string()),
        QuestionType::Radio => {
            if !question.options.iter().any(|option| option == raw) {
                return Err(ValidationIssue::UnknownOption {
                    id,
                    value: raw.to_string(),
                });
            }
            AnswerValue::Choice(raw.to_string())
        }
        QuestionType::Scale => {
            let level = raw
                .parse::<u8>()
                .ok()
                .and_then(ScaleLevel::new)
                .or_else(|| ScaleLevel::from_wire_label(raw))
                .ok_or(ValidationIssue::ScaleOutOfRange { id })?;
            AnswerValue::Scale(level)
        }
        QuestionType::Date => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ValidationIssue::InvalidDate {
                    id,
                    value: raw.to_string(),
                }
            })?;
            AnswerValue::Date(date)
        }
    };
    Ok(Some(value))
}

/// Collected answers keyed by question id; later answers replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: impl Into<String>, value: AnswerValue) -> Option<AnswerValue> {
        self.0.insert(id.into(), value)
    }

    pub fn remove(&mut self, id: &str) -> Option<AnswerValue> {
        self.0.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        self.0.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(id, value)| (id.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Accumulate another batch; its answers win on conflicts
    pub fn merge(&mut self, other: &Answers) {
        for (id, value) in &other.0 {
            self.0.insert(id.clone(), value.clone());
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.0.get(id) {
            Some(AnswerValue::Text(text)) | Some(AnswerValue::Choice(text)) => Some(text),
            _ => None,
        }
    }

    pub fn scale(&self, id: &str) -> Option<ScaleLevel> {
        match self.0.get(id) {
            Some(AnswerValue::Scale(level)) => Some(*level),
            _ => None,
        }
    }

    pub fn date(&self, id: &str) -> Option<NaiveDate> {
        match self.0.get(id) {
            Some(AnswerValue::Date(date)) => Some(*date),
            _ => None,
        }
    }

    /// Flat JSON object sent with the survey
    pub fn to_payload(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(id, value)| (id.clone(), value.to_wire()))
            .collect()
    }

    /// Check answers against the questionnaire; empty result means submittable
    pub fn validate(&self, questionnaire: &Questionnaire, today: NaiveDate) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for question in questionnaire.questions() {
            let id = question.id.clone();
            let Some(value) = self.0.get(&question.id).filter(|value| !value.is_blank()) else {
                if question.required {
                    issues.push(ValidationIssue::Missing { id });
                }
                continue;
            };

            match (question.kind, value) {
                (QuestionType::Text | QuestionType::Textarea, AnswerValue::Text(_)) => {}
                (QuestionType::Radio, AnswerValue::Choice(choice)) => {
                    if !question.options.contains(choice) {
                        issues.push(ValidationIssue::UnknownOption {
                            id,
                            value: choice.clone(),
                        });
                    }
                }
                (QuestionType::Scale, AnswerValue::Scale(_)) => {}
                (QuestionType::Date, AnswerValue::Date(date)) => {
                    if *date > today {
                        issues.push(ValidationIssue::FutureDate { id });
                    } else if *date < earliest_birth_date() {
                        issues.push(ValidationIssue::DateTooEarly { id });
                    }
                }
                _ => issues.push(ValidationIssue::TypeMismatch { id }),
            }
        }

        issues
    }
}

impl FromIterator<(String, AnswerValue)> for Answers {
    fn from_iter<T: IntoIterator<Item = (String, AnswerValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
