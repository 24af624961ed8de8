/*
[INPUT]:  Key codes, questionnaire definition, loaded drawings
[OUTPUT]: Upload and questionnaire form state with focus, editing and collected answers
[POS]:    TUI form state - pure key handling, no I/O
[UPDATE]: When adding field kinds or changing form navigation keys
*/

use std::path::PathBuf;

use crossterm::event::KeyCode;
use drawtest_adapter::{DrawingCategory, ImageFile};
use tui_input::{Input, InputRequest};

use drawtest_wizard::answers::{Answers, ScaleLevel, ValidationIssue, parse_answer};
use drawtest_wizard::questionnaire::{Question, QuestionType, Questionnaire};
use drawtest_wizard::PhotoSlots;

/// Apply an editing key to a text buffer. Returns false for keys that are not edits.
fn edit_input(input: &mut Input, key: KeyCode) -> bool {
    let request = match key {
        KeyCode::Char(ch) => InputRequest::InsertChar(ch),
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return false,
    };
    let _ = input.handle(request);
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum UploadKey {
    Load(DrawingCategory, PathBuf),
    Clear(DrawingCategory),
    Upload,
    None,
}

/// Three path inputs, one per drawing category, followed by the Upload button
#[derive(Debug, Default)]
pub(super) struct UploadForm {
    inputs: [Input; 3],
    focus: usize,
    slots: PhotoSlots,
}

impl UploadForm {
    const BUTTON: usize = 3;

    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn slots(&self) -> &PhotoSlots {
        &self.slots
    }

    pub(super) fn input(&self, category: DrawingCategory) -> &Input {
        &self.inputs[category.index()]
    }

    pub(super) fn focused_category(&self) -> Option<DrawingCategory> {
        DrawingCategory::from_index(self.focus)
    }

    pub(super) fn button_focused(&self) -> bool {
        self.focus == Self::BUTTON
    }

    pub(super) fn assign(&mut self, category: DrawingCategory, image: ImageFile) {
        self.slots.assign(category, image);
    }

    pub(super) fn remove(&mut self, category: DrawingCategory) {
        self.slots.remove(category);
    }

    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(super) fn handle_key(&mut self, key: KeyCode) -> UploadKey {
        match key {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % (Self::BUTTON + 1);
                UploadKey::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + Self::BUTTON) % (Self::BUTTON + 1);
                UploadKey::None
            }
            KeyCode::Enter => match self.focused_category() {
                Some(category) => {
                    let raw = self.inputs[category.index()].value().trim();
                    if raw.is_empty() {
                        UploadKey::Clear(category)
                    } else {
                        UploadKey::Load(category, PathBuf::from(raw))
                    }
                }
                None => UploadKey::Upload,
            },
            other => {
                if let Some(category) = self.focused_category() {
                    edit_input(&mut self.inputs[category.index()], other);
                }
                UploadKey::None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(super) enum FieldState {
    Text(Input),
    Choice { selected: Option<usize> },
    Scale(Option<ScaleLevel>),
}

#[derive(Debug, Clone)]
pub(super) struct QuestionField {
    pub(super) section: String,
    pub(super) question: Question,
    pub(super) state: FieldState,
}

impl QuestionField {
    fn new(section: &str, question: &Question) -> Self {
        let state = match question.kind {
            QuestionType::Radio => FieldState::Choice { selected: None },
            QuestionType::Scale => FieldState::Scale(None),
            QuestionType::Text | QuestionType::Textarea | QuestionType::Date => {
                FieldState::Text(Input::default())
            }
        };
        Self {
            section: section.to_string(),
            question: question.clone(),
            state,
        }
    }

    /// Raw text as the answer parser expects it
    pub(super) fn raw_value(&self) -> String {
        match &self.state {
            FieldState::Text(input) => input.value().to_string(),
            FieldState::Choice { selected } => selected
                .and_then(|index| self.question.options.get(index))
                .cloned()
                .unwrap_or_default(),
            FieldState::Scale(level) => level.map(|level| level.get().to_string()).unwrap_or_default(),
        }
    }

    /// What the field shows
    pub(super) fn display_value(&self) -> String {
        match &self.state {
            FieldState::Scale(Some(level)) => format!("{} ({})", level.get(), level.label()),
            _ => self.raw_value(),
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let option_count = self.question.options.len();
        match &mut self.state {
            FieldState::Text(input) => {
                edit_input(input, key);
            }
            FieldState::Choice { selected } if option_count > 0 => match key {
                KeyCode::Right | KeyCode::Char(' ') => {
                    *selected = Some(selected.map_or(0, |index| (index + 1) % option_count));
                }
                KeyCode::Left => {
                    *selected = Some(
                        selected.map_or(option_count - 1, |index| {
                            (index + option_count - 1) % option_count
                        }),
                    );
                }
                _ => {}
            },
            FieldState::Choice { .. } => {}
            FieldState::Scale(level) => match key {
                KeyCode::Char(ch) => {
                    if let Some(next) = ch
                        .to_digit(10)
                        .and_then(|digit| u8::try_from(digit).ok())
                        .and_then(ScaleLevel::new)
                    {
                        *level = Some(next);
                    }
                }
                KeyCode::Right => {
                    let value = level.map_or(ScaleLevel::MIN, |current| {
                        (current.get() + 1).min(ScaleLevel::MAX)
                    });
                    *level = ScaleLevel::new(value);
                }
                KeyCode::Left => {
                    let value = level.map_or(ScaleLevel::MIN, |current| {
                        current.get().saturating_sub(1).max(ScaleLevel::MIN)
                    });
                    *level = ScaleLevel::new(value);
                }
                KeyCode::Backspace | KeyCode::Delete => *level = None,
                _ => {}
            },
        }
    }
}

/// Every question in order, followed by the Submit button
#[derive(Debug, Clone)]
pub(super) struct QuestionsForm {
    fields: Vec<QuestionField>,
    focus: usize,
}

impl QuestionsForm {
    pub(super) fn new(questionnaire: &Questionnaire) -> Self {
        let fields = questionnaire
            .sections
            .iter()
            .flat_map(|section| {
                section
                    .questions
                    .iter()
                    .map(move |question| QuestionField::new(&section.title, question))
            })
            .collect();
        Self { fields, focus: 0 }
    }

    pub(super) fn fields(&self) -> &[QuestionField] {
        &self.fields
    }

    pub(super) fn focus(&self) -> usize {
        self.focus
    }

    pub(super) fn submit_focused(&self) -> bool {
        self.focus == self.fields.len()
    }

    fn positions(&self) -> usize {
        self.fields.len() + 1
    }

    /// Returns true when Submit was pressed
    pub(super) fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.positions();
                false
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.positions() - 1) % self.positions();
                false
            }
            KeyCode::Enter if self.submit_focused() => true,
            KeyCode::Enter => {
                self.focus = (self.focus + 1) % self.positions();
                false
            }
            other => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.handle_key(other);
                }
                false
            }
        }
    }

    /// Parse every filled field; the first unparsable one moves focus to itself
    pub(super) fn collect(&mut self) -> Result<Answers, ValidationIssue> {
        let mut answers = Answers::new();
        for (index, field) in self.fields.iter().enumerate() {
            match parse_answer(&field.question, &field.raw_value()) {
                Ok(Some(value)) => {
                    answers.set(field.question.id.clone(), value);
                }
                Ok(None) => {}
                Err(issue) => {
                    self.focus = index;
                    return Err(issue);
                }
            }
        }
        Ok(answers)
    }

    pub(super) fn focus_question(&mut self, id: &str) {
        if let Some(index) = self.fields.iter().position(|field| field.question.id == id) {
            self.focus = index;
        }
    }

    pub(super) fn reset(&mut self, questionnaire: &Questionnaire) {
        *self = Self::new(questionnaire);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawtest_wizard::AnswerValue;

    fn type_text(form: &mut QuestionsForm, text: &str) {
        for ch in text.chars() {
            form.handle_key(KeyCode::Char(ch));
        }
    }

    #[test]
    fn test_upload_focus_cycles_through_button() {
        let mut form = UploadForm::new();
        assert_eq!(form.focused_category(), Some(DrawingCategory::HouseTreePerson));

        form.handle_key(KeyCode::BackTab);
        assert!(form.button_focused());
        assert_eq!(form.handle_key(KeyCode::Enter), UploadKey::Upload);

        form.handle_key(KeyCode::Tab);
        assert_eq!(form.focused_category(), Some(DrawingCategory::HouseTreePerson));
    }

    #[test]
    fn test_upload_enter_loads_or_clears() {
        let mut form = UploadForm::new();
        form.handle_key(KeyCode::Tab);
        assert_eq!(
            form.handle_key(KeyCode::Enter),
            UploadKey::Clear(DrawingCategory::NonexistentAnimal)
        );

        for ch in "cat.png".chars() {
            form.handle_key(KeyCode::Char(ch));
        }
        assert_eq!(
            form.handle_key(KeyCode::Enter),
            UploadKey::Load(DrawingCategory::NonexistentAnimal, PathBuf::from("cat.png"))
        );
        assert_eq!(form.input(DrawingCategory::NonexistentAnimal).value(), "cat.png");
        assert_eq!(form.input(DrawingCategory::HouseTreePerson).value(), "");
    }

    #[test]
    fn test_questions_collect_typed_answers() {
        let questionnaire = Questionnaire::builtin().expect("builtin");
        let mut form = QuestionsForm::new(&questionnaire);

        type_text(&mut form, "Masha");
        form.handle_key(KeyCode::Tab);
        type_text(&mut form, "2018-03-05");
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Right);
        form.handle_key(KeyCode::Right);
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Char('4'));

        let answers = form.collect().expect("answers");

        assert_eq!(answers.text("child_name"), Some("Masha"));
        assert_eq!(answers.get("gender"), Some(&AnswerValue::Choice("Girl".into())));
        assert_eq!(answers.scale("joy_frequency"), ScaleLevel::new(4));
        assert!(answers.get("guardian_name").is_none());
    }

    #[test]
    fn test_bad_date_moves_focus() {
        let questionnaire = Questionnaire::builtin().expect("builtin");
        let mut form = QuestionsForm::new(&questionnaire);
        form.handle_key(KeyCode::Tab);
        type_text(&mut form, "05.03.2018");
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Tab);

        let issue = form.collect().expect_err("bad date");

        assert_eq!(issue.question_id(), "birth_date");
        assert_eq!(form.focus(), 1);
    }

    #[test]
    fn test_scale_arrows_clamp() {
        let questionnaire = Questionnaire::builtin().expect("builtin");
        let mut form = QuestionsForm::new(&questionnaire);
        form.focus_question("joy_frequency");

        form.handle_key(KeyCode::Left);
        form.handle_key(KeyCode::Left);
        let field = &form.fields()[form.focus()];
        assert_eq!(field.raw_value(), "1");

        for _ in 0..7 {
            form.handle_key(KeyCode::Right);
        }
        assert_eq!(form.fields()[form.focus()].raw_value(), "5");
    }

    #[test]
    fn test_submit_only_from_button() {
        let questionnaire = Questionnaire::builtin().expect("builtin");
        let mut form = QuestionsForm::new(&questionnaire);
        assert!(!form.handle_key(KeyCode::Enter));

        form.handle_key(KeyCode::BackTab);
        form.handle_key(KeyCode::BackTab);
        assert!(form.submit_focused());
        assert!(form.handle_key(KeyCode::Enter));
    }
}
