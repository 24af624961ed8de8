/*
[INPUT]:  Questionnaire form fields, focus, submit status
[OUTPUT]: Scrolling questionnaire with the focused field highlighted and a Submit button
[POS]:    TUI UI questions screen
[UPDATE]: When question kinds or their rendering change
*/

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use drawtest_wizard::answers::ScaleLevel;
use drawtest_wizard::questionnaire::QuestionType;
use drawtest_wizard::store::PhaseStatus;

use crate::tui::app::AppState;
use crate::tui::forms::{FieldState, QuestionField};
use crate::tui::runtime::{border_style, error_style, focus_style};

fn hint(field: &QuestionField) -> String {
    match (&field.state, field.question.kind) {
        (FieldState::Choice { .. }, _) => format!("[{}]", field.question.options.join(" / ")),
        (FieldState::Scale(_), _) => {
            let labels = ScaleLevel::all()
                .map(|level| format!("{}={}", level.get(), level.label()))
                .collect::<Vec<_>>();
            format!("[{}]", labels.join(", "))
        }
        (FieldState::Text(_), QuestionType::Date) => "[YYYY-MM-DD]".to_string(),
        (FieldState::Text(_), _) => String::new(),
    }
}

fn field_lines(field: &QuestionField, focused: bool, previous_section: Option<&str>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if previous_section != Some(field.section.as_str()) {
        lines.push(Line::from(Span::styled(
            field.section.clone(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
    }

    let marker = if field.question.required { " *" } else { "" };
    lines.push(Line::from(format!("{}{marker}", field.question.prompt)));

    let value_style = if focused {
        focus_style()
    } else {
        Style::default()
    };
    let value = field.display_value();
    let shown = if value.is_empty() { "_".to_string() } else { value };
    lines.push(Line::from(vec![
        Span::raw("  > "),
        Span::styled(shown, value_style),
        Span::raw(format!("  {}", hint(field))),
    ]));
    lines
}

pub(in crate::tui) fn draw_questions(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &AppState,
) {
    let form = &app.questions;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut focus_line = 0usize;
    let mut previous_section: Option<&str> = None;

    for (index, field) in form.fields().iter().enumerate() {
        let focused = index == form.focus();
        let block = field_lines(field, focused, previous_section);
        if focused {
            focus_line = lines.len() + block.len().saturating_sub(1);
        }
        lines.extend(block);
        previous_section = Some(field.section.as_str());
    }

    lines.push(Line::from(""));
    let button_style = if form.submit_focused() {
        focus_style()
    } else {
        Style::default()
    };
    let mut footer = vec![Span::styled(" Submit ".to_string(), button_style)];
    match app.task.submit_status {
        PhaseStatus::Loading => footer.push(Span::raw("  submitting...")),
        PhaseStatus::Failed => footer.push(Span::styled(
            format!("  {}", app.task.error.clone().unwrap_or_default()),
            error_style(),
        )),
        PhaseStatus::Idle | PhaseStatus::Succeeded => {}
    }
    if form.submit_focused() {
        focus_line = lines.len();
    }
    lines.push(Line::from(footer));

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = focus_line.saturating_sub(visible.saturating_sub(2));
    let title = app.workflow.questionnaire().title.clone();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(format!("{title} (* required)")),
        )
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::tui::app::AppState;
    use crate::tui::app::tests::Harness;

    fn render_questions(app: &AppState, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, height)).expect("terminal");
        terminal
            .draw(|frame| super::draw_questions(frame, Rect::new(0, 0, 110, height), app))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_first_questions_visible() {
        let mut harness = Harness::new();
        harness.app.questions.handle_key(KeyCode::Char('M'));

        let text = render_questions(&harness.app, 30);

        assert!(text.contains("Child development questionnaire (* required)"));
        assert!(text.contains("General information"));
        assert!(text.contains("Child's name *"));
        assert!(text.contains("> M"));
        assert!(text.contains("[YYYY-MM-DD]"));
        assert!(text.contains("[Boy / Girl]"));
    }

    #[tokio::test]
    async fn test_scrolls_to_submit() {
        let mut harness = Harness::new();
        harness.app.questions.handle_key(KeyCode::BackTab);

        let text = render_questions(&harness.app, 12);

        assert!(text.contains(" Submit "));
        assert!(!text.contains("General information"));
    }
}
