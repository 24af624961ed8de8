/*
[INPUT]:  Questionnaire title
[OUTPUT]: Welcome screen explaining the three steps
[POS]:    TUI UI welcome screen
[UPDATE]: When the wizard's steps change
*/

use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::tui::app::AppState;
use crate::tui::runtime::border_style;

pub(in crate::tui) fn draw_welcome(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &AppState,
) {
    let title = app.workflow.questionnaire().title.clone();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Psychological analysis of children's drawings", bold)),
        Line::from(""),
        Line::from("1. Pick three drawings: house-tree-person, a nonexistent animal, a self-portrait."),
        Line::from(format!("2. Answer the questionnaire ({title}).")),
        Line::from("3. Wait for the report and download it."),
        Line::from(""),
        Line::from("Press [Enter] to begin."),
    ];

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Welcome"),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use crate::tui::app::tests::Harness;
    use crate::tui::ui::render_text;

    #[tokio::test]
    async fn test_renders_welcome_and_steps() {
        let harness = Harness::new();

        let text = render_text(&harness.app);

        assert!(text.contains("Press [Enter] to begin."));
        assert!(text.contains("1. Welcome"));
        assert!(text.contains("4. Results"));
        assert!(text.contains("Status: Ready"));
    }
}
