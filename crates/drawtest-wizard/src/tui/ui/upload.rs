/*
[INPUT]:  Upload form (slot inputs, loaded drawings), upload status
[OUTPUT]: Upload screen with three category slots and the Upload button
[POS]:    TUI UI upload screen
[UPDATE]: When slot rendering or upload feedback changes
*/

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use drawtest_adapter::DrawingCategory;
use drawtest_wizard::photos::MAX_UPLOAD_BYTES;
use drawtest_wizard::store::PhaseStatus;

use crate::tui::app::AppState;
use crate::tui::runtime::{border_style, error_style, focus_style};

pub(in crate::tui) fn draw_upload(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &AppState,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    for category in DrawingCategory::ALL {
        draw_slot(frame, rows[category.index()], app, category);
    }

    let slots = app.upload.slots();
    let button = Span::styled(
        format!(" Upload ({}/3) ", slots.filled_count()),
        if app.upload.button_focused() {
            focus_style()
        } else {
            Style::default()
        },
    );
    let status = match app.task.upload_status {
        PhaseStatus::Idle => Span::raw(""),
        PhaseStatus::Loading => Span::raw("  uploading..."),
        PhaseStatus::Succeeded => Span::raw("  uploaded, press Enter to continue"),
        PhaseStatus::Failed => Span::styled(
            format!("  {}", app.task.error.as_deref().unwrap_or("upload failed")),
            error_style(),
        ),
    };
    let widget = Paragraph::new(Line::from(vec![button, status])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style()),
    );
    frame.render_widget(widget, rows[3]);
}

fn draw_slot(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &AppState,
    category: DrawingCategory,
) {
    let focused = app.upload.focused_category() == Some(category);
    let input = app.upload.input(category);

    let path_style = if focused {
        focus_style()
    } else {
        Style::default()
    };
    let path_line = Line::from(vec![
        Span::raw("Path: "),
        Span::styled(input.value().to_string(), path_style),
    ]);

    let loaded = match app.upload.slots().get(category) {
        Some(image) if image.len() > MAX_UPLOAD_BYTES || !image.is_accepted_type() => {
            Line::from(Span::styled(
                format!(
                    "Loaded: {} ({} KB, {}) may be rejected by the service",
                    image.file_name,
                    image.len().div_ceil(1024),
                    image.content_type
                ),
                error_style(),
            ))
        }
        Some(image) => Line::from(format!(
            "Loaded: {} ({} KB, {})",
            image.file_name,
            image.len().div_ceil(1024),
            image.content_type
        )),
        None => Line::from("Empty slot"),
    };

    let widget = Paragraph::new(vec![path_line, loaded]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(category.label()),
    );
    frame.render_widget(widget, area);

    if focused {
        let prefix = "Path: ".len() as u16;
        let cursor = input.visual_cursor() as u16;
        let x = (area.x + 1 + prefix + cursor).min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y + 1));
    }
}
