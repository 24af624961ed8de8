/*
[INPUT]:  Task state (report status, url, error, answers), polling activity
[OUTPUT]: Results screen with report status, inline error panel, short analysis and actions
[POS]:    TUI UI results screen
[UPDATE]: When report states or result actions change
*/

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use drawtest_wizard::report::{emotional_findings, self_regulation_findings, social_findings};
use drawtest_wizard::store::ReportStatus;

use crate::tui::app::AppState;
use crate::tui::runtime::{border_style, error_style};

fn status_line(app: &AppState) -> Line<'static> {
    let (label, style) = match app.task.report_status {
        ReportStatus::Idle => ("waiting", Style::default()),
        ReportStatus::Processing => ("generating report", Style::default().fg(Color::Yellow)),
        ReportStatus::Ready => ("ready", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        ReportStatus::Failed => ("failed", error_style()),
    };
    let mut spans = vec![Span::raw("Report: "), Span::styled(label, style)];
    if app.task.report_check_in_flight {
        spans.push(Span::raw("  (checking...)"));
    } else if app.is_polling() {
        spans.push(Span::raw("  (auto-refresh on)"));
    }
    Line::from(spans)
}

pub(in crate::tui) fn draw_results(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &AppState,
) {
    let failed = app.task.report_status == ReportStatus::Failed;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(if failed { 4 } else { 0 }),
            Constraint::Min(3),
        ])
        .split(area);

    let task_id = app.task.task_id.clone().unwrap_or_else(|| "-".to_string());
    let url = app
        .task
        .report_url
        .clone()
        .unwrap_or_else(|| "not available yet".to_string());
    let summary = Paragraph::new(vec![
        status_line(app),
        Line::from(format!("Task: {task_id}")),
        Line::from(format!("Report URL: {url}")),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Results"),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(summary, rows[0]);

    if failed {
        let message = app
            .task
            .error
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string());
        let panel = Paragraph::new(vec![
            Line::from(Span::styled(message, error_style())),
            Line::from("Press [r] to check again."),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Error"),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(panel, rows[1]);
    }

    let answers = &app.task.answers;
    let mut lines = Vec::new();
    for (title, findings) in [
        ("Emotional sphere", emotional_findings(answers)),
        ("Social interaction", social_findings(answers)),
        ("Self-regulation", self_regulation_findings(answers)),
    ] {
        lines.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if findings.is_empty() {
            lines.push(Line::from("  No notable findings."));
        }
        lines.extend(findings.into_iter().map(|finding| Line::from(format!("  {finding}"))));
    }
    let analysis = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Short analysis"),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(analysis, rows[2]);
}
