/*
[INPUT]:  TUI app state for each wizard screen
[OUTPUT]: Screen and panel render functions and module exports
[POS]:    TUI UI module root
[UPDATE]: When adding screens or shared panels
*/

mod layout;
mod logs;
mod questions;
mod results;
mod upload;
mod welcome;

pub(in crate::tui) use layout::draw_steps;
pub(in crate::tui) use logs::draw_logs;
pub(in crate::tui) use questions::draw_questions;
pub(in crate::tui) use results::draw_results;
pub(in crate::tui) use upload::draw_upload;
pub(in crate::tui) use welcome::draw_welcome;

#[cfg(test)]
pub(in crate::tui) fn render_text(app: &crate::tui::app::AppState) -> String {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let mut terminal = Terminal::new(TestBackend::new(110, 48)).expect("test terminal");
    terminal
        .draw(|frame| crate::tui::runtime::draw_ui(frame, app))
        .expect("draw");
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
