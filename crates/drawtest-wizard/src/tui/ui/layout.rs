/*
[INPUT]:  Current wizard screen
[OUTPUT]: Step header showing where the user is in the wizard
[POS]:    TUI UI layout helpers
[UPDATE]: When screens are added or renamed
*/

use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Tabs};

use drawtest_wizard::Screen;

use crate::tui::runtime::{border_style, header_style};

pub(in crate::tui) fn draw_steps(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    current: Screen,
) {
    let titles = Screen::ALL
        .iter()
        .map(|screen| Line::from(format!("{}. {}", screen.index() + 1, screen.title())))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Drawing test"),
        )
        .highlight_style(header_style())
        .select(current.index());

    frame.render_widget(tabs, area);
}
