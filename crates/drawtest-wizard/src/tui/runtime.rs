/*
[INPUT]:  Workflow, download client, wizard settings, log buffer, crossterm input
[OUTPUT]: Ratatui-based TUI run loop, rendering, and log buffer utilities
[POS]:    TUI runtime loop and shared helpers
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
[UPDATE]: 2026-10-13 React to store changes through the watch channel
[UPDATE]: 2026-10-14 Deliver background step results as UI events
*/

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::fmt::MakeWriter;

use drawtest_adapter::DrawTestClient;
use drawtest_wizard::{Screen, Workflow};

use super::app::{AppSettings, AppState, Background};
use super::events::handle_key_event;
use super::terminal::TerminalGuard;
use super::ui::*;

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const LOG_BUFFER_CAPACITY: usize = 2000;
const EXIT_AFTER_TICKS_ENV: &str = "DRAWTEST_TUI_TEST_EXIT_AFTER_TICKS";

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// The newest `count` lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<String> {
        let start = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(start).cloned().collect()
    }
}

pub(crate) fn lock_buffer(buffer: &LogBufferHandle) -> std::sync::MutexGuard<'_, LogBuffer> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = String::from_utf8_lossy(buf);
        self.partial.push_str(&chunk);
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial = self.partial[pos + 1..].to_string();
            lock_buffer(&self.buffer).push_line(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            lock_buffer(&self.buffer).push_line(line);
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

pub(super) enum UiEvent {
    Input(CrosstermEvent),
    Background(Background),
}

pub(super) fn draw_footer(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &AppState) {
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let hotkeys: &[(&str, &str)] = match app.router.current() {
        Screen::Welcome => &[("[Enter]", " Start  "), ("[q]", " Quit  ")],
        Screen::Upload => &[
            ("[Tab/Up/Down]", " Focus  "),
            ("[Enter]", " Load slot / Upload  "),
            ("[Esc]", " Quit  "),
        ],
        Screen::Questions => &[
            ("[Tab/Up/Down]", " Focus  "),
            ("[Left/Right]", " Choose  "),
            ("[1-5]", " Scale  "),
            ("[Enter]", " Next / Submit  "),
            ("[Esc]", " Quit  "),
        ],
        Screen::Results => &[
            ("[r]", " Retry  "),
            ("[d]", " Download  "),
            ("[e]", " Export  "),
            ("[n]", " New test  "),
            ("[q]", " Quit  "),
        ],
    };

    let line1 = Line::from(
        hotkeys
            .iter()
            .flat_map(|(key, label)| [Span::styled(*key, key_style), Span::raw(*label)])
            .collect::<Vec<_>>(),
    );
    let line2 = Line::from(Span::raw(format!("Status: {}", app.status_message)));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Hotkeys");
    let text = Text::from(vec![line1, line2]);
    let widget = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn focus_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub(crate) fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

fn exit_after_ticks() -> Option<u64> {
    std::env::var(EXIT_AFTER_TICKS_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
}

pub async fn run_tui_with_log(
    workflow: Arc<Workflow>,
    downloader: Arc<DrawTestClient>,
    settings: AppSettings,
    log_buffer: LogBufferHandle,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    let input_shutdown_clone = input_shutdown.clone();

    let input_tx = event_tx.clone();
    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    let _ = input_tx.send(UiEvent::Input(event));
                }
            }
        }
    });

    let mut store_rx = workflow.store().subscribe();
    let mut app = AppState::new(workflow, downloader, settings, log_buffer, event_tx);

    let exit_after = exit_after_ticks();
    let mut ticks = 0u64;
    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    let mut should_quit = false;

    while !should_quit {
        tokio::select! {
            _ = tick.tick() => {
                ticks += 1;
                app.on_tick();
                if exit_after.is_some_and(|limit| ticks > limit) {
                    should_quit = true;
                }
            }
            changed = store_rx.changed() => {
                if changed.is_ok() {
                    app.sync_task();
                }
            }
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(UiEvent::Input(CrosstermEvent::Key(key))) => {
                        if handle_key_event(&mut app, key).await {
                            should_quit = true;
                        }
                    }
                    Some(UiEvent::Background(result)) => app.on_background(result),
                    Some(UiEvent::Input(_)) | None => {}
                }
            }
        }

        terminal.draw(|frame| draw_ui(frame, &app))?;
    }

    input_shutdown.cancel();
    app.shutdown();
    Ok(())
}

pub(super) fn draw_ui(frame: &mut ratatui::Frame, app: &AppState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(4),
        ])
        .split(area);

    draw_steps(frame, layout[0], app.router.current());

    match app.router.current() {
        Screen::Welcome => draw_welcome(frame, layout[1], app),
        Screen::Upload => draw_upload(frame, layout[1], app),
        Screen::Questions => draw_questions(frame, layout[1], app),
        Screen::Results => draw_results(frame, layout[1], app),
    }

    draw_logs(frame, layout[2], &app.log_buffer);
    draw_footer(frame, layout[3], app);
}
