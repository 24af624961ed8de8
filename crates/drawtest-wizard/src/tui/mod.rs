/*
[INPUT]:  Wizard workflow, download client, settings and log buffer
[OUTPUT]: Ratatui-based wizard: step header, screens, logs panel, hotkeys
[POS]:    TUI module for the drawtest-wizard binary
[UPDATE]: When adding TUI submodules or public entry points
*/

mod app;
mod events;
mod forms;
mod runtime;
mod terminal;
mod ui;

pub use app::AppSettings;
pub use runtime::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory, run_tui_with_log};
