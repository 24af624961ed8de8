/*
[INPUT]:  Crossterm key events and the current wizard screen
[OUTPUT]: Form edits and wizard actions dispatched on AppState
[POS]:    TUI key routing per screen
[UPDATE]: When changing keybindings
*/

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use drawtest_wizard::Screen;

use super::app::AppState;
use super::forms::UploadKey;

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(super) async fn handle_key_event(app: &mut AppState, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    if key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
    {
        return true;
    }

    match app.router.current() {
        Screen::Welcome => match key.code {
            KeyCode::Char('q') => true,
            KeyCode::Enter | KeyCode::Char('s') => {
                app.start();
                false
            }
            _ => false,
        },
        Screen::Upload => {
            match app.upload.handle_key(key.code) {
                UploadKey::Load(category, path) => app.load_slot(category, &path).await,
                UploadKey::Clear(category) => app.clear_slot(category),
                UploadKey::Upload => app.begin_upload(),
                UploadKey::None => {}
            }
            false
        }
        Screen::Questions => {
            if app.questions.handle_key(key.code) {
                app.begin_submit();
            }
            false
        }
        Screen::Results => match key.code {
            KeyCode::Char('q') => true,
            KeyCode::Char('r') => {
                app.retry_status_check();
                false
            }
            KeyCode::Char('d') => {
                app.download_report();
                false
            }
            KeyCode::Char('e') => {
                app.export_summary();
                false
            }
            KeyCode::Char('n') => {
                app.restart();
                false
            }
            _ => false,
        },
    }
}
