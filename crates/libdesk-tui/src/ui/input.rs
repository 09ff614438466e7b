//! Keyboard input handling for the TUI.
//!
//! Translates key events into `App` calls. Nothing here talks to the server
//! directly; panel actions dispatch their own commands.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Handle one key event. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // A notice is modal until dismissed
    if app.notice().is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return false;
    }

    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::ConfirmingQuit => handle_quit_confirmation(app, key),
        AppState::Editing(_) => {
            handle_editing(app, key);
            false
        }
        AppState::Quitting => true,
        AppState::Normal => handle_normal(app, key),
    }
}

fn handle_quit_confirmation(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.quit();
            true
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
            false
        }
        _ => false,
    }
}

fn handle_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.pop_input(),
        KeyCode::Char(c) => app.push_input(c),
        _ => {}
    }
}

fn handle_normal(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,

        // Tabs
        KeyCode::Tab | KeyCode::Right => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left => app.prev_tab(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.switch_tab(digit as usize - 1);
            }
        }

        // Selection
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),

        // Actions
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('/') => app.begin_search_or_filter(),
        KeyCode::Enter => app.start_recommendation(),
        KeyCode::Char('b') => app.borrow_selected(),
        KeyCode::Char('a') => app.add_to_shelf(),
        KeyCode::Char('t') => app.return_selected(),
        KeyCode::Char('n') => app.renew_selected(),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('c') => app.cycle_shelf_category(),
        KeyCode::Char('e') => app.export_history(),
        KeyCode::Char('y') => app.review_selected(true),
        KeyCode::Char('x') => app.review_selected(false),
        KeyCode::Esc => app.status_message = None,
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use futures::future::{BoxFuture, FutureExt};
    use libdesk_core::api::{Request, Response, Transport, TransportError};
    use libdesk_core::dispatch::{CommandRunner, Dispatcher, UiContext};
    use libdesk_core::identity::IdentityRecord;
    use libdesk_core::{PanelKind, Session, TabController};
    use tokio::runtime::Handle;

    use crate::app::InputTarget;

    /// Refuses every request.
    struct Offline;

    impl Transport for Offline {
        fn send(&self, _request: Request) -> BoxFuture<'static, Result<Response, TransportError>> {
            async { Err(TransportError::Closed) }.boxed()
        }
    }

    fn app(identity: IdentityRecord) -> App {
        let ui = UiContext::new();
        let runner = CommandRunner::new(Arc::new(Offline));
        let dispatcher = Dispatcher::new(runner, ui.handle(), Handle::current());
        let tabs = TabController::new(&Session::new("wang", identity), dispatcher);
        App::new(tabs, ui, std::env::temp_dir())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_quit_needs_confirmation() {
        let mut app = app(IdentityRecord::default());
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_digit_switches_tab() {
        let mut app = app(IdentityRecord::with_user_type("本科生"));
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.active_kind(), PanelKind::History);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.active_kind(), PanelKind::History);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_kind(), PanelKind::CurrentBorrows);
    }

    #[tokio::test]
    async fn test_slash_searches_on_search_tab_and_filters_elsewhere() {
        let mut app = app(IdentityRecord::default());
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Editing(InputTarget::Search));
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Editing(InputTarget::Filter));
        for c in "Rust".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.current_filter().as_deref(), Some("rus"));
    }

    #[tokio::test]
    async fn test_recommendation_prompts_in_sequence() {
        let mut app = app(IdentityRecord::default());
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Editing(InputTarget::RecommendTitle));

        // an empty title ends the form
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Editing(InputTarget::RecommendAuthor));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Editing(InputTarget::RecommendReason));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.status_message.as_deref(), Some("Submitting recommendation..."));
    }

    #[tokio::test]
    async fn test_notice_is_modal() {
        let mut app = app(IdentityRecord::default());
        app.tabs.notify(libdesk_core::Notice::info("Search", "hello"));

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.state, AppState::Normal);
        press(&mut app, KeyCode::Esc);
        assert!(app.notice().is_none());
    }
}
