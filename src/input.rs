//! Key map.
//!
//! Two modes: the feed (scrolling, quitting, opening the language picker,
//! dismissing the error) and the picker, which takes every key while open.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.picker.is_some() {
        handle_picker_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('l') => app.open_picker(),
        KeyCode::Char('x') => app.dismiss_error(),
        _ => {}
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('l') | KeyCode::Char('q') => app.close_picker(),
        KeyCode::Down | KeyCode::Char('j') => app.picker_next(),
        KeyCode::Up | KeyCode::Char('k') => app.picker_previous(),
        KeyCode::Enter => app.picker_confirm(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedController;
    use crate::test_utils::{language, settle, FakeProvider};
    use crossterm::event::{KeyEventState, KeyModifiers};
    use std::time::Duration;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn loaded_app() -> App {
        let feed = FeedController::new(FakeProvider::new(10), language("en"));
        let mut app = App::new(feed, Duration::from_secs(6));
        settle(&mut app.feed).await;
        app
    }

    #[tokio::test]
    async fn q_and_esc_quit() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.quit);

        let mut app = loaded_app().await;
        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.quit);
    }

    #[tokio::test]
    async fn release_events_are_ignored() {
        let mut app = loaded_app().await;
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key_event(&mut app, release);
        assert!(!app.quit);
    }

    #[tokio::test]
    async fn j_and_k_move_between_cards() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, press(KeyCode::Char('j')));
        handle_key_event(&mut app, press(KeyCode::Down));
        assert_eq!(app.selected, 2);
        handle_key_event(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.selected, 1);
        handle_key_event(&mut app, press(KeyCode::Char('G')));
        assert_eq!(app.selected, 9);
        handle_key_event(&mut app, press(KeyCode::Home));
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn esc_in_picker_closes_it_without_quitting() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, press(KeyCode::Char('l')));
        assert!(app.picker.is_some());

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.picker.is_none());
        assert!(!app.quit);
    }

    #[tokio::test]
    async fn enter_in_picker_changes_language() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, press(KeyCode::Char('l')));
        handle_key_event(&mut app, press(KeyCode::Down));
        handle_key_event(&mut app, press(KeyCode::Enter));

        assert!(app.picker.is_none());
        assert_eq!(app.state().language.code, "en-gb");
        // Navigation keys went to the picker, not the feed.
        assert_eq!(app.selected, 0);
    }
}
