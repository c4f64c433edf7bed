//! Keyboard input handling for the TUI.
//!
//! Translates key events into app state changes and gate calls.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::info;
use vaultgate_core::{Clock, HostPage, SessionStorage, VaultGate};

use crate::app::{can_add_password_char, App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input<S: SessionStorage, C: Clock>(
    app: &mut App,
    gate: &VaultGate<S, C>,
    key: KeyEvent,
) -> bool {
    if matches!(app.state, AppState::ConfirmingQuit) {
        return handle_quit_confirmation(app, key);
    }

    if app.is_locked() {
        return handle_login_input(app, gate, key);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.scroll_down(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.content_scroll = 0,
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('l') => {
            info!("Vault locked from keyboard");
            gate.clear();
            app.reload();
        }
        _ => {}
    }
    false
}

fn handle_quit_confirmation(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.state = AppState::Quitting;
            true
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
            false
        }
        _ => false,
    }
}

fn handle_login_input<S: SessionStorage, C: Clock>(
    app: &mut App,
    gate: &VaultGate<S, C>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Enter => {
            // On success the gate requests a reload; on failure the
            // error message is set on the app
            gate.submit(app);
        }
        KeyCode::Backspace => {
            app.login_password.pop();
        }
        KeyCode::Char(c) => {
            if can_add_password_char(app.login_password.chars().count(), c) {
                app.login_password.push(c);
            }
        }
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use vaultgate_core::{MemoryStorage, SystemClock};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, gate: &VaultGate<MemoryStorage, SystemClock>, text: &str) {
        for c in text.chars() {
            handle_input(app, gate, key(KeyCode::Char(c)));
        }
    }

    fn locked_app(gate: &VaultGate<MemoryStorage, SystemClock>) -> App {
        let mut app = App::new(Some("notes".to_string()));
        gate.render(&mut app);
        app
    }

    #[test]
    fn test_typing_and_backspace() {
        let gate = VaultGate::new(MemoryStorage::new());
        let mut app = locked_app(&gate);

        type_text(&mut app, &gate, "passw");
        handle_input(&mut app, &gate, key(KeyCode::Backspace));
        assert_eq!(app.login_password, "pass");
    }

    #[test]
    fn test_enter_with_correct_password_requests_reload() {
        let gate = VaultGate::new(MemoryStorage::new());
        let mut app = locked_app(&gate);

        type_text(&mut app, &gate, "password");
        assert!(!handle_input(&mut app, &gate, key(KeyCode::Enter)));
        assert!(app.take_reload());
        assert!(gate.check_authenticated());
    }

    #[test]
    fn test_enter_with_wrong_password_shows_error() {
        let gate = VaultGate::new(MemoryStorage::new());
        let mut app = locked_app(&gate);

        type_text(&mut app, &gate, "wrong");
        handle_input(&mut app, &gate, key(KeyCode::Enter));
        assert!(app.login_error.is_some());
        assert!(app.login_password.is_empty());
        assert!(gate.storage().is_empty());
    }

    #[test]
    fn test_letters_on_login_screen_do_not_quit() {
        let gate = VaultGate::new(MemoryStorage::new());
        let mut app = locked_app(&gate);

        assert!(!handle_input(&mut app, &gate, key(KeyCode::Char('q'))));
        assert_eq!(app.login_password, "q");
        assert!(handle_input(&mut app, &gate, key(KeyCode::Esc)));
    }

    #[test]
    fn test_lock_key_clears_session() {
        let gate = VaultGate::new(MemoryStorage::new());
        assert!(gate.attempt_login("password"));
        let mut app = App::new(Some("notes".to_string()));
        gate.render(&mut app);
        assert!(!app.is_locked());

        handle_input(&mut app, &gate, key(KeyCode::Char('l')));
        assert!(!gate.check_authenticated());
        assert!(app.take_reload());
    }

    #[test]
    fn test_quit_confirmation() {
        let gate = VaultGate::new(MemoryStorage::new());
        assert!(gate.attempt_login("password"));
        let mut app = App::new(None);
        gate.render(&mut app);

        assert!(!handle_input(&mut app, &gate, key(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!handle_input(&mut app, &gate, key(KeyCode::Char('n'))));
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, &gate, key(KeyCode::Char('q')));
        assert!(handle_input(&mut app, &gate, key(KeyCode::Char('y'))));
        assert_eq!(app.state, AppState::Quitting);
    }
}
