//! Application state for the vaultgate terminal UI.
//!
//! `App` is the host page the gate drives: the vault content is the
//! protected element, and the login dialog is the inserted form. The gate
//! itself lives next to `App` in the main loop.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use vaultgate_core::{FormPlacement, GateStatus, HostPage, LoginForm};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of lines to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: u16 = 10;

/// Shown when no content file is configured
const PLACEHOLDER_CONTENT: &str = "The vault is empty.\n\n\
Point `content_file` in ~/.config/vaultgate/config.json (or the \
VAULTGATE_CONTENT environment variable) at a text file to show it here.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ConfirmingQuit,
    Quitting,
}

pub struct App {
    pub state: AppState,

    // Protected content
    pub content: Option<String>,
    pub content_visible: bool,
    pub content_scroll: u16,

    // Login form state
    pub login_form: Option<LoginForm>,
    pub login_password: String,
    pub login_focused: bool,
    pub login_error: Option<&'static str>,

    pub session_status: GateStatus,
    reload_requested: bool,
}

impl App {
    pub fn new(content: Option<String>) -> Self {
        Self {
            state: AppState::Normal,
            content,
            content_visible: true,
            content_scroll: 0,
            login_form: None,
            login_password: String::new(),
            login_focused: false,
            login_error: None,
            session_status: GateStatus::Unauthenticated,
            reload_requested: false,
        }
    }

    /// Read the protected content, or the placeholder when none is configured
    pub fn load_content(path: Option<&Path>) -> Result<String> {
        match path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read vault content {}", path.display())),
            None => Ok(PLACEHOLDER_CONTENT.to_string()),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.login_form.is_some()
    }

    /// Consume a pending reload request
    pub fn take_reload(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.content_scroll = self.content_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self
            .content
            .as_deref()
            .map(|c| c.lines().count())
            .unwrap_or(0)
            .saturating_sub(1);
        let max = u16::try_from(max).unwrap_or(u16::MAX);
        self.content_scroll = self.content_scroll.saturating_add(lines).min(max);
    }
}

impl HostPage for App {
    fn has_main(&self) -> bool {
        true
    }

    fn has_content(&self) -> bool {
        self.content.is_some()
    }

    fn set_content_visible(&mut self, visible: bool) {
        self.content_visible = visible;
    }

    fn has_login_form(&self) -> bool {
        self.login_form.is_some()
    }

    fn insert_login_form(&mut self, form: &LoginForm, placement: FormPlacement) {
        debug!(?placement, "Showing login dialog");
        self.login_form = Some(form.clone());
        self.login_password.clear();
        self.login_error = None;
    }

    fn remove_login_form(&mut self) {
        self.login_form = None;
        self.login_password.clear();
        self.login_focused = false;
        self.login_error = None;
    }

    fn password(&self) -> Option<String> {
        self.login_form.as_ref().map(|_| self.login_password.clone())
    }

    fn clear_password(&mut self) {
        self.login_password.clear();
    }

    fn focus_password(&mut self) {
        self.login_focused = true;
    }

    fn set_error_visible(&mut self, visible: bool) {
        self.login_error = if visible {
            self.login_form.as_ref().map(|f| f.error_message)
        } else {
            None
        };
    }

    fn set_unavailable_visible(&mut self, visible: bool) {
        self.login_error = if visible {
            self.login_form.as_ref().map(|f| f.unavailable_message)
        } else {
            None
        };
    }

    fn reload(&mut self) {
        self.reload_requested = true;
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
