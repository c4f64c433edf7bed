use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use vaultgate_core::{GateStatus, LoginForm};

use crate::app::{App, AppState};

use super::styles;

/// Width of the login and quit dialogs
const DIALOG_WIDTH: u16 = 52;

/// Visible width of the password field
const PASSWORD_FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Vault content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if let Some(ref form) = app.login_form {
        render_login_overlay(frame, app, form);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph =
        Paragraph::new(Line::from(Span::styled("  Vault", styles::title_style()))).block(block);
    frame.render_widget(paragraph, area);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(!app.is_locked()));

    // Hidden content renders as an empty frame behind the login dialog
    let text = match app.content {
        Some(ref content) if app.content_visible => content.as_str(),
        _ => "",
    };

    let paragraph = Paragraph::new(text)
        .style(styles::text_style())
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.content_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let session = match app.session_status {
        GateStatus::Authenticated { expires_in, .. } => Span::styled(
            format!(" Unlocked, expires in {} min ", expires_in.num_minutes().max(0)),
            styles::success_style(),
        ),
        GateStatus::Unauthenticated => Span::styled(" Locked ", styles::error_style()),
    };

    let hints = if app.is_locked() {
        "[Enter] Unlock  [Esc] Quit"
    } else {
        "[↑↓] Scroll  [r] Reload  [l] Lock  [q] Quit"
    };

    let line = Line::from(vec![
        session,
        Span::styled(" | ", styles::muted_style()),
        Span::styled(hints, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line).style(styles::status_bar_style()), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App, form: &LoginForm) {
    let height = if app.login_error.is_some() { 12 } else { 10 };
    let area = centered_rect_fixed(DIALOG_WIDTH, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(format!("  {}", form.title), styles::title_style())),
        Line::from(Span::styled(format!("  {}", form.subtitle), styles::muted_style())),
        Line::from(""),
    ];

    let field_style = if app.login_focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };
    let field = if app.login_password.is_empty() {
        Span::styled(
            format!("{:<width$}", form.placeholder, width = PASSWORD_FIELD_WIDTH),
            styles::muted_style(),
        )
    } else {
        let masked = "*".repeat(app.login_password.chars().count().min(PASSWORD_FIELD_WIDTH));
        Span::styled(format!("{:<width$}", masked, width = PASSWORD_FIELD_WIDTH), field_style)
    };
    let cursor = if app.login_focused { "▌" } else { " " };
    lines.push(Line::from(vec![
        Span::styled(format!("  {}: [", form.password_label), styles::muted_style()),
        field,
        Span::styled(cursor, field_style),
        Span::styled("]", styles::muted_style()),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(format!(" ▶ {} ◀ ", form.submit_label), styles::selected_style()),
        Span::raw("]"),
    ]));

    if let Some(error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(DIALOG_WIDTH, 6, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use vaultgate_core::{MemoryStorage, VaultGate};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_locked_screen_shows_dialog_not_content() {
        let gate = VaultGate::new(MemoryStorage::new());
        let mut app = App::new(Some("TOP SECRET MEMO".to_string()));
        gate.render(&mut app);

        let text = screen(&app);
        assert!(text.contains("Vault Access"));
        assert!(text.contains("Locked"));
        assert!(!text.contains("TOP SECRET MEMO"));
    }

    #[test]
    fn test_unlocked_screen_shows_content() {
        let gate = VaultGate::new(MemoryStorage::new());
        assert!(gate.attempt_login("password"));
        let mut app = App::new(Some("TOP SECRET MEMO".to_string()));
        gate.render(&mut app);
        app.session_status = gate.status();

        let text = screen(&app);
        assert!(text.contains("TOP SECRET MEMO"));
        assert!(text.contains("Unlocked"));
        assert!(!text.contains("Vault Access"));
    }
}
