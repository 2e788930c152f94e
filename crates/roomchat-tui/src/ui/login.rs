//! Login form
//!
//! Username and room inputs shown before a room is joined.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use roomchat_app::{App, LoginField};

use super::{centered, input::place_cursor};

const FORM_WIDTH: u16 = 44;
const FORM_HEIGHT: u16 = 8;
const LABEL_WIDTH: usize = 10;

/// Render the login form centered in `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = app.login();
    let focused = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let dimmed = Style::default().fg(Color::DarkGray);

    let field = |label: &str, value: &str, field: LoginField| {
        let style = if form.focus == field { focused } else { Style::default() };
        Line::from(vec![
            Span::styled(format!("{label:<LABEL_WIDTH$}"), style),
            Span::raw(value.to_string()),
        ])
    };

    let lines = vec![
        Line::default(),
        field("Username", form.username.as_str(), LoginField::Username),
        Line::default(),
        field("Room", form.room.as_str(), LoginField::Room),
        Line::default(),
        Line::from(Span::styled("Tab switch | Enter join | Esc quit", dimmed)),
    ];

    let rect = centered(area, FORM_WIDTH, FORM_HEIGHT);
    let block = Block::default().borders(Borders::ALL).title(" Join a room ");
    frame.render_widget(Paragraph::new(lines).block(block), rect);

    // Cursor sits after the label of the focused field.
    let (row, input) = match form.focus {
        LoginField::Username => (1, &form.username),
        LoginField::Room => (3, &form.room),
    };
    let line_area = Rect {
        x: rect.x + LABEL_WIDTH as u16 - 2,
        y: rect.y + row,
        width: rect.width.saturating_sub(LABEL_WIDTH as u16 - 2),
        height: 1,
    };
    place_cursor(frame, line_area, input.cursor());
}

#[cfg(test)]
mod tests {
    use roomchat_app::{AppEvent, KeyInput};

    use crate::ui::test_support::{draw, shows};

    use super::*;

    #[test]
    fn shows_both_fields() {
        let mut app = App::with_login("loopback".into(), "alice", "");
        for c in "lobby".chars() {
            app.handle(AppEvent::Key(KeyInput::Char(c)));
        }

        let buffer = draw(&app, 60, 16);

        assert!(shows(&buffer, "Join a room"));
        assert!(shows(&buffer, "│Username  alice"));
        assert!(shows(&buffer, "│Room      lobby"));
    }

    #[test]
    fn cursor_follows_focused_field() {
        use ratatui::{Terminal, backend::TestBackend};

        let app = App::with_login("loopback".into(), "alice", "");
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|frame| crate::ui::render(frame, &app)).unwrap();

        let form = centered(Rect::new(0, 0, 60, 15), FORM_WIDTH, FORM_HEIGHT);
        let position = terminal.get_cursor_position().unwrap();
        assert_eq!(position.y, form.y + 1 + 3);
        assert_eq!(position.x, form.x + 1 + LABEL_WIDTH as u16);
    }
}
