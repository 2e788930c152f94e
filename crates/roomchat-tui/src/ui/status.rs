//! Status bar
//!
//! Displays connection state, room, key fingerprint and the last status
//! message.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use roomchat_app::{App, ConnectionState};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(status_paragraph(app), area);
}

fn status_paragraph(app: &App) -> Paragraph<'_> {
    let connection_status = match app.connection_state() {
        ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let room_info = app.room().map_or_else(
        || format!(" | {}", app.server_label()),
        |room| {
            format!(
                " | #{} | key {} | {} online",
                room.room,
                room.fingerprint,
                room.roster.len()
            )
        },
    );

    let mut spans = vec![
        Span::raw(" "),
        connection_status,
        Span::styled(room_info, Style::default().fg(Color::Gray)),
    ];
    if let Some(message) = app.status_message() {
        spans.push(Span::raw(format!(" | {message}")));
    }

    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White))
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use roomchat_app::AppEvent;
    use roomchat_proto::RosterEntry;

    use super::*;
    use crate::ui::test_support::rows;

    fn status_line(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|frame| render(frame, app, frame.area())).unwrap();
        rows(terminal.backend().buffer()).remove(0).trim().to_string()
    }

    #[test]
    fn login_status_shows_server() {
        let mut app = App::new("relay.example:4433".into());
        app.handle(AppEvent::Connecting);

        insta::assert_snapshot!(status_line(&app), @"Connecting... | relay.example:4433");
    }

    #[test]
    fn chat_status_shows_room_and_key() {
        let mut app = App::new("loopback".into());
        app.handle(AppEvent::Connected);
        app.handle(AppEvent::Joined {
            username: "me".into(),
            room: "lobby".into(),
            fingerprint: "3f9a".into(),
        });
        app.handle(AppEvent::RosterChanged(vec![RosterEntry::new("me"), RosterEntry::new("bob")]));

        insta::assert_snapshot!(
            status_line(&app),
            @"Connected | #lobby | key 3f9a | 2 online | Joined lobby"
        );
    }

    #[test]
    fn disconnect_reason_is_shown() {
        let mut app = App::new("loopback".into());
        app.handle(AppEvent::Disconnected { reason: "connection closed".into() });

        insta::assert_snapshot!(
            status_line(&app),
            @"Disconnected | loopback | Disconnected: connection closed"
        );
    }
}
