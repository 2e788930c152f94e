//! Roster sidebar
//!
//! Displays who is in the joined room.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use roomchat_app::App;

const SELF_PREFIX: &str = ">";
const OTHER_PREFIX: &str = " ";

/// Render the roster sidebar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (roster, me) = match app.room() {
        Some(room) => (room.roster.as_slice(), room.username.as_str()),
        None => (&[][..], ""),
    };

    let items: Vec<ListItem> = roster
        .iter()
        .map(|entry| {
            let (prefix, style) = if entry.username == me {
                (SELF_PREFIX, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                (OTHER_PREFIX, Style::default())
            };
            ListItem::new(Line::from(vec![
                Span::raw(prefix),
                Span::styled(entry.username.clone(), style),
            ]))
        })
        .collect();

    let title = format!(" Users ({}) ", roster.len());
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use roomchat_app::AppEvent;
    use roomchat_proto::RosterEntry;

    use crate::ui::test_support::{draw, rows};

    use super::*;

    #[test]
    fn marks_own_entry() {
        let mut app = App::new("loopback".into());
        app.handle(AppEvent::Joined {
            username: "me".into(),
            room: "lobby".into(),
            fingerprint: "abcd".into(),
        });
        app.handle(AppEvent::RosterChanged(vec![RosterEntry::new("bob"), RosterEntry::new("me")]));

        let rows = rows(&draw(&app, 60, 12));

        assert!(rows[0].starts_with("┌ Users (2) "));
        assert!(rows[1].starts_with("│ bob"));
        assert!(rows[2].starts_with("│>me"));
    }
}
