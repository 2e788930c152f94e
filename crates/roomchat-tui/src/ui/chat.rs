//! Chat area
//!
//! Displays the joined room's messages with inline links, attachment lines
//! and audio player state. Follows the tail unless scrolled back.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use roomchat_app::{
    App, AttachmentKind, AudioPlayer,
    linkify::{self, Segment},
};
use roomchat_client::DisplayMessage;

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.room() {
        Some(room) if app.scroll() > 0 => format!(" #{} (+{} below) ", room.room, app.scroll()),
        Some(room) => format!(" #{} ", room.room),
        None => " No Room ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let messages = app.messages();
    if messages.is_empty() {
        let hint = Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    let end = messages.len().saturating_sub(app.scroll());
    let lines: Vec<Line> = messages[..end]
        .iter()
        .enumerate()
        .flat_map(|(index, message)| message_lines(app, index, message))
        .collect();

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = lines.len().saturating_sub(visible_height);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn message_lines<'a>(app: &App, index: usize, message: &'a DisplayMessage) -> Vec<Line<'a>> {
    let mut header = vec![
        Span::styled(
            format!("<{}>", message.from),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    match message.text.as_deref() {
        Some(_) if message.is_undecryptable() => header.push(Span::styled(
            roomchat_client::PLACEHOLDER_TEXT,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
        Some(text) => header.extend(text_spans(text)),
        None => {},
    }

    let mut lines = vec![Line::from(header)];
    if let Some(file) = &message.file {
        let kind = AttachmentKind::of(file);
        let mut spans = vec![
            Span::raw("  "),
            Span::styled(format!("[#{}]", index + 1), Style::default().fg(Color::Yellow)),
            Span::raw(format!(" {} ", kind.label())),
            Span::styled(file.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ];
        if kind == AttachmentKind::Audio {
            let player = app.audio().get(index).copied().unwrap_or_default();
            spans.push(Span::styled(
                format!(" {}", player_label(player)),
                Style::default().fg(Color::Magenta),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Message text with links highlighted.
fn text_spans(text: &str) -> Vec<Span<'_>> {
    linkify::segments(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => Span::raw(text),
            Segment::Link(link) => Span::styled(
                link,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
            ),
        })
        .collect()
}

fn player_label(player: AudioPlayer) -> String {
    let state = if player.playing { "[>]" } else { "[||]" };
    format!("{state} {}", clock(player.position))
}

fn clock(position: Duration) -> String {
    let secs = position.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
