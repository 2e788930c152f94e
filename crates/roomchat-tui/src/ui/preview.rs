//! Attachment preview modal.
//!
//! A terminal cannot draw images or video inline, so the modal shows what
//! the attachment is and where it lives. Esc closes it.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use roomchat_app::App;

use super::centered;

const MODAL_WIDTH: u16 = 56;
const MODAL_HEIGHT: u16 = 8;

/// Render the preview modal over `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(preview) = app.preview() else {
        return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::from(Span::styled(
            preview.file.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("type ", label),
            Span::raw(format!("{} ({})", preview.file.mime_type, preview.kind.label())),
        ]),
        Line::from(vec![
            Span::styled("url  ", label),
            Span::styled(
                preview.file.url.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::default(),
        Line::from(Span::styled("Esc to close", label)),
    ];

    let rect = centered(area, MODAL_WIDTH, MODAL_HEIGHT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" Preview #{} ", preview.index + 1));

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), rect);
}
