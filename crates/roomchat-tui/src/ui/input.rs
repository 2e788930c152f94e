//! Composer line
//!
//! Displays the composer buffer with cursor and the staged attachment.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use roomchat_app::{App, AttachmentKind};

const PROMPT_WIDTH: u16 = 3; // border + "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the composer.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let composer = app.composer();

    let mut block = Block::default().borders(Borders::ALL);
    if let Some(file) = &composer.staged {
        let title = format!(" Attached: {} ({}) ", file.name, AttachmentKind::of(file).label());
        block = block.title(title).border_style(Style::default().fg(Color::Yellow));
    }

    let paragraph = Paragraph::new(format!("> {}", composer.input.as_str()))
        .style(Style::default().fg(Color::White))
        .block(block);
    frame.render_widget(paragraph, area);

    if app.preview().is_none() {
        place_cursor(frame, area, composer.input.cursor());
    }
}

/// Put the terminal cursor `cursor` characters into an input line.
pub(super) fn place_cursor(frame: &mut Frame, area: Rect, cursor: usize) {
    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = (cursor as u16).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);

    frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
}
