//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into a frame.

mod chat;
mod input;
mod login;
mod preview;
mod roster;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};
use roomchat_app::{App, Screen};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    match app.screen() {
        Screen::Login => login::render(frame, app, main_area.union(*input_area)),
        Screen::Chat => {
            render_main_area(frame, app, *main_area);
            input::render(frame, app, *input_area);
        },
    }
    status::render(frame, app, *status_area);

    if app.preview().is_some() {
        preview::render(frame, app, frame.area());
    }
}

/// Render the main area (roster sidebar + chat).
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    const ROSTER_SIDEBAR_WIDTH: u16 = 16;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(ROSTER_SIDEBAR_WIDTH),
            Constraint::Min(CHAT_AREA_MIN_WIDTH),
        ])
        .split(area);

    let [roster_area, chat_area] = chunks.as_ref() else {
        return;
    };

    roster::render(frame, app, *roster_area);
    chat::render(frame, app, *chat_area);
}

/// A `width` x `height` rectangle centered in `area`, clamped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
