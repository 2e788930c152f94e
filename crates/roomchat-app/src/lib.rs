//! Application layer for Roomchat
//!
//! Pure state machines and generic runtime for UI and session orchestration,
//! enabling deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: UI state machine (login form, message list, composer, preview)
//! - [`Bridge`]: Session bridge (translates App actions to session calls)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver
//!
//! Presentation helpers used by frontends:
//!
//! - [`AttachmentKind`]: MIME-prefix classification of attachments
//! - [`linkify::segments`]: Inline link detection
//! - [`AudioPlayers`]: Audio widgets with exclusive playback

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::time::Duration;

mod action;
mod app;
pub mod attachment;
mod audio;
mod bridge;
mod commands;
mod driver;
mod event;
mod input;
pub mod linkify;
mod runtime;
mod state;
mod text_input;

pub use action::AppAction;
pub use app::{App, PAGE_SIZE};
pub use attachment::AttachmentKind;
pub use audio::{AudioPlayer, AudioPlayers};
pub use bridge::Bridge;
pub use commands::{Command, CommandError};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::KeyInput;
pub use runtime::Runtime;
pub use state::{
    Composer, ConnectionState, LoginField, LoginForm, Preview, RoomView, Screen,
};
pub use text_input::TextInput;

/// Interval between [`AppEvent::Tick`]s. Audio playback advances by this
/// much per tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
