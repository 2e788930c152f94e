//! Terminal UI for Roomchat
//!
//! A thin shell over [`roomchat_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic
//! [`roomchat_app::Runtime`].
//!
//! This crate only handles terminal rendering and transport selection.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod runtime;
pub mod terminal;
pub mod ui;

pub use roomchat_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use runtime::{ClientConfig, Mode, RuntimeError};
pub use terminal::{TerminalDriver, TerminalError};
