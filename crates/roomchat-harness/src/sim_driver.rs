//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but plays
//! back a scripted event queue. It implements [`Driver`] so the same
//! [`roomchat_app::Runtime`] orchestration code runs in both production and
//! simulation.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use roomchat_app::{App, AppEvent, Driver, KeyInput};

use crate::invariants::{InvariantRegistry, Violation};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

impl From<Vec<Violation>> for SimDriverError {
    fn from(violations: Vec<Violation>) -> Self {
        let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
        Self(format!("invariant violation: {}", messages.join("; ")))
    }
}

#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    renders: usize,
    last_frame: Option<App>,
    stopped: bool,
}

/// Inspection and injection handle onto a [`SimDriver`].
///
/// Stays usable after the driver has been moved into a runtime.
#[derive(Clone, Default)]
pub struct SimHandle {
    state: Arc<Mutex<SharedState>>,
}

impl SimHandle {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an `AppEvent`.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().pending_events.push_back(event);
    }

    /// Queue a key press.
    pub fn press(&self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Queue one key press per character of `text`.
    pub fn type_text(&self, text: &str) {
        let mut state = self.lock();
        state.pending_events.extend(text.chars().map(|c| AppEvent::Key(KeyInput::Char(c))));
    }

    /// Queue `text` followed by Enter.
    pub fn submit(&self, text: &str) {
        self.type_text(text);
        self.press(KeyInput::Enter);
    }

    /// Queue a tick event.
    pub fn inject_tick(&self) {
        self.inject_event(AppEvent::Tick);
    }

    /// Check if there are scripted events left.
    pub fn has_pending(&self) -> bool {
        !self.lock().pending_events.is_empty()
    }

    /// Number of frames rendered.
    pub fn renders(&self) -> usize {
        self.lock().renders
    }

    /// Copy of the app state at the last render.
    pub fn last_frame(&self) -> Option<App> {
        self.lock().last_frame.clone()
    }

    /// Check if the driver was stopped.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }
}

impl std::fmt::Debug for SimHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SimHandle")
            .field("pending_events", &state.pending_events.len())
            .field("renders", &state.renders)
            .field("stopped", &state.stopped)
            .finish()
    }
}

/// Simulation driver for deterministic testing.
///
/// [`Driver::poll_event`] pops the next scripted event and reports the end
/// of input once the script is exhausted, which makes the runtime quit.
#[derive(Debug, Default)]
pub struct SimDriver {
    handle: SimHandle,
    invariants: Option<InvariantRegistry>,
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check invariants on every render. A violation fails the render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Handle for injecting events and inspecting renders.
    pub fn handle(&self) -> SimHandle {
        self.handle.clone()
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.handle.lock().pending_events.pop_front())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        if let Some(registry) = &self.invariants {
            registry.check_all(app)?;
        }

        let mut state = self.handle.lock();
        state.renders += 1;
        state.last_frame = Some(app.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.handle.lock().stopped = true;
    }
}
