//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Session bridge
//! - [`Driver`]: Platform-specific I/O

use roomchat_client::{Environment, Transport};

use crate::{App, AppAction, AppEvent, Bridge, Driver};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `T`: Transport to the relay
/// - `E`: Environment for nonces
pub struct Runtime<D, T, E>
where
    D: Driver,
    T: Transport,
    E: Environment,
{
    driver: D,
    app: App,
    bridge: Bridge<T, E>,
}

impl<D, T, E> Runtime<D, T, E>
where
    D: Driver,
    T: Transport,
    E: Environment,
{
    /// Create a new runtime.
    pub fn new(driver: D, app: App, bridge: Bridge<T, E>) -> Self {
        Self { driver, app, bridge }
    }

    /// Run the main event loop.
    ///
    /// Connects, then races driver input against inbound transport events
    /// until the app quits or input ends. Session failures are shown in the
    /// app, never returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let events = self.bridge.connect().await;
        let mut quit = self.process_bridge_events(events).await?;

        while !quit {
            quit = self.process_cycle().await?;
        }

        self.bridge.disconnect();
        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    pub async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        tokio::select! {
            biased;

            Some(payload) = self.bridge.next_inbound() => {
                let events = self.bridge.handle_inbound(payload).await;
                self.process_bridge_events(events).await
            }

            event = self.driver.poll_event() => {
                match event? {
                    Some(event) => {
                        let actions = self.app.handle(event);
                        self.process_actions(actions).await
                    },
                    None => Ok(true),
                }
            }
        }
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),

                    // Session operations go through the bridge
                    AppAction::Connect
                    | AppAction::JoinRoom { .. }
                    | AppAction::SendMessage { .. } => {
                        let events = self.bridge.process_app_action(action).await;
                        for event in events {
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Process events from Bridge back to App.
    async fn process_bridge_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Bridge
    pub fn bridge(&self) -> &Bridge<T, E> {
        &self.bridge
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
