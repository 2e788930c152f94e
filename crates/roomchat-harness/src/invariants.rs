//! Invariant checking for simulation runs.
//!
//! Invariants are properties of the [`App`] that must hold after every
//! event, whatever the sequence. The [`SimDriver`](crate::SimDriver) can run
//! a registry against each rendered state.

use roomchat_app::{App, AttachmentKind, Screen};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property checked against application state.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against `app`.
    fn check(&self, app: &App) -> InvariantResult;
}

/// Scroll offset stays inside the message list.
pub struct ScrollInBounds;

impl Invariant for ScrollInBounds {
    fn name(&self) -> &'static str {
        "scroll_in_bounds"
    }

    fn check(&self, app: &App) -> InvariantResult {
        let len = app.messages().len();
        if app.scroll() < len.max(1) {
            return Ok(());
        }
        Err(Violation {
            invariant: self.name(),
            message: format!("scroll {} with {len} messages", app.scroll()),
        })
    }
}

/// Every audio player belongs to an audio attachment in the log, and at
/// most one plays.
pub struct ExclusiveAudio;

impl Invariant for ExclusiveAudio {
    fn name(&self) -> &'static str {
        "exclusive_audio"
    }

    fn check(&self, app: &App) -> InvariantResult {
        let playing = app.audio().iter().filter(|(_, player)| player.playing).count();
        if playing > 1 {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{playing} players playing"),
            });
        }

        for (index, _) in app.audio().iter() {
            let is_audio = app
                .messages()
                .get(index)
                .and_then(|message| message.file.as_ref())
                .is_some_and(|file| AttachmentKind::of(file) == AttachmentKind::Audio);
            if !is_audio {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("player {index} has no audio attachment"),
                });
            }
        }
        Ok(())
    }
}

/// The preview modal only opens on the chat screen over a previewable
/// attachment that is still in the log.
pub struct PreviewTargetsAttachment;

impl Invariant for PreviewTargetsAttachment {
    fn name(&self) -> &'static str {
        "preview_targets_attachment"
    }

    fn check(&self, app: &App) -> InvariantResult {
        let Some(preview) = app.preview() else {
            return Ok(());
        };

        let fail = |message: String| -> InvariantResult {
            Err(Violation { invariant: self.name(), message })
        };
        if app.screen() != Screen::Chat {
            return fail("preview open outside the chat screen".to_string());
        }
        if !preview.kind.is_previewable() {
            return fail(format!("preview of non-previewable {}", preview.kind.label()));
        }
        let in_log = app
            .messages()
            .get(preview.index)
            .and_then(|message| message.file.as_ref())
            .is_some_and(|file| *file == preview.file);
        if !in_log {
            return fail(format!("preview #{} not in log", preview.index + 1));
        }
        Ok(())
    }
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with every built-in invariant.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(ScrollInBounds);
        registry.add(ExclusiveAudio);
        registry.add(PreviewTargetsAttachment);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against `app`, collecting every violation.
    pub fn check_all(&self, app: &App) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(app).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

impl std::fmt::Debug for InvariantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.invariants.iter().map(|inv| inv.name()).collect();
        f.debug_struct("InvariantRegistry").field("invariants", &names).finish()
    }
}
