//! Typing indicator coordination
//!
//! Two independent concerns share this component:
//! - local emission: decide when the local user starts typing and end that
//!   state after a period of inactivity
//! - remote display: show "<sender> is typing..." for a limited time
//!
//! Both use one cancelable timer each. A firing only acts when its handle is
//! still the current one.

use crate::render::Renderer;
use crate::timer::{Scheduler, TimerFired, TimerHandle, TimerKind};
use chat_common::TypingConfig;
use chat_core::MessageMode;

/// Text shown while a remote user types
#[must_use]
pub fn typing_notice(sender: &str) -> String {
    format!("{sender} is typing...")
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RemoteNotice {
    sender: String,
    expiry: TimerHandle,
}

/// Debounces local typing notices and expires remote ones
pub struct TypingDebouncer<S: Scheduler> {
    scheduler: S,
    config: TypingConfig,
    is_typing_locally: bool,
    pending_clear: Option<TimerHandle>,
    shown_remote: Option<RemoteNotice>,
}

impl<S: Scheduler> TypingDebouncer<S> {
    pub fn new(scheduler: S, config: TypingConfig) -> Self {
        Self {
            scheduler,
            config,
            is_typing_locally: false,
            pending_clear: None,
            shown_remote: None,
        }
    }

    // === Local emission ===

    /// Register a keystroke in the input box
    ///
    /// Returns `true` when a TYPING notice must be sent. Only public mode
    /// announces typing; each public keystroke restarts the idle timer.
    pub fn on_local_keystroke(&mut self, mode: MessageMode) -> bool {
        if mode.is_private() {
            return false;
        }

        let emit = !self.is_typing_locally;
        self.is_typing_locally = true;

        if let Some(previous) = self.pending_clear.take() {
            self.scheduler.cancel(previous);
        }
        self.pending_clear = Some(
            self.scheduler
                .schedule(self.config.idle(), TimerKind::TypingIdle),
        );

        emit
    }

    /// End the local typing state. Idempotent.
    pub fn clear_local_typing(&mut self) {
        self.is_typing_locally = false;
        if let Some(handle) = self.pending_clear.take() {
            self.scheduler.cancel(handle);
        }
    }

    // === Remote display ===

    /// Show a typing notice from another user
    ///
    /// Notices from the local user are ignored. A newer notice replaces the
    /// shown one and its expiry timer. Returns whether anything was rendered.
    pub fn note_remote_typing<R: Renderer>(
        &mut self,
        sender: &str,
        local_username: Option<&str>,
        renderer: &mut R,
    ) -> bool {
        if local_username == Some(sender) {
            return false;
        }

        if let Some(previous) = self.shown_remote.take() {
            self.scheduler.cancel(previous.expiry);
        }

        renderer.render_typing_indicator(Some(&typing_notice(sender)));

        let expiry = self.scheduler.schedule(
            self.config.expiry(),
            TimerKind::TypingExpiry {
                sender: sender.to_string(),
            },
        );
        self.shown_remote = Some(RemoteNotice {
            sender: sender.to_string(),
            expiry,
        });
        true
    }

    /// Remove the shown notice, if any
    pub fn clear_remote_indicator<R: Renderer>(&mut self, renderer: &mut R) {
        if let Some(notice) = self.shown_remote.take() {
            self.scheduler.cancel(notice.expiry);
            renderer.render_typing_indicator(None);
        }
    }

    // === Timers ===

    /// Apply a timer firing. Returns `false` for stale firings.
    pub fn on_timer<R: Renderer>(&mut self, fired: &TimerFired, renderer: &mut R) -> bool {
        match &fired.kind {
            TimerKind::TypingIdle => {
                if self.pending_clear != Some(fired.handle) {
                    tracing::trace!(handle = %fired.handle, "Ignoring stale idle timer");
                    return false;
                }
                self.pending_clear = None;
                self.is_typing_locally = false;
                true
            }
            TimerKind::TypingExpiry { sender } => {
                let current = self
                    .shown_remote
                    .as_ref()
                    .is_some_and(|notice| notice.expiry == fired.handle && &notice.sender == sender);
                if !current {
                    tracing::trace!(handle = %fired.handle, sender = %sender, "Ignoring stale typing expiry");
                    return false;
                }
                self.shown_remote = None;
                renderer.render_typing_indicator(None);
                true
            }
        }
    }

    /// Drop all typing state, clearing any shown notice
    pub fn reset<R: Renderer>(&mut self, renderer: &mut R) {
        self.clear_local_typing();
        self.clear_remote_indicator(renderer);
    }

    // === Accessors ===

    #[must_use]
    pub fn is_typing_locally(&self) -> bool {
        self.is_typing_locally
    }

    /// Sender whose notice is currently shown
    #[must_use]
    pub fn shown_sender(&self) -> Option<&str> {
        self.shown_remote.as_ref().map(|notice| notice.sender.as_str())
    }

    #[must_use]
    pub fn has_pending_clear(&self) -> bool {
        self.pending_clear.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn config(&self) -> &TypingConfig {
        &self.config
    }
}
