//! User-visible side effects: transient notices and navigation requests.
//!
//! SYSTEM CONTEXT
//! ==============
//! The HTTP pipeline never renders anything itself. It pushes `UiEvent`s into
//! an unbounded channel and whatever front end owns the receiver (the CLI, a
//! test, a GUI shell) decides how to show a toast or perform a redirect.

use tokio::sync::mpsc;

#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Success,
    Info,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }
}

/// Navigation target requested by the session pipeline or the route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Login view; `from` is where the user was headed, so they can return after authenticating.
    Login { from: Option<String> },
    Home,
}

impl Redirect {
    /// Path of the target view.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login { .. } => "/login",
            Self::Home => "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Notice(Notice),
    Redirect(Redirect),
}

/// Sender half for UI events. Cloned into every collaborator that may notify.
#[derive(Debug, Clone, Default)]
pub struct UiEvents {
    tx: Option<mpsc::UnboundedSender<UiEvent>>,
}

impl UiEvents {
    /// A connected sender/receiver pair.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A handle that drops every event (headless use).
    #[must_use]
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn notify(&self, notice: Notice) {
        tracing::debug!(level = ?notice.level, message = %notice.message, "ui notice");
        self.emit(UiEvent::Notice(notice));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notice::error(message));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notice::success(message));
    }

    pub fn redirect(&self, target: Redirect) {
        tracing::debug!(path = target.path(), "ui redirect");
        self.emit(UiEvent::Redirect(target));
    }

    fn emit(&self, event: UiEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        // Receiver gone means nobody is rendering; nothing left to tell.
        let _ = tx.send(event);
    }
}
