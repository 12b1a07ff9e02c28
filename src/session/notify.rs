//! Session events pushed from the request interceptor to the UI layer.
//!
//! The core never touches UI APIs directly. At construction the UI
//! hands the interceptor the sender half of a channel and drains the
//! receiver on its main execution context, where it shows the alert
//! and, for the events that require it, resets navigation to the login
//! entry point. Sending never blocks and never panics, so a response
//! handler running on any thread can emit events safely.

use tokio::sync::mpsc;
use tracing::debug;

/// Authentication failures the UI must surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Server returned 401; the local session has been closed.
    Expired,
    /// Server returned 403; the session is still valid.
    AccessDenied,
    /// Server flagged the session in a 400 body; the local session has
    /// been closed.
    Invalidated,
}

impl SessionEvent {
    /// User-facing alert text.
    pub fn message(&self) -> &'static str {
        match self {
            SessionEvent::Expired => "Your session has expired. Please log in again.",
            SessionEvent::AccessDenied => "You do not have permission to perform this action.",
            SessionEvent::Invalidated => "Your session is no longer valid. Please log in again.",
        }
    }

    /// Whether the UI should navigate back to the login entry point
    /// after showing the alert.
    pub fn resets_navigation(&self) -> bool {
        !matches!(self, SessionEvent::AccessDenied)
    }
}

/// Sender half handed to the core; the UI keeps the receiver.
#[derive(Clone)]
pub struct UiNotifier {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl UiNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue an event for the UI. A dropped receiver (headless use,
    /// shutdown) is logged and otherwise ignored.
    pub fn notify(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            debug!(?event, "No UI receiver for session event");
        }
    }
}
