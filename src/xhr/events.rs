// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Lifecycle notifications
//!
//! Ordering is part of the contract: `readystatechange` for `done` comes
//! before the terminal event (`load`, `error` or `abort`), which comes
//! before `loadend`.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::state::ReadyState;

/// Progress payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub length_computable: bool,
    pub loaded: u64,
    pub total: u64,
}

impl ProgressEvent {
    /// Progress with `total` taken from a content length when known
    pub fn new(loaded: u64, total: Option<u64>) -> Self {
        Self {
            length_computable: total.is_some(),
            loaded,
            total: total.unwrap_or(0),
        }
    }
}

/// Error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
}

/// Event fired by a request or its upload target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XhrEvent {
    ReadyStateChange(ReadyState),
    LoadStart,
    Progress(ProgressEvent),
    Load,
    Error(ErrorEvent),
    Abort,
    LoadEnd,
}

impl XhrEvent {
    /// DOM event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            XhrEvent::ReadyStateChange(_) => "readystatechange",
            XhrEvent::LoadStart => "loadstart",
            XhrEvent::Progress(_) => "progress",
            XhrEvent::Load => "load",
            XhrEvent::Error(_) => "error",
            XhrEvent::Abort => "abort",
            XhrEvent::LoadEnd => "loadend",
        }
    }

    /// `load`, `error` or `abort`
    pub fn is_terminal(&self) -> bool {
        matches!(self, XhrEvent::Load | XhrEvent::Error(_) | XhrEvent::Abort)
    }
}

/// Event listener
pub type EventCallback = Arc<dyn Fn(&XhrEvent) + Send + Sync>;

struct Listener {
    event_type: Option<String>,
    callback: EventCallback,
}

/// Listener list for a request or its upload sub-object
#[derive(Default)]
pub struct EventTarget {
    listeners: RwLock<Vec<Listener>>,
}

impl std::fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTarget")
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to every event
    pub fn add_listener(&self, callback: EventCallback) {
        self.listeners.write().push(Listener {
            event_type: None,
            callback,
        });
    }

    /// Listen to one event type
    pub fn add_event_listener(&self, event_type: &str, callback: EventCallback) {
        self.listeners.write().push(Listener {
            event_type: Some(event_type.to_string()),
            callback,
        });
    }

    /// Remove all listeners
    pub fn clear(&self) {
        self.listeners.write().clear();
    }

    /// Invoke matching listeners. Listeners may register more listeners.
    pub fn dispatch(&self, event: &XhrEvent) {
        let matching: Vec<EventCallback> = self
            .listeners
            .read()
            .iter()
            .filter(|l| {
                l.event_type
                    .as_deref()
                    .map_or(true, |t| t == event.event_type())
            })
            .map(|l| l.callback.clone())
            .collect();

        for callback in matching {
            callback(event);
        }
    }
}

/// Where an event is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Request,
    Upload,
}

/// Events collected while request state is locked, dispatched after
pub(crate) type EventQueue = Vec<(Target, XhrEvent)>;

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_progress_event() {
        let known = ProgressEvent::new(10, Some(20));
        assert!(known.length_computable);
        assert_eq!(known.total, 20);

        let unknown = ProgressEvent::new(10, None);
        assert!(!unknown.length_computable);
        assert_eq!(unknown.total, 0);
    }

    #[test]
    fn test_dispatch_filters_by_type() {
        let target = EventTarget::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let all = seen.clone();
        target.add_listener(Arc::new(move |e: &XhrEvent| all.lock().push(format!("*{}", e.event_type()))));
        let loads = seen.clone();
        target.add_event_listener("load", Arc::new(move |e: &XhrEvent| loads.lock().push(e.event_type().to_string())));

        target.dispatch(&XhrEvent::LoadStart);
        target.dispatch(&XhrEvent::Load);

        assert_eq!(*seen.lock(), vec!["*loadstart", "*load", "load"]);
    }

    #[test]
    fn test_terminal_events() {
        assert!(XhrEvent::Abort.is_terminal());
        assert!(XhrEvent::Error(ErrorEvent { message: String::new() }).is_terminal());
        assert!(!XhrEvent::LoadEnd.is_terminal());
    }
}
