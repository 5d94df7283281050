use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

/// One-way consumer of user-facing error messages.
pub trait ErrorSink {
    fn show_error(&self, message: &str);
}

pub type DynErrorSink = Arc<dyn ErrorSink + Send + Sync>;

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorReport {
    pub message: String,
    pub reported_at: DateTime<Utc>,
}

/// Holds the error currently shown to the user. Views subscribe to it and
/// dismiss it with `clear_error`.
#[derive(Debug)]
pub struct ErrorService {
    current: watch::Sender<Option<ErrorReport>>,
}

impl ErrorService {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);

        Self { current }
    }

    pub fn error(&self) -> Option<ErrorReport> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ErrorReport>> {
        self.current.subscribe()
    }

    pub fn clear_error(&self) {
        self.current.send_replace(None);
    }
}

impl Default for ErrorService {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorSink for ErrorService {
    fn show_error(&self, message: &str) {
        tracing::warn!(error = message, "showing error");

        self.current.send_replace(Some(ErrorReport {
            message: message.into(),
            reported_at: Utc::now(),
        }));
    }
}

#[test]
fn show_and_clear_error_test() {
    let service = ErrorService::new();
    let mut rx = service.subscribe();

    service.show_error("Failed to store selected place");

    assert!(rx.has_changed().unwrap());
    assert_eq!(
        rx.borrow_and_update().as_ref().map(|r| r.message.as_str()),
        Some("Failed to store selected place")
    );

    service.clear_error();

    assert_eq!(service.error(), None);
}

#[test]
fn latest_error_wins_test() {
    let service = ErrorService::default();

    service.show_error("first");
    service.show_error("second");

    assert_eq!(service.error().unwrap().message, "second");
}
