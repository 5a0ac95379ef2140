//! Change-feed transport abstraction.
//!
//! A feed watches one key on a set of endpoints and yields ordered batches of
//! update events. The session only depends on these traits.

use std::future::Future;

use thiserror::Error;

/// Kind of change carried by a [`WatchEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The watched key was set to a new value.
    Put,
    /// The watched key was removed.
    Delete,
}

/// A single update delivered by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: EventKind,
    pub key: String,
    pub value: Option<String>,
}

impl WatchEvent {
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Put,
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Delete,
            key: key.into(),
            value: None,
        }
    }

    /// The payload of a put event, if it carries a non-empty one.
    pub fn reload_payload(&self) -> Option<&str> {
        match (self.kind, self.value.as_deref()) {
            (EventKind::Put, Some(value)) if !value.is_empty() => Some(value),
            _ => None,
        }
    }
}

/// Errors reported by a feed or one of its subscriptions.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The wait was interrupted but the subscription is still usable.
    #[error("watch interrupted: {0}")]
    Interrupted(String),

    /// The subscription or its connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The feed ended the subscription.
    #[error("subscription closed by feed")]
    Closed,
}

impl FeedError {
    /// Whether the subscription must be torn down and rebuilt.
    pub fn is_transport_failure(&self) -> bool {
        !matches!(self, FeedError::Interrupted(_))
    }
}

/// A transport able to open subscriptions on a watch key.
pub trait ChangeFeed: Send + Sync + 'static {
    type Subscription: Subscription;

    /// Open a subscription to `key` on `endpoints`.
    fn subscribe(
        &self,
        endpoints: &[String],
        key: &str,
    ) -> impl Future<Output = Result<Self::Subscription, FeedError>> + Send;
}

/// An open subscription. Dropping it releases its resources.
pub trait Subscription: Send + 'static {
    /// Wait for the next batch of events.
    fn next_batch(&mut self) -> impl Future<Output = Result<Vec<WatchEvent>, FeedError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_payload() {
        assert_eq!(WatchEvent::put("k", "[a]\nx=1").reload_payload(), Some("[a]\nx=1"));
        assert_eq!(WatchEvent::put("k", "").reload_payload(), None);
        assert_eq!(WatchEvent::delete("k").reload_payload(), None);

        let odd = WatchEvent {
            kind: EventKind::Delete,
            key: "k".into(),
            value: Some("[a]\nx=1".into()),
        };
        assert_eq!(odd.reload_payload(), None);
    }

    #[test]
    fn test_error_classification() {
        assert!(!FeedError::Interrupted("signal".into()).is_transport_failure());
        assert!(FeedError::Transport("reset".into()).is_transport_failure());
        assert!(FeedError::Closed.is_transport_failure());
        assert_eq!(
            FeedError::Transport("reset".into()).to_string(),
            "transport error: reset"
        );
    }
}
