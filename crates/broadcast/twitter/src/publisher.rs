use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Result of one publication attempt. Only `Success` may advance the dedup ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Posted, with the id assigned by the remote side
    Success(String),
    /// Throttled. Nothing should be posted before `retry_after` has elapsed.
    RateLimited(Duration),
    /// Refused by the remote side (auth, permissions, duplicate content...)
    Rejected(String),
    /// Never reached a definitive answer: connection error, timeout, server error
    TransportError(String),
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Success(_))
    }
}

impl Display for PublishOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishOutcome::Success(id) => write!(f, "published as {id}"),
            PublishOutcome::RateLimited(retry_after) => write!(f, "rate limited, retry after {}s", retry_after.as_secs()),
            PublishOutcome::Rejected(reason) => write!(f, "rejected: {reason}"),
            PublishOutcome::TransportError(reason) => write!(f, "transport error: {reason}"),
        }
    }
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, text: &str) -> PublishOutcome;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: Publisher + ?Sized> Publisher for Box<T> {
    async fn publish(&self, text: &str) -> PublishOutcome {
        (**self).publish(text).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
