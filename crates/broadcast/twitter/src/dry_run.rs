use crate::{PublishOutcome, Publisher};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Logs messages instead of posting them
#[derive(Debug, Default)]
pub struct DryRunPublisher {
    counter: AtomicU64,
}

impl DryRunPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn publish(&self, text: &str) -> PublishOutcome {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        info!(n, "Dry run, not posting:\n{text}");
        PublishOutcome::Success(format!("dry-run-{n}"))
    }

    fn name(&self) -> &'static str {
        "DryRunPublisher"
    }
}
