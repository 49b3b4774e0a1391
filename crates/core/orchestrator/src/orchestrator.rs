use crate::Feed;
use eyre::Result;
use herald_broadcast_twitter::{PublishOutcome, Publisher};
use herald_core_config::{FeedSelection, HeraldSettings};
use herald_render_message::{MessageRenderer, RotationState};
use herald_source_oracle::FeedSource;
use herald_storage_ledger::{DedupLedger, LedgerStore};
use herald_types_events::{ClassifiedEvent, EventId, EventRecord, classify, record_id};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub poll_interval: Duration,
    /// Backoff applied when the publisher reports a rate limit without a delay
    pub rate_limit_backoff: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(300), rate_limit_backoff: Duration::from_secs(60) }
    }
}

impl From<&HeraldSettings> for OrchestratorSettings {
    fn from(settings: &HeraldSettings) -> Self {
        Self { poll_interval: settings.poll_interval(), rate_limit_backoff: settings.rate_limit_backoff() }
    }
}

/// Counters for one pass over every feed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub published: usize,
    /// Unpublishable, already published or repeated records
    pub skipped: usize,
    /// Left for a later tick because of a rate limit
    pub deferred: usize,
    /// Fetch, publish or ledger failures
    pub failed: usize,
}

enum Flow {
    Continue,
    Stop,
}

/// Drives feeds through fetch, classify, dedup, render, publish and commit.
///
/// Owns the ledger, the rotation state and the rate limit deadline. Feeds are
/// processed one after the other and a failing feed never stops the others.
pub struct CycleOrchestrator<F, P, S> {
    feeds: Vec<Feed>,
    source: F,
    publisher: P,
    ledger: DedupLedger<S>,
    renderer: MessageRenderer,
    rotation: RotationState,
    backoff_until: Option<Instant>,
    settings: OrchestratorSettings,
}

impl<F, P, S> CycleOrchestrator<F, P, S>
where
    F: FeedSource,
    P: Publisher,
    S: LedgerStore,
{
    pub fn new(
        feeds: Vec<Feed>,
        source: F,
        publisher: P,
        ledger: DedupLedger<S>,
        renderer: MessageRenderer,
        settings: OrchestratorSettings,
    ) -> Self {
        Self { feeds, source, publisher, ledger, renderer, rotation: RotationState::random(), backoff_until: None, settings }
    }

    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn ledger(&self) -> &DedupLedger<S> {
        &self.ledger
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn backoff_until(&self) -> Option<Instant> {
        self.backoff_until
    }

    /// Tick every `poll_interval` until Ctrl-C. The first tick runs immediately.
    pub async fn run(mut self) -> Result<()> {
        info!(
            feeds = self.feeds.len(),
            poll_interval_secs = self.settings.poll_interval.as_secs(),
            publisher = self.publisher.name(),
            "Starting cycle orchestrator"
        );

        let mut interval = tokio::time::interval(self.settings.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                result = &mut shutdown => {
                    result?;
                    info!("Shutdown requested, stopping");
                    break;
                }
            }
        }

        Ok(())
    }

    /// One pass over every feed
    pub async fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        let feeds = std::mem::take(&mut self.feeds);
        for feed in &feeds {
            self.process_feed(feed, &mut report).await;
        }
        self.feeds = feeds;

        info!(
            published = report.published,
            skipped = report.skipped,
            deferred = report.deferred,
            failed = report.failed,
            "Tick complete"
        );
        report
    }

    async fn process_feed(&mut self, feed: &Feed, report: &mut TickReport) {
        let records = match self.source.fetch(&feed.url).await {
            Ok(records) => records,
            Err(e) => {
                warn!(feed = %feed.name, error = %e, "Fetch failed, skipping feed this tick");
                report.failed += 1;
                return;
            }
        };

        let candidates = match feed.selection {
            FeedSelection::Latest => self.select_latest(feed, &records, report),
            FeedSelection::Scan => self.select_scan(feed, &records, report),
        };

        for event in &candidates {
            if let Flow::Stop = self.publish_event(feed, event, report).await {
                break;
            }
        }
    }

    fn select_latest(&self, feed: &Feed, records: &[EventRecord], report: &mut TickReport) -> Vec<ClassifiedEvent> {
        let Some(record) = records.last() else {
            debug!(feed = %feed.name, "Feed is empty");
            return Vec::new();
        };
        self.admit(feed, record, report).into_iter().collect()
    }

    /// New records among the leading `scan_depth` ones, oldest first
    fn select_scan(&self, feed: &Feed, records: &[EventRecord], report: &mut TickReport) -> Vec<ClassifiedEvent> {
        let last_id = self.ledger.last_id(&feed.name).unwrap_or_default();
        let fresh: Vec<&EventRecord> =
            records.iter().take(feed.scan_depth).take_while(|record| record_id(record) != Some(last_id)).collect();

        if last_id != 0 && fresh.len() == feed.scan_depth && records.len() > feed.scan_depth {
            warn!(feed = %feed.name, last_id, scan_depth = feed.scan_depth, "Last published id not found in scan window, older events are dropped");
        }

        fresh.into_iter().rev().filter_map(|record| self.admit(feed, record, report)).collect()
    }

    fn admit(&self, feed: &Feed, record: &EventRecord, report: &mut TickReport) -> Option<ClassifiedEvent> {
        let event = classify(record, feed.source);
        if let ClassifiedEvent::Unpublishable(reason) = &event {
            debug!(feed = %feed.name, id = ?record_id(record), %reason, "Skipping unpublishable record");
            report.skipped += 1;
            return None;
        }

        let id = event.id()?;
        if !self.ledger.is_new(&feed.name, id) {
            debug!(feed = %feed.name, id, "Already published");
            report.skipped += 1;
            return None;
        }
        Some(event)
    }

    async fn publish_event(&mut self, feed: &Feed, event: &ClassifiedEvent, report: &mut TickReport) -> Flow {
        let Some(id) = event.id() else {
            return Flow::Continue;
        };
        // a feed may list the same id twice, e.g. two donations in one block
        if !self.ledger.is_new(&feed.name, id) {
            match event {
                ClassifiedEvent::DonationReceived(donation) => {
                    info!(feed = %feed.name, id, tx_hash = %donation.tx_hash, "Donation shares an already published id, dropping")
                }
                _ => debug!(feed = %feed.name, id, "Duplicate id in feed"),
            }
            report.skipped += 1;
            return Flow::Continue;
        }

        if let Some(until) = self.backoff_until {
            let remaining = until.saturating_duration_since(Instant::now());
            if !remaining.is_zero() {
                debug!(feed = %feed.name, id, remaining_secs = remaining.as_secs(), "Rate limit backoff active, deferring");
                report.deferred += 1;
                return Flow::Stop;
            }
            info!("Rate limit backoff elapsed, resuming publication");
            self.backoff_until = None;
        }

        let Some((text, rotation)) = self.renderer.render(event, self.rotation) else {
            report.skipped += 1;
            return Flow::Continue;
        };
        self.rotation = rotation;

        if self.ledger.is_repeat(&feed.name, &text) {
            info!(feed = %feed.name, id, "Message identical to the last one published, recording without posting");
            report.skipped += 1;
            return self.commit(feed, id, None, report);
        }

        match self.publisher.publish(&text).await {
            PublishOutcome::Success(remote_id) => {
                info!(feed = %feed.name, id, %remote_id, publisher = self.publisher.name(), "Published event");
                report.published += 1;
                self.commit(feed, id, Some(&text), report)
            }
            PublishOutcome::RateLimited(retry_after) => {
                let backoff = if retry_after.is_zero() { self.settings.rate_limit_backoff } else { retry_after };
                warn!(feed = %feed.name, id, backoff_secs = backoff.as_secs(), "Rate limited, pausing publication");
                self.backoff_until = Some(Instant::now() + backoff);
                report.deferred += 1;
                Flow::Stop
            }
            PublishOutcome::Rejected(reason) => {
                error!(feed = %feed.name, id, %reason, "Publication rejected, retrying next tick");
                report.failed += 1;
                Flow::Stop
            }
            PublishOutcome::TransportError(reason) => {
                warn!(feed = %feed.name, id, %reason, "Publication failed, retrying next tick");
                report.failed += 1;
                Flow::Stop
            }
        }
    }

    fn commit(&mut self, feed: &Feed, id: EventId, message: Option<&str>, report: &mut TickReport) -> Flow {
        match self.ledger.commit(&feed.name, id, message) {
            Ok(()) => Flow::Continue,
            Err(e) => {
                error!(feed = %feed.name, id, error = %e, "Failed to persist ledger, aborting feed for this tick");
                report.failed += 1;
                Flow::Stop
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use herald_source_oracle::FetchError;
    use herald_storage_ledger::{LedgerSnapshot, MemoryStore};
    use herald_types_events::RecordSource;
    use serde_json::{Value, json};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PROPOSED_URL: &str = "http://oracle.test/memory/proposedblocks";
    const WRONG_FEE_URL: &str = "http://oracle.test/memory/wrongfeeblocks";
    const DONATIONS_URL: &str = "http://oracle.test/memory/donations";

    #[derive(Default)]
    struct FakeSource {
        responses: Mutex<HashMap<String, Vec<EventRecord>>>,
        fetches: AtomicUsize,
    }

    impl FakeSource {
        fn set(&self, url: &str, records: Vec<Value>) {
            let records = records.into_iter().map(|value| EventRecord::try_from(value).unwrap()).collect();
            self.responses.lock().unwrap().insert(url.to_string(), records);
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<Vec<EventRecord>, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Malformed { url: url.to_string(), reason: "unreachable".to_string() })
        }
    }

    #[derive(Default)]
    struct ScriptedPublisher {
        script: Mutex<VecDeque<PublishOutcome>>,
        attempts: Mutex<Vec<String>>,
    }

    impl ScriptedPublisher {
        fn push(&self, outcome: PublishOutcome) {
            self.script.lock().unwrap().push_back(outcome);
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Publisher for ScriptedPublisher {
        async fn publish(&self, text: &str) -> PublishOutcome {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(text.to_string());
            let n = attempts.len();
            self.script.lock().unwrap().pop_front().unwrap_or_else(|| PublishOutcome::Success(format!("tweet-{n}")))
        }

        fn name(&self) -> &'static str {
            "ScriptedPublisher"
        }
    }

    type TestOrchestrator = CycleOrchestrator<FakeSource, ScriptedPublisher, MemoryStore>;

    fn orchestrator(feeds: Vec<Feed>, ledger: &[(&str, EventId)]) -> TestOrchestrator {
        let snapshot: LedgerSnapshot = ledger.iter().map(|(feed, id)| (feed.to_string(), *id)).collect();
        CycleOrchestrator::new(
            feeds,
            FakeSource::default(),
            ScriptedPublisher::default(),
            DedupLedger::open(MemoryStore::with_entries(snapshot)),
            MessageRenderer::new(),
            OrchestratorSettings::default(),
        )
        .with_rotation(RotationState::new(0))
    }

    fn proposed_feed() -> Feed {
        Feed::latest("proposed_blocks", PROPOSED_URL, RecordSource::Oracle)
    }

    fn wrong_fee_feed() -> Feed {
        Feed::latest("wrong_fee_blocks", WRONG_FEE_URL, RecordSource::Oracle)
    }

    fn donations_feed(depth: usize) -> Feed {
        Feed::scan("donations", DONATIONS_URL, RecordSource::Donations, depth)
    }

    fn proposal(block: u64, slot: u64) -> Value {
        json!({"block": block, "block_type": "okpoolproposal", "reward_wei": "150000000000000000", "validator_index": 7, "slot": slot})
    }

    fn wrong_fee(block: u64) -> Value {
        json!({
            "block": block,
            "block_type": "wrongfeerecipient",
            "reward_wei": "123456789000000000",
            "slot": 999,
            "withdrawal_address": "0xabcdef0123456789abcdef0123456789abcdef01"
        })
    }

    fn donation(block: u64) -> Value {
        json!({
            "block_number": block,
            "sender": "0x1234567890abcdef1234567890abcdef12345678",
            "amount_wei": "1000000000000000000",
            "tx_hash": format!("0xtx{block}")
        })
    }

    #[tokio::test]
    async fn test_new_block_is_published_and_committed() {
        let mut orchestrator = orchestrator(vec![proposed_feed()], &[("proposed_blocks", 99)]);
        orchestrator.source().set(PROPOSED_URL, vec![proposal(100, 555)]);

        let report = orchestrator.tick().await;

        assert_eq!(report, TickReport { published: 1, ..Default::default() });
        let attempts = orchestrator.publisher().attempts();
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].contains("0.1500 ETH"));
        assert!(attempts[0].contains("Proposer validator index: 7"));
        assert!(attempts[0].contains("555"));
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), Some(100));
        assert_eq!(orchestrator.ledger().store().snapshot().get("proposed_blocks"), Some(&100));
        assert_eq!(orchestrator.rotation(), RotationState::new(1));
    }

    #[tokio::test]
    async fn test_same_block_is_not_published_twice() {
        let mut orchestrator = orchestrator(vec![proposed_feed()], &[]);
        orchestrator.source().set(PROPOSED_URL, vec![proposal(99, 554), proposal(100, 555)]);

        assert_eq!(orchestrator.tick().await.published, 1);
        let report = orchestrator.tick().await;

        assert_eq!(report, TickReport { skipped: 1, ..Default::default() });
        assert_eq!(orchestrator.publisher().attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_only_last_element_of_latest_feed_counts() {
        let mut orchestrator = orchestrator(vec![proposed_feed()], &[("proposed_blocks", 99)]);
        orchestrator.source().set(PROPOSED_URL, vec![proposal(100, 555), proposal(99, 554)]);

        let report = orchestrator.tick().await;
        assert_eq!(report, TickReport { skipped: 1, ..Default::default() });
        assert!(orchestrator.publisher().attempts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_feed_is_quiet() {
        let mut orchestrator = orchestrator(vec![proposed_feed()], &[]);
        orchestrator.source().set(PROPOSED_URL, vec![]);

        assert_eq!(orchestrator.tick().await, TickReport::default());
    }

    #[tokio::test]
    async fn test_unpublishable_record_is_skipped() {
        let mut orchestrator = orchestrator(vec![proposed_feed()], &[("proposed_blocks", 99)]);
        orchestrator.source().set(PROPOSED_URL, vec![json!({"block": 100, "block_type": "okpoolproposal", "slot": 555})]);

        let report = orchestrator.tick().await;

        assert_eq!(report, TickReport { skipped: 1, ..Default::default() });
        assert!(orchestrator.publisher().attempts().is_empty());
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), Some(99));
    }

    #[tokio::test]
    async fn test_fetch_failure_does_not_block_other_feeds() {
        let mut orchestrator = orchestrator(vec![proposed_feed(), wrong_fee_feed()], &[]);
        orchestrator.source().set(WRONG_FEE_URL, vec![wrong_fee(200)]);

        let report = orchestrator.tick().await;

        assert_eq!(report, TickReport { published: 1, failed: 1, ..Default::default() });
        let attempts = orchestrator.publisher().attempts();
        assert!(attempts[0].contains("0xabcd...ef01 has been banned"));
        assert!(attempts[0].contains("0.1235 ETH"));
        assert_eq!(orchestrator.ledger().last_id("wrong_fee_blocks"), Some(200));
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), None);
    }

    #[tokio::test]
    async fn test_failed_publish_is_retried_next_tick() {
        let mut orchestrator = orchestrator(vec![proposed_feed()], &[("proposed_blocks", 99)]);
        orchestrator.source().set(PROPOSED_URL, vec![proposal(100, 555)]);
        orchestrator.publisher().push(PublishOutcome::Rejected("403 Forbidden".to_string()));
        orchestrator.publisher().push(PublishOutcome::TransportError("connection reset".to_string()));

        assert_eq!(orchestrator.tick().await, TickReport { failed: 1, ..Default::default() });
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), Some(99));

        assert_eq!(orchestrator.tick().await, TickReport { failed: 1, ..Default::default() });
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), Some(99));

        assert_eq!(orchestrator.tick().await, TickReport { published: 1, ..Default::default() });
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), Some(100));
        assert_eq!(orchestrator.publisher().attempts().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_defers_without_committing() {
        let mut orchestrator = orchestrator(vec![proposed_feed(), wrong_fee_feed()], &[("proposed_blocks", 99)]);
        orchestrator.source().set(PROPOSED_URL, vec![proposal(100, 555)]);
        orchestrator.source().set(WRONG_FEE_URL, vec![wrong_fee(200)]);
        orchestrator.publisher().push(PublishOutcome::RateLimited(Duration::from_secs(60)));

        // the second feed is deferred as well
        let report = orchestrator.tick().await;
        assert_eq!(report, TickReport { deferred: 2, ..Default::default() });
        assert_eq!(orchestrator.publisher().attempts().len(), 1);
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), Some(99));
        assert!(orchestrator.backoff_until().is_some());

        tokio::time::advance(Duration::from_secs(30)).await;
        let report = orchestrator.tick().await;
        assert_eq!(report, TickReport { deferred: 2, ..Default::default() });
        assert_eq!(orchestrator.publisher().attempts().len(), 1);
        assert_eq!(orchestrator.source().fetches(), 4);

        tokio::time::advance(Duration::from_secs(31)).await;
        let report = orchestrator.tick().await;
        assert_eq!(report, TickReport { published: 2, ..Default::default() });
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), Some(100));
        assert_eq!(orchestrator.ledger().last_id("wrong_fee_blocks"), Some(200));
        assert!(orchestrator.backoff_until().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_without_delay_uses_configured_backoff() {
        let mut orchestrator = orchestrator(vec![proposed_feed()], &[]);
        orchestrator.source().set(PROPOSED_URL, vec![proposal(100, 555)]);
        orchestrator.publisher().push(PublishOutcome::RateLimited(Duration::ZERO));

        let before = Instant::now();
        orchestrator.tick().await;
        assert_eq!(orchestrator.backoff_until(), Some(before + Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_ledger_write_failure_aborts_feed_but_is_remembered() {
        let mut orchestrator = orchestrator(vec![proposed_feed()], &[("proposed_blocks", 99)]);
        orchestrator.source().set(PROPOSED_URL, vec![proposal(100, 555)]);
        orchestrator.ledger().store().set_fail_writes(true);

        let report = orchestrator.tick().await;

        assert_eq!(report, TickReport { published: 1, failed: 1, ..Default::default() });
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), Some(100));
        assert_eq!(orchestrator.ledger().store().snapshot().get("proposed_blocks"), Some(&99));

        orchestrator.tick().await;
        assert_eq!(orchestrator.publisher().attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_scan_publishes_burst_oldest_first() {
        let mut orchestrator = orchestrator(vec![donations_feed(3)], &[("donations", 103)]);
        orchestrator.source().set(DONATIONS_URL, vec![donation(105), donation(104), donation(103), donation(102)]);

        let report = orchestrator.tick().await;

        assert_eq!(report, TickReport { published: 2, ..Default::default() });
        let attempts = orchestrator.publisher().attempts();
        assert!(attempts[0].ends_with("0xtx104"));
        assert!(attempts[1].ends_with("0xtx105"));
        assert!(attempts[0].contains("0x1234...5678 donated 1.0000 ETH"));
        assert_eq!(orchestrator.ledger().last_id("donations"), Some(105));

        assert_eq!(orchestrator.tick().await, TickReport::default());
    }

    #[tokio::test]
    async fn test_scan_is_bounded_by_depth() {
        let mut orchestrator = orchestrator(vec![donations_feed(3)], &[("donations", 100)]);
        orchestrator.source().set(DONATIONS_URL, (100..=105).rev().map(donation).collect());

        let report = orchestrator.tick().await;

        assert_eq!(report.published, 3);
        let attempts = orchestrator.publisher().attempts();
        assert!(attempts[0].ends_with("0xtx103"));
        assert!(attempts[2].ends_with("0xtx105"));
    }

    #[tokio::test]
    async fn test_scan_stops_at_first_failure() {
        let mut orchestrator = orchestrator(vec![donations_feed(6)], &[("donations", 100)]);
        orchestrator.source().set(DONATIONS_URL, (100..=103).rev().map(donation).collect());
        orchestrator.publisher().push(PublishOutcome::Success("1".to_string()));
        orchestrator.publisher().push(PublishOutcome::TransportError("timeout".to_string()));

        let report = orchestrator.tick().await;
        assert_eq!(report, TickReport { published: 1, failed: 1, ..Default::default() });
        assert_eq!(orchestrator.publisher().attempts().len(), 2);
        assert_eq!(orchestrator.ledger().last_id("donations"), Some(101));

        let report = orchestrator.tick().await;
        assert_eq!(report.published, 2);
        assert_eq!(orchestrator.ledger().last_id("donations"), Some(103));
    }

    #[tokio::test]
    async fn test_scan_keeps_one_event_per_id() {
        let mut orchestrator = orchestrator(vec![donations_feed(6)], &[("donations", 100)]);
        let mut first = donation(105);
        first["tx_hash"] = json!("0xA");
        let mut second = donation(105);
        second["tx_hash"] = json!("0xB");
        orchestrator.source().set(DONATIONS_URL, vec![first, second, donation(100)]);

        let report = orchestrator.tick().await;

        assert_eq!(report, TickReport { published: 1, skipped: 1, ..Default::default() });
        let attempts = orchestrator.publisher().attempts();
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].ends_with("/tx/0xB"));
        assert_eq!(orchestrator.ledger().last_id("donations"), Some(105));
    }

    #[tokio::test]
    async fn test_identical_message_is_recorded_without_posting() {
        let mut orchestrator = orchestrator(vec![proposed_feed()], &[("proposed_blocks", 99)]);
        orchestrator.source().set(PROPOSED_URL, vec![proposal(100, 555)]);
        orchestrator.tick().await;

        // same slot and rotation produce the exact same text
        orchestrator.rotation = RotationState::new(0);
        orchestrator.source().set(PROPOSED_URL, vec![proposal(101, 555)]);
        let report = orchestrator.tick().await;

        assert_eq!(report, TickReport { skipped: 1, ..Default::default() });
        assert_eq!(orchestrator.publisher().attempts().len(), 1);
        assert_eq!(orchestrator.ledger().last_id("proposed_blocks"), Some(101));
    }
}
