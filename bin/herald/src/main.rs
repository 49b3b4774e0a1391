use crate::arguments::{AppArgs, CheckArgs, Command, RunArgs};
use clap::Parser;
use eyre::WrapErr;
use herald::broadcast::twitter::{DryRunPublisher, OAuth1Credentials, Publisher, TwitterPublisher};
use herald::core::config::{HeraldConfig, TwitterConfig};
use herald::core::orchestrator::{CycleOrchestrator, Feed, OrchestratorSettings};
use herald::render::message::MessageRenderer;
use herald::source::oracle::HttpFeedSource;
use herald::storage::ledger::{DedupLedger, JsonFileStore, LedgerStore, MemoryStore};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

mod arguments;

fn main() -> eyre::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let fmt_layer = fmt::Layer::default().with_thread_ids(true).with_file(false).with_line_number(true).with_filter(env_filter);
    tracing_subscriber::registry().with(fmt_layer).init();

    let app_args = AppArgs::parse();
    match app_args.command {
        Command::Run(args) => {
            // one tick never runs concurrently with another
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(run(args))
        }
        Command::Check(args) => check(args),
    }
}

async fn run(args: RunArgs) -> eyre::Result<()> {
    let config = HeraldConfig::load_from_file_async(&args.config)
        .await
        .wrap_err_with(|| format!("Failed to load config from {}", args.config.display()))?;
    config.validate(!args.dry_run).wrap_err("Invalid configuration")?;

    let settings = &config.herald;
    let feeds: Vec<Feed> = config.feeds.iter().map(|feed| Feed::from_config(feed, settings.scan_depth)).collect();
    let source = HttpFeedSource::new(settings.fetch_timeout())?;
    let renderer = MessageRenderer::new()
        .with_slot_url(settings.slot_url.clone())
        .with_tx_url(settings.tx_url.clone())
        .with_max_len(settings.max_message_len);

    let file_store = JsonFileStore::new(settings.ledger_path.clone());
    let (publisher, store): (Box<dyn Publisher>, Box<dyn LedgerStore>) = if args.dry_run {
        info!(ledger = %file_store.path().display(), "Dry run, nothing will be posted or persisted");
        let snapshot = file_store.load().unwrap_or_default();
        (Box::new(DryRunPublisher::new()), Box::new(MemoryStore::with_entries(snapshot)))
    } else {
        let publisher = TwitterPublisher::new(&config.twitter.api_url, credentials(&config.twitter))?
            .with_default_backoff(settings.rate_limit_backoff());
        (Box::new(publisher), Box::new(file_store))
    };

    let mut orchestrator =
        CycleOrchestrator::new(feeds, source, publisher, DedupLedger::open(store), renderer, OrchestratorSettings::from(settings));

    if args.once {
        let report = orchestrator.tick().await;
        info!(?report, "Single tick finished");
        return Ok(());
    }
    orchestrator.run().await
}

fn check(args: CheckArgs) -> eyre::Result<()> {
    let config =
        HeraldConfig::load_from_file(&args.config).wrap_err_with(|| format!("Failed to load config from {}", args.config.display()))?;
    config.validate(!args.skip_credentials).wrap_err("Invalid configuration")?;

    let ledger = DedupLedger::open(JsonFileStore::new(config.herald.ledger_path.clone()));

    println!("Configuration {} is valid", args.config.display());
    println!("Ledger: {}", config.herald.ledger_path.display());
    for feed in &config.feeds {
        let last_id = ledger.last_id(&feed.name).map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
        println!("  {:<20} {:<10} {:<7} last_id={:<12} {}", feed.name, feed.source, feed.selection, last_id, feed.url);
    }
    Ok(())
}

fn credentials(twitter: &TwitterConfig) -> OAuth1Credentials {
    OAuth1Credentials {
        consumer_key: twitter.consumer_key.clone(),
        consumer_secret: twitter.consumer_secret.clone(),
        access_token: twitter.access_token.clone(),
        access_token_secret: twitter.access_token_secret.clone(),
    }
}
