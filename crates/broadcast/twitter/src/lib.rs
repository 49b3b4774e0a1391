pub use dry_run::DryRunPublisher;
pub use oauth::{OAuth1Credentials, OAuth1Signer};
pub use publisher::{PublishOutcome, Publisher};
pub use twitter::{DEFAULT_API_URL, DEFAULT_RATE_LIMIT_BACKOFF, TwitterPublisher, TwitterSetupError};

mod dry_run;
mod oauth;
mod publisher;
mod twitter;
