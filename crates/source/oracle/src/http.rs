use crate::{FeedSource, FetchError};
use async_trait::async_trait;
use herald_types_events::EventRecord;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("herald/", env!("CARGO_PKG_VERSION"));

/// Plain HTTP GET against oracle feeds returning a JSON array of records
#[derive(Clone, Debug)]
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<EventRecord>, FetchError> {
        let response = self.client.get(url).send().await.map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Transport { url: url.to_string(), source })?;
        let records = parse_records(url, &body)?;
        debug!(%url, records = records.len(), "Fetched feed");
        Ok(records)
    }
}

fn parse_records(url: &str, body: &[u8]) -> Result<Vec<EventRecord>, FetchError> {
    let malformed = |reason: String| FetchError::Malformed { url: url.to_string(), reason };

    let value: Value = serde_json::from_slice(body).map_err(|e| malformed(format!("invalid JSON: {e}")))?;
    let Value::Array(items) = value else {
        return Err(malformed("expected a JSON array".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| EventRecord::try_from(item).map_err(|_| malformed(format!("element {idx} is not an object"))))
        .collect()
}
