use crate::{OAuth1Credentials, OAuth1Signer, PublishOutcome, Publisher};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.twitter.com";
pub const DEFAULT_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(60);

const TWEETS_PATH: &str = "2/tweets";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const RETRY_AFTER: &str = "retry-after";
const RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

#[derive(Debug, Error)]
pub enum TwitterSetupError {
    #[error("invalid api url {url}: {source}")]
    InvalidApiUrl { url: String, source: url::ParseError },
    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct CreateTweet<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Deserialize)]
struct CreatedTweet {
    id: String,
}

#[derive(Default, Deserialize)]
struct ApiProblem {
    detail: Option<String>,
    title: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Deserialize)]
struct ApiErrorEntry {
    message: Option<String>,
}

/// Posts to the v2 `POST /2/tweets` endpoint with OAuth 1.0a user context.
#[derive(Clone, Debug)]
pub struct TwitterPublisher {
    client: Client,
    endpoint: Url,
    signer: OAuth1Signer,
    default_backoff: Duration,
}

impl TwitterPublisher {
    pub fn new(api_url: &str, credentials: OAuth1Credentials) -> Result<Self, TwitterSetupError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Self::with_client(client, api_url, credentials)
    }

    pub fn with_client(client: Client, api_url: &str, credentials: OAuth1Credentials) -> Result<Self, TwitterSetupError> {
        let invalid = |source| TwitterSetupError::InvalidApiUrl { url: api_url.to_string(), source };
        let base = if api_url.ends_with('/') { api_url.to_string() } else { format!("{api_url}/") };
        let endpoint = Url::parse(&base).and_then(|base| base.join(TWEETS_PATH)).map_err(invalid)?;

        Ok(Self { client, endpoint, signer: OAuth1Signer::new(credentials), default_backoff: DEFAULT_RATE_LIMIT_BACKOFF })
    }

    /// Wait applied on a 429 that carries no usable rate limit headers
    pub fn with_default_backoff(mut self, default_backoff: Duration) -> Self {
        self.default_backoff = default_backoff;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn retry_after(&self, headers: &HeaderMap) -> Duration {
        if let Some(secs) = header_u64(headers, RETRY_AFTER) {
            return Duration::from_secs(secs.max(1));
        }
        if let Some(reset) = header_u64(headers, RATE_LIMIT_RESET) {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            return Duration::from_secs(reset.saturating_sub(now).max(1));
        }
        self.default_backoff
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

fn problem_reason(status: StatusCode, body: &[u8]) -> String {
    let problem: ApiProblem = serde_json::from_slice(body).unwrap_or_default();
    problem
        .detail
        .or(problem.title)
        .or_else(|| problem.errors.into_iter().find_map(|entry| entry.message))
        .map(|reason| format!("{status}: {reason}"))
        .unwrap_or_else(|| status.to_string())
}

#[async_trait]
impl Publisher for TwitterPublisher {
    async fn publish(&self, text: &str) -> PublishOutcome {
        let authorization = self.signer.authorization_header("POST", &self.endpoint);
        let request = self.client.post(self.endpoint.clone()).header(AUTHORIZATION, authorization).json(&CreateTweet { text });

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Tweet request failed");
                return PublishOutcome::TransportError(e.to_string());
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = self.retry_after(response.headers());
            warn!(retry_after_secs = retry_after.as_secs(), "Rate limited by Twitter");
            return PublishOutcome::RateLimited(retry_after);
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                error!(%status, error = %e, "Failed to read Twitter response");
                return PublishOutcome::TransportError(e.to_string());
            }
        };

        if status.is_success() {
            return match serde_json::from_slice::<CreateTweetResponse>(&body) {
                Ok(created) => {
                    info!(tweet_id = %created.data.id, "Tweet posted");
                    PublishOutcome::Success(created.data.id)
                }
                Err(e) => {
                    // The post went through, only the id is lost
                    warn!(%status, error = %e, "Tweet posted but response could not be parsed");
                    PublishOutcome::Success(String::new())
                }
            };
        }

        let reason = problem_reason(status, &body);
        if status.is_client_error() {
            error!(%reason, "Tweet rejected");
            PublishOutcome::Rejected(reason)
        } else {
            debug!(body = %String::from_utf8_lossy(&body), "Twitter error body");
            error!(%reason, "Twitter server error");
            PublishOutcome::TransportError(reason)
        }
    }

    fn name(&self) -> &'static str {
        "TwitterPublisher"
    }
}
