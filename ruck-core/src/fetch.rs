///! Rate-limited, retrying HTTP fetch client.
///!
///! Every request waits out a pacing delay before it is sent; retryable
///! failures back off exponentially (with jitter) up to a bounded number
///! of attempts. Client errors and format breaks fail on first sight.

use std::time::Duration;

use anyhow::Context;
use rand::Rng;
use reqwest::header;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::config::FetchPolicy;
use crate::error::FetchError;

/// Statuses worth retrying: rate limiting and transient upstream trouble.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Hard ceiling on attempts per request, applied on top of whatever the
/// configured policy asks for.
const ATTEMPT_CEILING: u32 = 5;

const ACCEPT_JSON: &str = "application/json, text/plain, */*";
const ACCEPT_HTML: &str = "text/html, */*";

/// One outbound GET: target URL, query string, extra headers, and whether
/// the 2xx body must parse as JSON.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub expects_json: bool,
}

impl FetchRequest {
    /// Request whose successful body must parse as JSON.
    pub fn json(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            expects_json: true,
        }
    }

    /// Request for a raw HTML or text body.
    pub fn html(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            expects_json: false,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Successful fetch outcome: decoded body plus the declared content type.
#[derive(Debug, Clone)]
pub struct Payload {
    pub body: Body,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Text(String),
}

/// HTTP client wrapper that owns the pacing and retry behavior.
pub struct FetchClient {
    http: reqwest::Client,
    policy: FetchPolicy,
    /// Held across the pre-attempt delay so concurrent callers cannot
    /// collapse the pacing window.
    gate: Mutex<()>,
}

impl FetchClient {
    pub fn new(policy: FetchPolicy) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(policy.timeout_secs))
            .user_agent(&policy.user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            policy,
            gate: Mutex::new(()),
        })
    }

    /// Paced GET with bounded retries.
    ///
    /// Retries 429/5xx and transport failures with capped exponential
    /// backoff. Other non-2xx statuses fail on the first occurrence, as
    /// does a JSON parse failure on a 2xx body.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Payload, FetchError> {
        let max_attempts = effective_attempts(self.policy.max_attempts);

        for attempt in 1..=max_attempts {
            self.pace().await;

            let response = match self.dispatch(request).await {
                Ok(response) => response,
                Err(e) => {
                    if attempt == max_attempts {
                        error!(
                            "Transport failure for {} after {} attempt(s): {}",
                            request.url, attempt, e
                        );
                        return Err(FetchError::Transport {
                            url: request.url.clone(),
                            attempts: attempt,
                            source: e,
                        });
                    }
                    warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt, max_attempts, request.url, e
                    );
                    self.backoff(attempt).await;
                    continue;
                }
            };

            let status = response.status().as_u16();
            if RETRYABLE_STATUSES.contains(&status) {
                if attempt == max_attempts {
                    error!(
                        "Upstream {} from {} after {} attempt(s)",
                        status, request.url, attempt
                    );
                    return Err(FetchError::Status {
                        url: request.url.clone(),
                        status,
                        attempts: attempt,
                    });
                }
                warn!(
                    "Upstream {} on attempt {}/{} for {}",
                    status, attempt, max_attempts, request.url
                );
                self.backoff(attempt).await;
                continue;
            }

            if !response.status().is_success() {
                return Err(FetchError::Status {
                    url: request.url.clone(),
                    status,
                    attempts: attempt,
                });
            }

            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    if attempt == max_attempts {
                        error!(
                            "Body read failed for {} after {} attempt(s): {}",
                            request.url, attempt, e
                        );
                        return Err(FetchError::Transport {
                            url: request.url.clone(),
                            attempts: attempt,
                            source: e,
                        });
                    }
                    warn!(
                        "Body read failed on attempt {}/{} for {}: {}",
                        attempt, max_attempts, request.url, e
                    );
                    self.backoff(attempt).await;
                    continue;
                }
            };

            let body = if request.expects_json {
                match serde_json::from_str(&text) {
                    Ok(value) => Body::Json(value),
                    // A format break is an upstream contract change;
                    // retrying cannot fix it.
                    Err(e) => {
                        return Err(FetchError::InvalidJson {
                            url: request.url.clone(),
                            source: e,
                        });
                    }
                }
            } else {
                Body::Text(text)
            };

            debug!(
                "GET {} -> {} on attempt {}/{}",
                request.url, status, attempt, max_attempts
            );
            return Ok(Payload { body, content_type });
        }

        Err(FetchError::Exhausted {
            url: request.url.clone(),
            attempts: max_attempts,
        })
    }

    /// Fetch a request whose body must be JSON.
    pub async fn fetch_json(&self, request: &FetchRequest) -> Result<Value, FetchError> {
        let payload = self.fetch(request).await?;
        match payload.body {
            Body::Json(value) => Ok(value),
            Body::Text(text) => serde_json::from_str(&text).map_err(|e| {
                FetchError::InvalidJson {
                    url: request.url.clone(),
                    source: e,
                }
            }),
        }
    }

    /// Fetch a request and return its body as text.
    pub async fn fetch_text(&self, request: &FetchRequest) -> Result<String, FetchError> {
        let payload = self.fetch(request).await?;
        match payload.body {
            Body::Text(text) => Ok(text),
            Body::Json(value) => Ok(value.to_string()),
        }
    }

    async fn dispatch(&self, request: &FetchRequest) -> reqwest::Result<reqwest::Response> {
        let accept = if request.expects_json {
            ACCEPT_JSON
        } else {
            ACCEPT_HTML
        };

        let mut builder = self.http.get(&request.url).header(header::ACCEPT, accept);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.send().await
    }

    /// Pre-attempt delay, serialized across callers so concurrent fetches
    /// still respect the pacing window toward the upstream.
    async fn pace(&self) {
        let delay = Duration::from_millis(
            self.policy
                .rate_delay_ms
                .saturating_add(jitter_ms(self.policy.pace_jitter_ms)),
        );
        let _gate = self.gate.lock().await;
        tokio::time::sleep(delay).await;
    }

    async fn backoff(&self, attempt: u32) {
        let delay = Duration::from_millis(
            self.backoff_delay_ms(attempt)
                .saturating_add(jitter_ms(self.policy.backoff_jitter_ms)),
        );
        debug!("Backing off {:?} before attempt {}", delay, attempt + 1);
        tokio::time::sleep(delay).await;
    }

    /// Capped doubling schedule: rate delay, doubled per failed attempt,
    /// never past the configured cap. Jitter is added separately.
    fn backoff_delay_ms(&self, attempt: u32) -> u64 {
        self.policy
            .rate_delay_ms
            .saturating_mul(1u64 << (attempt - 1).min(16))
            .min(self.policy.backoff_cap_ms)
    }
}

/// Attempt budget after the hard ceiling is applied.
fn effective_attempts(requested: u32) -> u32 {
    requested.clamp(1, ATTEMPT_CEILING)
}

/// Sampled in a plain fn so the thread-local RNG never crosses an await.
fn jitter_ms(bound: u64) -> u64 {
    if bound == 0 {
        0
    } else {
        rand::rng().random_range(0..=bound)
    }
}
