///! Failure taxonomy for the ingestion core.

use thiserror::Error;

/// Terminal outcomes of the fetch client, produced once the retry budget
/// for a request has been spent or a non-retryable verdict was reached.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx status: client errors on the first occurrence, retryable
    /// statuses once every attempt has been used up.
    #[error("HTTP {status} from {url} after {attempts} attempt(s)")]
    Status {
        url: String,
        status: u16,
        attempts: u32,
    },

    /// Connect, timeout, or body-read failure that survived every retry.
    #[error("transport error for {url} after {attempts} attempt(s)")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// 2xx response whose body was expected to be JSON but did not parse.
    /// Retrying cannot fix a format break, so this is immediate.
    #[error("invalid JSON from {url}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The retry loop ran out of attempts without a terminal verdict.
    /// Named rather than treated as unreachable.
    #[error("retry budget exhausted for {url} after {attempts} attempt(s)")]
    Exhausted { url: String, attempts: u32 },
}

impl FetchError {
    /// Status code carried by this failure, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// How many attempts the client performed before giving up.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            FetchError::Status { attempts, .. }
            | FetchError::Transport { attempts, .. }
            | FetchError::Exhausted { attempts, .. } => Some(*attempts),
            FetchError::InvalidJson { .. } => None,
        }
    }
}

/// Failures surfaced by the ingestion pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Summary JSON parsed but its expected top-level structure is gone.
    /// This signals an upstream contract change, never an empty fixture.
    #[error("unexpected summary payload: {detail}")]
    SummaryShape { detail: String },

    /// Scoreboard JSON parsed but its expected top-level structure is gone.
    #[error("unexpected scoreboard payload: {detail}")]
    ScoreboardShape { detail: String },
}
