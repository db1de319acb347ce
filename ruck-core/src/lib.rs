///! ruck-core: rugby lineup ingestion from uncooperative public upstreams.
///!
///! The pipeline for one match:
///!
///!   fetch summary JSON -> resolve team identities
///!   fetch lineup HTML  -> normalize to text -> extract team blocks
///!                      -> assemble the ordered, named lineups
///!
///! The fetch client paces and retries; the lineup grammar works on the
///! page's visual line structure because the upstream guarantees no stable
///! DOM. Persistence and analytics are the caller's concern.

pub mod config;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod lineup;
pub mod scoreboard;
pub mod summary;

pub use config::{FetchPolicy, IngestConfig};
pub use error::{FetchError, IngestError};
pub use fetch::{Body, FetchClient, FetchRequest, Payload};
pub use ingest::Ingestor;
pub use lineup::{MatchLineups, PlayerEntry, TeamLineup};
pub use scoreboard::ScoreboardEvent;
pub use summary::TeamDirectory;
