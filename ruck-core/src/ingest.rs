///! Ingest pipeline: one facade owning the fetch client and configuration.
///!
///! A match ingest is two sequential fetches (summary JSON, then the lineup
///! page HTML) followed by purely local text processing. The facade builds
///! the upstream URLs from the configured bases so tests can point it at a
///! stub server.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::fetch::{FetchClient, FetchRequest};
use crate::lineup::{assemble_lineups, extract_lineups, normalize_html, MatchLineups};
use crate::scoreboard::{parse_scoreboard, ScoreboardEvent};
use crate::summary::{parse_summary, resolve_teams};

/// Owns the HTTP client and knows the upstream URL layout.
pub struct Ingestor {
    client: FetchClient,
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> anyhow::Result<Self> {
        let client = FetchClient::new(config.fetch.clone())?;
        Ok(Self { client, config })
    }

    /// Fetch and extract the lineups for one match.
    ///
    /// An empty result means the page had no parseable roster, which is
    /// normal for fixtures whose lineups are not published yet. Fetch and
    /// schema failures surface as errors.
    pub async fn match_lineups(
        &self,
        league_id: u32,
        event_id: &str,
    ) -> Result<MatchLineups, IngestError> {
        info!("Ingesting lineups for event {} (league {})", event_id, league_id);

        let summary = self
            .client
            .fetch_json(&self.summary_request(league_id, event_id))
            .await?;
        let directory = resolve_teams(&parse_summary(&summary)?);
        debug!("Summary resolved {} team name(s)", directory.names.len());

        let html = self
            .client
            .fetch_text(&self.lineup_request(league_id, event_id))
            .await?;
        let extracted = extract_lineups(&normalize_html(&html));

        let lineups = assemble_lineups(extracted, &directory, event_id, league_id);
        if lineups.is_empty() {
            info!("No lineup rows found for event {}", event_id);
        } else {
            info!(
                "Extracted lineups for {} team(s): {}",
                lineups.teams.len(),
                lineups.team_order.join(", ")
            );
        }
        Ok(lineups)
    }

    /// List the events on a league's scoreboard for one date.
    pub async fn scoreboard(
        &self,
        league_id: u32,
        date: NaiveDate,
    ) -> Result<Vec<ScoreboardEvent>, IngestError> {
        info!("Fetching scoreboard for league {} on {}", league_id, date);

        let value = self
            .client
            .fetch_json(&self.scoreboard_request(league_id, date))
            .await?;
        let events = parse_scoreboard(&value)?;

        info!("Scoreboard lists {} event(s)", events.len());
        Ok(events)
    }

    fn summary_request(&self, league_id: u32, event_id: &str) -> FetchRequest {
        FetchRequest::json(format!("{}/{}/summary", self.config.site_api_base, league_id))
            .param("event", event_id)
            .param("lang", "en")
            .param("region", self.config.region.as_str())
            .param("contentorigin", "espn")
            .header("Origin", self.config.web_base.as_str())
            .header("Referer", format!("{}/", self.config.web_base))
    }

    fn lineup_request(&self, league_id: u32, event_id: &str) -> FetchRequest {
        FetchRequest::html(format!(
            "{}/rugby/lineups/_/gameId/{}/league/{}",
            self.config.web_base, event_id, league_id
        ))
    }

    fn scoreboard_request(&self, league_id: u32, date: NaiveDate) -> FetchRequest {
        FetchRequest::json(format!(
            "{}/{}/scoreboard",
            self.config.site_api_base, league_id
        ))
        .param("dates", date.format("%Y%m%d").to_string())
        .param("lang", "en")
        .param("region", self.config.region.as_str())
        .param("contentorigin", "espn")
        .header("Origin", self.config.web_base.as_str())
        .header("Referer", format!("{}/", self.config.web_base))
    }
}
