///! Lineup data types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One parsed roster row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Jersey number, 1 through 99
    pub jersey: u8,
    /// Player name as printed on the page, e.g. "Antoine Dupont"
    pub name: String,
    /// Position code, e.g. "SH" or "N8"
    pub position: String,
}

/// One team's roster for a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLineup {
    /// Abbreviation as it appeared on the lineup page, e.g. "SCO"
    pub abbreviation: String,
    /// Resolved display name. Falls back to the abbreviation when the
    /// match summary does not know the team.
    pub display_name: String,
    /// Starting side in page order. Usually fifteen entries, but the
    /// upstream occasionally publishes short.
    pub starters: Vec<PlayerEntry>,
    /// Bench, page order
    pub replacements: Vec<PlayerEntry>,
}

/// Everything extracted for one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchLineups {
    pub event_id: String,
    pub league_id: u32,
    /// When this extraction ran
    pub fetched_at: DateTime<Utc>,
    /// Home, then away, then any teams seen only on the lineup page.
    /// Every entry is a key of `teams`.
    pub team_order: Vec<String>,
    pub teams: HashMap<String, TeamLineup>,
}

impl MatchLineups {
    /// True when the page had no parseable roster. A normal state for
    /// fixtures whose lineups are not published yet.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Lineups in `team_order`.
    pub fn teams_in_order(&self) -> impl Iterator<Item = &TeamLineup> {
        self.team_order.iter().filter_map(|abbr| self.teams.get(abbr))
    }
}
