///! Final assembly: merges extracted rosters with resolved team identities.

use std::collections::HashMap;

use chrono::Utc;

use super::extract::ExtractedTeam;
use super::types::{MatchLineups, TeamLineup};
use crate::summary::TeamDirectory;

/// Combine extraction output with the summary-derived directory into one
/// ordered result.
///
/// Directory order (home, then away) leads; teams that only appear on the
/// lineup page follow in document order, keeping their abbreviation as the
/// display name. An empty extraction yields an empty but valid result:
/// the lineup simply is not published yet.
pub fn assemble_lineups(
    extracted: Vec<ExtractedTeam>,
    directory: &TeamDirectory,
    event_id: &str,
    league_id: u32,
) -> MatchLineups {
    let mut teams: HashMap<String, TeamLineup> = HashMap::new();
    let mut document_order: Vec<String> = Vec::new();

    for team in extracted {
        if teams.contains_key(&team.abbreviation) {
            continue;
        }

        let display_name = directory
            .names
            .get(&team.abbreviation)
            .cloned()
            .unwrap_or_else(|| team.abbreviation.clone());

        document_order.push(team.abbreviation.clone());
        teams.insert(
            team.abbreviation.clone(),
            TeamLineup {
                abbreviation: team.abbreviation,
                display_name,
                starters: team.starters,
                replacements: team.replacements,
            },
        );
    }

    let mut team_order: Vec<String> = Vec::new();
    for abbr in &directory.order {
        if teams.contains_key(abbr) {
            team_order.push(abbr.clone());
        }
    }
    for abbr in document_order {
        if !team_order.contains(&abbr) {
            team_order.push(abbr);
        }
    }

    MatchLineups {
        event_id: event_id.to_string(),
        league_id,
        fetched_at: Utc::now(),
        team_order,
        teams,
    }
}
