///! Match summary payload: raw serde shapes plus team identity resolution.
///!
///! The summary JSON is the structured half of the upstream pair. Only its
///! top-level `header` is load-bearing; everything beneath is defaulted so
///! a drifting schema degrades to an empty directory instead of a crash.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::IngestError;

/// Parsed summary payload. Holds only the slice of the document this core
/// reads: the competitor list under `header`.
#[derive(Debug, Clone)]
pub struct SummaryPayload {
    pub header: SummaryHeader,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryHeader {
    #[serde(default)]
    pub competitions: Vec<RawCompetition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCompetition {
    #[serde(default)]
    pub competitors: Vec<RawCompetitor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCompetitor {
    /// "home" or "away"
    #[serde(default, rename = "homeAway")]
    pub home_away: String,
    #[serde(default)]
    pub team: RawTeam,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeam {
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default, rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub name: String,
}

/// Team identities resolved from one match summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamDirectory {
    /// Abbreviation to display name, e.g. "SCO" to "Scotland"
    pub names: HashMap<String, String>,
    /// Home abbreviation first, then away. A side missing from the summary
    /// is simply absent.
    pub order: Vec<String>,
}

/// Validate and deserialize a fetched summary document.
///
/// A payload that is not an object or has no `header` is a schema failure:
/// it signals an upstream contract change and must not be coerced into an
/// empty result. A `header` whose innards do not deserialize resolves to
/// an empty directory downstream instead.
pub fn parse_summary(value: &Value) -> Result<SummaryPayload, IngestError> {
    let Some(object) = value.as_object() else {
        return Err(IngestError::SummaryShape {
            detail: "payload is not a JSON object".to_string(),
        });
    };
    let Some(header) = object.get("header") else {
        return Err(IngestError::SummaryShape {
            detail: "missing top-level `header`".to_string(),
        });
    };

    let header = match serde_json::from_value(header.clone()) {
        Ok(header) => header,
        Err(e) => {
            warn!("Summary header did not deserialize cleanly: {}", e);
            SummaryHeader::default()
        }
    };

    Ok(SummaryPayload { header })
}

/// Build the abbreviation directory from a parsed summary.
///
/// Picks the competitors tagged home and away, in that order. The display
/// name prefers `displayName`, then `name`, then the abbreviation itself.
/// Competitors without an abbreviation are unusable as join keys and are
/// skipped.
pub fn resolve_teams(payload: &SummaryPayload) -> TeamDirectory {
    let mut directory = TeamDirectory::default();

    let competitors = payload
        .header
        .competitions
        .first()
        .map(|competition| competition.competitors.as_slice())
        .unwrap_or(&[]);

    for tag in ["home", "away"] {
        let Some(competitor) = competitors.iter().find(|c| c.home_away == tag) else {
            continue;
        };
        let team = &competitor.team;
        if team.abbreviation.is_empty() {
            continue;
        }

        let name = if !team.display_name.is_empty() {
            team.display_name.clone()
        } else if !team.name.is_empty() {
            team.name.clone()
        } else {
            team.abbreviation.clone()
        };

        directory.names.insert(team.abbreviation.clone(), name);
        directory.order.push(team.abbreviation.clone());
    }

    directory
}
