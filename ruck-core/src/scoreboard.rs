///! Scoreboard payload: lists the events on one league matchday.
///!
///! Operators use this to discover the event ids worth ingesting. A day
///! without fixtures is an empty list, not an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::IngestError;

/// One event from a league's daily scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardEvent {
    pub id: String,
    /// Kickoff timestamp as printed by the upstream, e.g. "2024-02-10T14:15Z"
    pub date: String,
    /// Fixture name, e.g. "Scotland vs Argentina"
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    /// The upstream has served this both as a string and as a number.
    #[serde(default)]
    id: Value,
    #[serde(default)]
    date: String,
    #[serde(default)]
    name: String,
}

/// Validate and flatten a fetched scoreboard document.
///
/// A payload that is not an object is a schema failure. A missing `events`
/// array is a quiet matchday; entries without an id cannot be ingested and
/// are skipped.
pub fn parse_scoreboard(value: &Value) -> Result<Vec<ScoreboardEvent>, IngestError> {
    let Some(object) = value.as_object() else {
        return Err(IngestError::ScoreboardShape {
            detail: "payload is not a JSON object".to_string(),
        });
    };

    let Some(events) = object.get("events") else {
        debug!("Scoreboard has no events array; quiet matchday");
        return Ok(Vec::new());
    };

    let raw: Vec<RawEvent> = match serde_json::from_value(events.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Scoreboard events did not deserialize cleanly: {}", e);
            return Ok(Vec::new());
        }
    };

    let events = raw
        .into_iter()
        .filter_map(|event| {
            let Some(id) = event_id(&event.id) else {
                debug!("Skipping scoreboard event without an id: {:?}", event.name);
                return None;
            };
            Some(ScoreboardEvent {
                id,
                date: event.date,
                name: event.name,
            })
        })
        .collect();

    Ok(events)
}

fn event_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
