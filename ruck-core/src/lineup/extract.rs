///! Lineup grammar: recovers per-team rosters from normalized lineup text.
///!
///! Phase one segments the text into team blocks at header markers and
///! splits each block at its replacements marker. Phase two tokenizes the
///! player rows inside each segment. Both phases are pure functions.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::types::PlayerEntry;

/// Team header marker: a 2-4 letter abbreviation right before the
/// "No.Name" column header of a roster table.
static TEAM_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2,4})\s+No\.Name\b").unwrap());

/// Splits a block into starters and bench.
static REPLACEMENTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bReplacements\b").unwrap());

/// One player row: jersey number, name (Latin letters with diacritics,
/// apostrophes, periods, hyphens), comma, position code.
static PLAYER_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(\d{1,2})\s+([A-Za-zÀ-ÖØ-öø-ÿ'\u{2019}\.\-\s]+?),\s*([A-Z0-9/]{1,5})\s*$")
        .unwrap()
});

/// Phase-one output: one team's raw text, split at the replacements marker
/// but not yet tokenized.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamBlock {
    pub abbreviation: String,
    pub starters_text: String,
    pub replacements_text: String,
}

/// Phase-two output for one team, before identities and ordering are
/// resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTeam {
    pub abbreviation: String,
    pub starters: Vec<PlayerEntry>,
    pub replacements: Vec<PlayerEntry>,
}

/// Segment normalized lineup text into per-team blocks.
///
/// A block runs from the end of its header marker to the start of the next
/// one, or to the end of the text. When the same abbreviation shows up
/// under more than one header, the first block wins.
pub fn split_team_blocks(text: &str) -> Vec<TeamBlock> {
    let mut headers = Vec::new();
    for caps in TEAM_HEADER_RE.captures_iter(text) {
        if let (Some(whole), Some(abbr)) = (caps.get(0), caps.get(1)) {
            headers.push((abbr.as_str().to_string(), whole.start(), whole.end()));
        }
    }

    let mut blocks: Vec<TeamBlock> = Vec::new();
    for (index, (abbr, _, end)) in headers.iter().enumerate() {
        if blocks.iter().any(|block| &block.abbreviation == abbr) {
            debug!("Ignoring repeated team header {}", abbr);
            continue;
        }

        let block_end = headers
            .get(index + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(text.len());
        let chunk = &text[*end..block_end];

        let (starters_text, replacements_text) = match REPLACEMENTS_RE.find(chunk) {
            Some(marker) => (&chunk[..marker.start()], &chunk[marker.end()..]),
            None => (chunk, ""),
        };

        blocks.push(TeamBlock {
            abbreviation: abbr.clone(),
            starters_text: starters_text.to_string(),
            replacements_text: replacements_text.to_string(),
        });
    }

    blocks
}

/// Tokenize the player rows inside one segment. Lines that do not match
/// the row grammar (ads, captions, section labels) are skipped, as are
/// rows with a jersey number outside 1 through 99 or a blank name.
pub fn parse_player_lines(text: &str) -> Vec<PlayerEntry> {
    let mut entries = Vec::new();
    for caps in PLAYER_LINE_RE.captures_iter(text) {
        let (Some(number), Some(name), Some(position)) = (caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };

        let Ok(jersey) = number.as_str().parse::<u8>() else {
            continue;
        };
        if jersey == 0 {
            continue;
        }

        let name = name.as_str().trim();
        if name.is_empty() {
            continue;
        }

        entries.push(PlayerEntry {
            jersey,
            name: name.to_string(),
            position: position.as_str().to_string(),
        });
    }
    entries
}

/// Run both grammar phases over normalized text. Blocks where neither
/// segment yields a row are dropped; the output keeps document order.
pub fn extract_lineups(text: &str) -> Vec<ExtractedTeam> {
    let mut teams = Vec::new();
    for block in split_team_blocks(text) {
        let starters = parse_player_lines(&block.starters_text);
        let replacements = parse_player_lines(&block.replacements_text);

        if starters.is_empty() && replacements.is_empty() {
            debug!("Dropping team block {} with no player rows", block.abbreviation);
            continue;
        }

        teams.push(ExtractedTeam {
            abbreviation: block.abbreviation,
            starters,
            replacements,
        });
    }
    debug!("Extracted {} team(s) with player rows", teams.len());
    teams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::normalize::normalize_html;

    const TWO_TEAMS: &str = "SCO No.Name\n\
        1 Pierre Schoeman, PR\n\
        9 Ben White, SH\n\
        Replacements\n\
        16 Ewan Ashman, HK\n\
        ARG No.Name\n\
        9 Gonzalo Bertranou, SH\n\
        Replacements\n\
        21 Lautaro Bazán Vélez, SH\n";

    #[test]
    fn two_blocks_partition_their_rows() {
        let teams = extract_lineups(TWO_TEAMS);
        assert_eq!(teams.len(), 2);

        let sco = &teams[0];
        assert_eq!(sco.abbreviation, "SCO");
        assert_eq!(sco.starters.len(), 2);
        assert_eq!(sco.starters[1].name, "Ben White");
        assert_eq!(sco.replacements.len(), 1);
        assert_eq!(sco.replacements[0].jersey, 16);

        let arg = &teams[1];
        assert_eq!(arg.abbreviation, "ARG");
        assert_eq!(arg.starters.len(), 1);
        assert_eq!(arg.replacements.len(), 1);
        assert_eq!(arg.replacements[0].name, "Lautaro Bazán Vélez");
    }

    #[test]
    fn block_without_replacements_marker_keeps_everything_as_starters() {
        let text = "FRA No.Name\n9 Antoine Dupont, SH\n10 Romain Ntamack, FH\n";
        let teams = extract_lineups(text);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].starters.len(), 2);
        assert!(teams[0].replacements.is_empty());
    }

    #[test]
    fn replacements_marker_is_case_insensitive() {
        let text = "ARG No.Name\n1 Thomas Gallo, PR\nREPLACEMENTS\n16 Ignacio Ruiz, HK\n";
        let teams = extract_lineups(text);
        assert_eq!(teams[0].starters.len(), 1);
        assert_eq!(teams[0].replacements.len(), 1);
    }

    #[test]
    fn header_without_player_rows_is_dropped() {
        let text = "FRA No.Name\nKickoff 15:00 local\nSCO No.Name\n1 Pierre Schoeman, PR\n";
        assert_eq!(split_team_blocks(text).len(), 2);

        let teams = extract_lineups(text);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].abbreviation, "SCO");
    }

    #[test]
    fn repeated_team_header_keeps_the_first_block() {
        let text = "SCO No.Name\n1 Pierre Schoeman, PR\nSCO No.Name\n2 George Turner, HK\n";
        let teams = extract_lineups(text);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].starters.len(), 1);
        assert_eq!(teams[0].starters[0].jersey, 1);
    }

    #[test]
    fn row_grammar_rejects_malformed_lines() {
        let text = "SCO No.Name\n\
            0 Ghost Player, PR\n\
            100 Too Big, HK\n\
            No comma here PR\n\
            7 Hamish Watson\n\
            12 , CE\n\
            8 Matt Fagerson, TOOLONG\n\
            10 Finn Russell, FH\n";
        let teams = extract_lineups(text);
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].starters.len(), 1);
        assert_eq!(teams[0].starters[0].name, "Finn Russell");
    }

    #[test]
    fn names_keep_diacritics_apostrophes_and_particles() {
        let text = "ARG No.Name\n\
            2 Julián Montoya, HK\n\
            3 Francisco Gómez Kodela, PR\n\
            11 Duhan van der Merwe, WG\n\
            14 Mack O'Hanrahan-Smith, WG\n\
            6 J.P. du Preez, FL/LK\n";
        let teams = extract_lineups(text);
        let names: Vec<&str> = teams[0].starters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Julián Montoya",
                "Francisco Gómez Kodela",
                "Duhan van der Merwe",
                "Mack O'Hanrahan-Smith",
                "J.P. du Preez",
            ]
        );
        assert_eq!(teams[0].starters[4].position, "FL/LK");
    }

    #[test]
    fn extraction_is_idempotent_on_identical_text() {
        assert_eq!(extract_lineups(TWO_TEAMS), extract_lineups(TWO_TEAMS));
    }

    #[test]
    fn list_item_rows_survive_the_whole_text_pipeline() {
        let html = "<div class=\"Lineups__Header\"><span>FRA</span></div>\n\
            <div class=\"Lineups__Sub\">No.Name</div>\n\
            <ul><li>9 Antoine Dupont, SH</li></ul>";
        let teams = extract_lineups(&normalize_html(html));
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].abbreviation, "FRA");
        assert_eq!(
            teams[0].starters[0],
            PlayerEntry {
                jersey: 9,
                name: "Antoine Dupont".to_string(),
                position: "SH".to_string(),
            }
        );
    }
}
