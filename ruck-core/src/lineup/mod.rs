///! Lineup pipeline: normalized page text in, structured rosters out.

pub mod assemble;
pub mod extract;
pub mod normalize;
pub mod types;

pub use assemble::assemble_lineups;
pub use extract::{extract_lineups, split_team_blocks, ExtractedTeam, TeamBlock};
pub use normalize::normalize_html;
pub use types::{MatchLineups, PlayerEntry, TeamLineup};
