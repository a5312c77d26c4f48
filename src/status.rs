//! Live / finished classification of raw status codes.

use serde::Serialize;

use crate::model::Match;

const LIVE_MARKERS: [&str; 5] = ["started", "1h", "2h", "ht", "live"];
const FINISHED_MARKERS: [&str; 4] = ["ft", "finished", "aet", "pen"];
const HALF_TIME: &str = "HT";
const NO_KICKOFF: &str = "—";

/// Whether the fixture is in play: a known in-play marker, or an
/// elapsed-minute notation such as `72'`.
pub fn is_live(status: &str) -> bool {
    let status_lower = status.to_lowercase();
    LIVE_MARKERS.contains(&status_lower.as_str()) || status.contains('\'')
}

pub fn is_finished(status: &str) -> bool {
    let status_lower = status.to_lowercase();
    FINISHED_MARKERS.contains(&status_lower.as_str())
}

/// Coarse lifecycle phase of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MatchPhase {
    Live,
    Finished,
    Scheduled,
}

impl MatchPhase {
    /// Live is checked before finished; anything unrecognised is scheduled.
    pub fn of(status: &str) -> Self {
        if is_live(status) {
            MatchPhase::Live
        } else if is_finished(status) {
            MatchPhase::Finished
        } else {
            MatchPhase::Scheduled
        }
    }
}

/// Short status label for a scoreboard cell.
pub fn display_status(fixture: &Match) -> String {
    match MatchPhase::of(&fixture.status) {
        MatchPhase::Live if fixture.status == HALF_TIME => HALF_TIME.to_string(),
        MatchPhase::Live if fixture.status.contains('\'') => fixture.status.clone(),
        MatchPhase::Live => "1H".to_string(),
        MatchPhase::Finished => "FT".to_string(),
        MatchPhase::Scheduled => fixture
            .kickoff_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| NO_KICKOFF.to_string()),
    }
}

/// The in-play subset of `matches`, in their original order.
pub fn filter_live(matches: &[Match]) -> Vec<Match> {
    matches
        .iter()
        .filter(|m| is_live(&m.status))
        .cloned()
        .collect()
}
