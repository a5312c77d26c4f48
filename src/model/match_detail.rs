use serde::{Deserialize, Serialize};

use super::matchlist::Match;

/// Yellow and red cards shown to one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardCounts {
    pub yellow: u8,
    pub red: u8,
}

/// Full details of a single fixture, as shown on the match page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    #[serde(flatten)]
    pub fixture: Match,
    pub description: String,
    pub result: String,
    pub video: String,
    pub home_cards: CardCounts,
    pub away_cards: CardCounts,
}

impl MatchDetails {
    /// Minimal details for a fixture the backend has not enriched yet.
    pub fn from_basic(fixture: Match) -> Self {
        Self {
            result: fixture.result(),
            fixture,
            description: String::new(),
            video: String::new(),
            home_cards: CardCounts::default(),
            away_cards: CardCounts::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.fixture.id
    }
}
