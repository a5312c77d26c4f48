use std::fmt;

use serde::{Deserialize, Serialize};

/// Goals scored by each side.
///
/// A fixture either has a full score or none at all, so the pair is
/// carried as one value behind an `Option` rather than two optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub home: u16,
    pub away: u16,
}

impl Score {
    pub fn new(home: u16, away: u16) -> Self {
        Self { home, away }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Colour of a card shown next to a team (two-legged ties, dismissals).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Yellow,
    Red,
}

/// One side of a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchTeam {
    pub id: String,
    pub name: String,
    pub badge_url: String,
    pub tag: Option<String>,
    pub card_color: Option<CardColor>,
}

impl MatchTeam {
    pub fn new(id: impl Into<String>, name: impl Into<String>, badge_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            badge_url: badge_url.into(),
            tag: None,
            card_color: None,
        }
    }
}
