//! Classification and ordering of match timeline entries.

use itertools::Itertools;
use serde::Serialize;

use crate::model::{MatchEvent, Score};

/// What a timeline entry represents, derived from its free-text kind and
/// detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum EventKind {
    Goal,
    /// A converted penalty. Counts as a goal.
    PenaltyGoal,
    /// A missed or saved penalty. Does not count as a goal.
    PenaltyMissed,
    YellowCard,
    RedCard,
    Substitution,
    Corner,
    Injury,
    /// Half-time or full-time separator.
    PeriodMarker,
    Other,
}

impl EventKind {
    pub fn classify(kind_raw: &str, detail_raw: &str) -> Self {
        let kind = kind_raw.trim().to_lowercase();
        let detail = detail_raw.trim().to_lowercase();

        if detail.contains("penalty") || kind.contains("penalty") {
            if detail.contains("miss") || detail.contains("saved") || kind.contains("miss") {
                return EventKind::PenaltyMissed;
            }
            if kind == "goal" {
                return EventKind::PenaltyGoal;
            }
        }

        match kind.as_str() {
            "goal" => EventKind::Goal,
            "card" if detail.contains("red") => EventKind::RedCard,
            "card" => EventKind::YellowCard,
            "injury" => EventKind::Injury,
            "period" | "halftime" | "fulltime" => EventKind::PeriodMarker,
            k if k.contains("substitution") => EventKind::Substitution,
            k if k.contains("corner") => EventKind::Corner,
            _ => EventKind::Other,
        }
    }

    pub fn of(event: &MatchEvent) -> Self {
        Self::classify(&event.kind_raw, &event.detail_raw)
    }

    pub fn is_goal(self) -> bool {
        matches!(self, EventKind::Goal | EventKind::PenaltyGoal)
    }
}

/// A parsed timeline minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Minute {
    /// `base` plus stoppage time, e.g. "45+2".
    Regular { base: u16, added: u16 },
    HalfTime,
    FullTime,
    Unknown,
}

impl Minute {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().trim_end_matches('\'');
        match raw.to_uppercase().as_str() {
            "HT" => return Minute::HalfTime,
            "FT" => return Minute::FullTime,
            _ => {}
        }

        let (base, added): (Result<u16, _>, Result<u16, _>) = match raw.split_once('+') {
            Some((base, added)) => (base.trim().parse(), added.trim().parse()),
            None => (raw.parse(), Ok(0)),
        };
        match (base, added) {
            (Ok(base), Ok(added)) => Minute::Regular { base, added },
            _ => Minute::Unknown,
        }
    }

    /// Half-time sorts after first-half stoppage time and before the 46th
    /// minute; full-time after everything but unparseable minutes.
    pub fn sort_key(self) -> (u16, u16) {
        match self {
            Minute::Regular { base, added } => (base, added),
            Minute::HalfTime => (45, u16::MAX),
            Minute::FullTime => (u16::MAX, 0),
            Minute::Unknown => (u16::MAX, u16::MAX),
        }
    }
}

/// Events sorted by minute. Entries sharing a minute keep their source order.
pub fn chronological(events: &[MatchEvent]) -> Vec<MatchEvent> {
    events
        .iter()
        .sorted_by_key(|e| Minute::parse(&e.minute).sort_key())
        .cloned()
        .collect()
}

/// Events worth showing on a timeline. Assist rows duplicate the goal they
/// belong to.
pub fn visible(events: &[MatchEvent]) -> Vec<MatchEvent> {
    events
        .iter()
        .filter(|e| !e.kind_raw.eq_ignore_ascii_case("assist"))
        .cloned()
        .collect()
}

/// The score after each goal, in the order the events are given.
pub fn running_score(events: &[MatchEvent]) -> Vec<(&MatchEvent, Score)> {
    let mut score = Score::new(0, 0);
    events
        .iter()
        .filter(|e| EventKind::of(e).is_goal())
        .map(|e| {
            if e.is_home_side {
                score.home += 1;
            } else {
                score.away += 1;
            }
            (e, score)
        })
        .collect()
}
