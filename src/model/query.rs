use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::matchlist::Match;

/// Filter parameters for a feed. Every field is optional; an empty query
/// matches every fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedQuery {
    pub date: Option<NaiveDate>,
    pub league_id: Option<String>,
    pub team_id: Option<String>,
}

impl FeedQuery {
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_league(mut self, league_id: impl Into<String>) -> Self {
        self.league_id = Some(league_id.into());
        self
    }

    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Whether `fixture` passes every filter set on this query.
    pub fn matches(&self, fixture: &Match) -> bool {
        self.date.is_none_or(|d| fixture.date == Some(d))
            && self
                .league_id
                .as_deref()
                .is_none_or(|l| fixture.league_id == l)
            && self
                .team_id
                .as_deref()
                .is_none_or(|t| fixture.involves_team(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::matchlist::fixtures::fixture;

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(FeedQuery::default().matches(&fixture("m-1", "Premier League", "NS")));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let m = fixture("m-1", "Premier League", "NS");
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        assert!(FeedQuery::default().with_league("4328").with_date(day).matches(&m));
        assert!(!FeedQuery::default().with_league("4328").with_date(other_day).matches(&m));
        assert!(!FeedQuery::default().with_league("4480").matches(&m));
        assert!(FeedQuery::default().with_team("a-1").matches(&m));
        assert!(!FeedQuery::default().with_team("a-2").matches(&m));
    }
}
