use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::common::{MatchTeam, Score};

/// A page of fixtures as accumulated by the feed.
pub type MatchList = Vec<Match>;

/// A single fixture as listed in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub league_id: String,
    pub league_name: String,
    pub home: MatchTeam,
    pub away: MatchTeam,
    /// Absent until kickoff.
    pub score: Option<Score>,
    /// Raw status code from the data source ("NS", "72'", "HT", "FT", ...).
    pub status: String,
    pub date: Option<NaiveDate>,
    pub kickoff_time: Option<NaiveTime>,
    pub venue: String,
    pub round: Option<u32>,
    /// Cumulative score across both legs of a cup tie.
    pub aggregate: Option<Score>,
}

impl Match {
    /// "Home vs Away".
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home.name, self.away.name)
    }

    /// The score as "h-a", or an empty string before kickoff.
    pub fn result(&self) -> String {
        self.score.map(|s| s.to_string()).unwrap_or_default()
    }

    pub fn involves_team(&self, team_id: &str) -> bool {
        self.home.id == team_id || self.away.id == team_id
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::fixture;
    use super::*;

    #[test]
    fn test_result_requires_score() {
        let mut m = fixture("m-1", "Premier League", "NS");
        assert_eq!(m.result(), "");

        m.score = Some(Score::new(3, 0));
        assert_eq!(m.result(), "3-0");
    }

    #[test]
    fn test_involves_team_checks_both_sides() {
        let m = fixture("m-1", "Premier League", "NS");
        assert!(m.involves_team("h-1"));
        assert!(m.involves_team("a-1"));
        assert!(!m.involves_team("x"));
        assert_eq!(m.title(), "Arsenal vs Chelsea");
    }
}
