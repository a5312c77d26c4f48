use std::collections::HashMap;

use serde::Serialize;

use crate::model::Match;

/// Heading used for fixtures whose league name is missing.
pub const FALLBACK_LEAGUE: &str = "Other League";

/// Fixtures of one league, as rendered under a single heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueGroup {
    pub league_name: String,
    pub matches: Vec<Match>,
}

/// Group fixtures by league name.
///
/// Groups appear in the order their league is first seen and fixtures keep
/// their relative order inside a group.
pub fn group_by_league(matches: &[Match]) -> Vec<LeagueGroup> {
    let mut groups: Vec<LeagueGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for fixture in matches {
        let name = match fixture.league_name.trim() {
            "" => FALLBACK_LEAGUE,
            _ => fixture.league_name.as_str(),
        };
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push(LeagueGroup {
                league_name: name.to_string(),
                matches: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].matches.push(fixture.clone());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::matchlist::fixtures::fixture;

    fn ids(group: &LeagueGroup) -> Vec<&str> {
        group.matches.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_group_order_is_first_appearance() {
        let matches = vec![
            fixture("m0", "A", "NS"),
            fixture("m1", "B", "NS"),
            fixture("m2", "A", "NS"),
        ];
        let groups = group_by_league(&matches);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].league_name, "A");
        assert_eq!(ids(&groups[0]), ["m0", "m2"]);
        assert_eq!(groups[1].league_name, "B");
        assert_eq!(ids(&groups[1]), ["m1"]);
    }

    #[test]
    fn test_missing_league_falls_back() {
        let matches = vec![fixture("m0", "", "NS"), fixture("m1", "B", "NS"), fixture("m2", "", "NS")];
        let groups = group_by_league(&matches);

        assert_eq!(groups[0].league_name, FALLBACK_LEAGUE);
        assert_eq!(ids(&groups[0]), ["m0", "m2"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_league(&[]).is_empty());
    }
}
