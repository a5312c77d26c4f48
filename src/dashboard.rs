//! Tab filters applied to an accumulated feed before grouping.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::model::Match;
use crate::status::is_live;

/// Dashboard tab selecting which fixtures are shown.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FeedTab {
    #[default]
    All,
    Live,
    Favorites,
}

/// Fixtures visible under `tab`, in feed order.
pub fn apply_tab(tab: FeedTab, matches: &[Match], favorites: &BTreeSet<String>) -> Vec<Match> {
    matches
        .iter()
        .filter(|m| match tab {
            FeedTab::All => true,
            FeedTab::Live => is_live(&m.status),
            FeedTab::Favorites => favorites.contains(&m.id),
        })
        .cloned()
        .collect()
}

/// Badge count for the live tab.
pub fn live_count(matches: &[Match]) -> usize {
    matches.iter().filter(|m| is_live(&m.status)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::matchlist::fixtures::fixture;

    fn sample() -> Vec<Match> {
        vec![
            fixture("m-0", "Premier League", "72'"),
            fixture("m-1", "Champions League", "FT"),
            fixture("m-2", "Premier League", "NS"),
        ]
    }

    #[test]
    fn test_tab_parsing() {
        assert_eq!("Live".parse::<FeedTab>().unwrap(), FeedTab::Live);
        assert_eq!("favorites".parse::<FeedTab>().unwrap(), FeedTab::Favorites);
        assert_eq!(FeedTab::default().to_string(), "all");
    }

    #[test]
    fn test_apply_tab() {
        let matches = sample();
        let favorites: BTreeSet<String> = ["m-2".to_string()].into();

        assert_eq!(apply_tab(FeedTab::All, &matches, &favorites).len(), 3);

        let live = apply_tab(FeedTab::Live, &matches, &favorites);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, "m-0");

        let favs = apply_tab(FeedTab::Favorites, &matches, &favorites);
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].id, "m-2");
    }

    #[test]
    fn test_live_count() {
        assert_eq!(live_count(&sample()), 1);
    }
}
