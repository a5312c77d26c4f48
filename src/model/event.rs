use serde::{Deserialize, Serialize};

/// One entry of a fixture's timeline.
///
/// Sources do not guarantee any ordering; see
/// [`timeline::chronological`](crate::timeline::chronological).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: String,
    pub match_id: String,
    /// Free-text kind: "Goal", "Card", "Substitution", "Corner", "Period", ...
    pub kind_raw: String,
    pub detail_raw: String,
    pub is_home_side: bool,
    pub primary_player: String,
    /// Player coming off for a substitution, or a dismissal note.
    pub secondary_player: Option<String>,
    /// "12", "45+2", "HT", "FT".
    pub minute: String,
}
