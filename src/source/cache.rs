use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::Match;

/// Lightweight fixtures seen by a feed, shared with the detail loader so a
/// match page can render before the backend has enriched it.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MatchCache {
    inner: Arc<RwLock<HashMap<String, Match>>>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `matches`, replacing older copies of the same fixtures.
    pub fn insert_all(&self, matches: &[Match]) {
        let mut inner = self.inner.write();
        for fixture in matches {
            inner.insert(fixture.id.clone(), fixture.clone());
        }
    }

    pub fn get(&self, match_id: &str) -> Option<Match> {
        self.inner.read().get(match_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
